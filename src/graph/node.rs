/// Context passed to graph nodes during rendering
///
/// Nodes do not own a clock. They read the engine's sample clock from here and
/// compare it against the timestamps they were scheduled with:
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - frame: Index of the first sample of the block on the engine clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frame: u64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, frame: u64) -> Self {
        Self { sample_rate, frame }
    }

    /// Clock time of the first sample in the block, in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time_at(0)
    }

    /// Clock time of sample `index` within the block.
    #[inline]
    pub fn time_at(&self, index: usize) -> f64 {
        (self.frame + index as u64) as f64 / self.sample_rate as f64
    }

    /// Context for the block that starts `frames` samples later.
    pub fn advanced(&self, frames: usize) -> Self {
        Self {
            frame: self.frame + frames as u64,
            ..*self
        }
    }
}

/// Core trait for audio processing graph nodes
///
/// Sources overwrite `out`; processors transform it in place.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);
}
