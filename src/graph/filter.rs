use crate::{
    dsp::filter::{FilterType, SVFilter, FLAT_Q},
    graph::node::{GraphNode, RenderCtx},
};

/*
Filter Node
===========

Wraps the state-variable filter as an in-place graph processor.

Cutoff (Hz): the frequency where the filter takes effect.
  - 200 Hz:    Muffled, like through a wall
  - 1000 Hz:   Warm, round
  - 5000 Hz:   Present, clear
  - 20000 Hz:  Fully open

Q: emphasis at the cutoff.
  - 0.707:  Flat (Butterworth)
  - 2.0:    Noticeable peak, adds bite
  - 10+:    Ringing, close to self-oscillation

Example usage:
  // Voice output stage: lowpass tracking the note, Q = 2
  let filter = FilterNode::lowpass(frequency + 2000.0).with_q(2.0);
*/

#[derive(Debug, Clone)]
pub struct FilterNode {
    filter: SVFilter,
}

impl FilterNode {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        FilterNode {
            filter: SVFilter::new(filter_type, cutoff_hz, FLAT_Q),
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.filter.set_q(q);
        self
    }

    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.filter.q
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter.filter_type()
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx.sample_rate);
    }
}
