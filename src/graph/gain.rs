use crate::{
    dsp::automation::ParamTimeline,
    graph::node::{GraphNode, RenderCtx},
};

/*
Gain Stage
==========

Multiplies a signal by a coefficient. The coefficient has two parts:

    coefficient(t) = timeline.value_at(t) + modulation[t]

  timeline    Scheduled value (fixed scale, envelope ramps, ...).

  modulation  Optional audio-rate input added on top, sample by sample.

With a timeline held at 0.0 and an oscillator on the modulation input, the
stage outputs signal × oscillator: ring modulation. With no modulation and an
envelope on the timeline it is a VCA.

    signal ──→ [ × ] ──→ out
                 ↑
      timeline + modulation
*/

#[derive(Debug, Clone)]
pub struct GainNode {
    gain: ParamTimeline,
}

impl GainNode {
    pub fn new(value: f32) -> Self {
        Self {
            gain: ParamTimeline::new(value),
        }
    }

    pub fn gain(&self) -> &ParamTimeline {
        &self.gain
    }

    pub fn gain_mut(&mut self) -> &mut ParamTimeline {
        &mut self.gain
    }

    /// Apply the coefficient in place, adding `modulation` sample by sample.
    pub fn process(&mut self, signal: &mut [f32], ctx: &RenderCtx, modulation: Option<&[f32]>) {
        match modulation {
            Some(modulation) => {
                for (i, (sample, m)) in signal.iter_mut().zip(modulation).enumerate() {
                    *sample *= self.gain.value_at(ctx.time_at(i)) + m;
                }
            }
            None => {
                for (i, sample) in signal.iter_mut().enumerate() {
                    *sample *= self.gain.value_at(ctx.time_at(i));
                }
            }
        }

        self.gain.prune(ctx.time_at(signal.len()));
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.process(out, ctx, None);
    }
}
