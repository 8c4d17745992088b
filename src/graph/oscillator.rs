use crate::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Scheduled Oscillator
====================

An oscillator node runs at a fixed frequency between a start time and a stop
time on the engine clock. Outside that window it writes silence.

  start(t)    Begin producing samples at clock time t. The first sample at or
              after t is phase 0.

  stop(t)     Hard stop at clock time t. Calling it again moves the stop time
              until the oscillator has actually ended.

  completion  The first block that reaches the stop time flips the node to
              Ended and raises a one-shot completion flag. `take_completion`
              reads and clears it, so the owner sees the event exactly once.

Lifecycle:

  ┌─────────┐ start(t0) ┌───────────┐ clock ≥ t0 ┌─────────┐ clock ≥ ts ┌───────┐
  │ Created │ ────────→ │ Scheduled │ ─────────→ │ Running │ ─────────→ │ Ended │
  └─────────┘           └───────────┘            └─────────┘            └───────┘

Example usage:
  let mut osc = OscNode::sine(440.0);
  osc.start(now);
  osc.stop(now + 1.0);
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Created,
    Scheduled,
    Running,
    Ended,
}

#[derive(Debug, Clone)]
pub struct OscNode {
    osc: OscillatorBlock,
    frequency: f32,
    start_at: Option<f64>,
    stop_at: Option<f64>,
    playback: Playback,
    completion_pending: bool,
}

impl OscNode {
    pub fn new(waveform: OscillatorWaveform, frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
            frequency,
            start_at: None,
            stop_at: None,
            playback: Playback::Created,
            completion_pending: false,
        }
    }

    pub fn sine(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Sine, frequency)
    }

    pub fn sawtooth(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Saw, frequency)
    }

    pub fn triangle(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Triangle, frequency)
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.osc.waveform()
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn stop_time(&self) -> Option<f64> {
        self.stop_at
    }

    /// Schedule the oscillator to begin at `at`. Only the first call counts.
    pub fn start(&mut self, at: f64) {
        if self.playback != Playback::Created {
            log::debug!("oscillator already started, ignoring start({at})");
            return;
        }
        self.start_at = Some(at);
        self.playback = Playback::Scheduled;
    }

    /// Schedule a hard stop at `at`.
    pub fn stop(&mut self, at: f64) {
        match self.playback {
            Playback::Created => log::debug!("stop({at}) before start, ignoring"),
            Playback::Ended => log::debug!("stop({at}) after end, ignoring"),
            Playback::Scheduled | Playback::Running => self.stop_at = Some(at),
        }
    }

    /// One-shot completion notification: true exactly once after the stop.
    pub fn take_completion(&mut self) -> bool {
        std::mem::take(&mut self.completion_pending)
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (i, sample) in out.iter_mut().enumerate() {
            let t = ctx.time_at(i);

            if self.playback == Playback::Scheduled && self.start_at.is_some_and(|s| t >= s) {
                self.playback = Playback::Running;
            }

            if self.playback == Playback::Running && self.stop_at.is_some_and(|s| t >= s) {
                self.playback = Playback::Ended;
                self.completion_pending = true;
            }

            *sample = match self.playback {
                Playback::Running => self.osc.next_sample(self.frequency, ctx.sample_rate),
                _ => 0.0,
            };
        }
    }
}
