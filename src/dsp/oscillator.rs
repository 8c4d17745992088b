use std::f32::consts::TAU;

/*
Phase-Accumulator Oscillator
============================

  phase       Position inside one cycle, kept in [0.0, 1.0).
  increment   frequency / sample_rate, added every sample.

Each waveform is a pure function of phase. All of them start at 0.0 and
rise, so starting a voice never begins on a jump:

  sine       sin(2π · phase)
  sawtooth   2 · frac(phase + 0.5) - 1          0 → +1, drop to -1, → 0
  triangle   4p, 2 - 4p, 4p - 4 by quarter      0 → +1 → -1 → 0

No band-limiting is applied. The voice lowpass removes most of the aliasing
from the sawtooth.
*/

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Saw,
    Triangle,
}

impl OscillatorWaveform {
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            OscillatorWaveform::Sine => (TAU * phase).sin(),
            OscillatorWaveform::Saw => 2.0 * (phase + 0.5).fract() - 1.0,
            OscillatorWaveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Saw)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    /// Emit the current sample, then advance by one sample period.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let value = self.waveform.sample(self.phase);
        self.phase = (self.phase + frequency / sample_rate).fract();
        value
    }

    pub fn render(&mut self, buffer: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }
}
