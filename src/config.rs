//! Engine and voice settings.
//!
//! Everything here is plain data with defaults matching the stock voice:
//! a 20 ms attack, 10 ms decay to half of peak, 500 ms release and a master
//! bus at 0.125.

use snafu::ensure;

use crate::{
    error::{
        ConfigError, InvalidEnvelopeTimeSnafu, InvalidMasterGainSnafu, InvalidQueueCapacitySnafu,
        InvalidSampleRateSnafu, InvalidSustainSnafu,
    },
    MIN_TIME,
};

/// ADSR timing constants shared by every voice.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeConfig {
    /// Seconds to ramp 0 → peak
    pub attack: f32,
    /// Seconds to ramp peak → sustain level
    pub decay: f32,
    /// Fraction of peak held while the note is down (0.0 - 1.0)
    pub sustain: f32,
    /// Seconds to ramp current level → 0
    pub release: f32,
}

impl EnvelopeConfig {
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Clamp into a shape the scheduler can always draw.
    pub fn sanitized(self) -> Self {
        Self {
            attack: self.attack.max(MIN_TIME),
            decay: self.decay.max(MIN_TIME),
            sustain: self.sustain.clamp(0.0, 1.0),
            release: self.release.max(MIN_TIME),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (stage, seconds) in [
            ("attack", self.attack),
            ("decay", self.decay),
            ("release", self.release),
        ] {
            ensure!(
                seconds.is_finite() && seconds >= 0.0,
                InvalidEnvelopeTimeSnafu { stage, seconds }
            );
        }
        ensure!(
            (0.0..=1.0).contains(&self.sustain),
            InvalidSustainSnafu {
                sustain: self.sustain
            }
        );
        Ok(())
    }
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self::adsr(0.02, 0.01, 0.5, 0.5)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    pub sample_rate: f32,
    /// Gain applied to the summed voice bus before it leaves the engine.
    pub master_gain: f32,
    pub envelope: EnvelopeConfig,
    /// Seconds the oscillators keep running after the release ramp ends.
    pub stop_guard: f32,
    /// Capacity of the control → audio message queue.
    pub queue_capacity: usize,
    /// Capacity of the audio → observer event queue.
    pub event_capacity: usize,
}

impl SynthConfig {
    pub fn with_sample_rate(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure!(
            self.sample_rate.is_finite() && self.sample_rate > 0.0,
            InvalidSampleRateSnafu {
                sample_rate: self.sample_rate
            }
        );
        ensure!(
            self.master_gain.is_finite() && self.master_gain >= 0.0,
            InvalidMasterGainSnafu {
                gain: self.master_gain
            }
        );
        ensure!(
            self.stop_guard.is_finite() && self.stop_guard >= 0.0,
            InvalidEnvelopeTimeSnafu {
                stage: "stop guard",
                seconds: self.stop_guard
            }
        );
        ensure!(
            self.queue_capacity > 0,
            InvalidQueueCapacitySnafu {
                queue: "message",
                capacity: self.queue_capacity
            }
        );
        ensure!(
            self.event_capacity > 0,
            InvalidQueueCapacitySnafu {
                queue: "event",
                capacity: self.event_capacity
            }
        );
        self.envelope.validate()
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            master_gain: 0.125,
            envelope: EnvelopeConfig::default(),
            stop_guard: 0.01,
            queue_capacity: 256,
            event_capacity: 1024,
        }
    }
}
