use crate::{config::EnvelopeConfig, dsp::automation::ParamTimeline};

/*
Scheduled ADSR Envelope
=======================

This envelope does not tick per sample. It writes its whole shape onto a
parameter timeline the moment a note starts, and rewrites the tail the moment
the note is released. The renderer then reads the gain curve back sample by
sample.

Vocabulary
----------

  peak        Gain reached at the end of the attack (the voice amplitude,
              already shaped by the velocity curve).

  sustain     Fraction of peak held after the decay. Sustain has no duration:
              it lasts until release.

  t0          Clock time captured when the note started.

  ts          Clock time captured when the note was released.


The Shape
---------

  gain
  peak ┐    ╱╲
       │   ╱  ╲___________________
  S*pk │  ╱                       ╲
       │ ╱                         ╲
   0.0 └╱───────────────────────────╲──→ time
        t0  +A  +D               ts   ts+R

Note on writes three events at once:

    set(0.0, t0)
    ramp(peak, t0 + A)
    ramp(sustain * peak, t0 + A + D)

Note off rewrites the future:

    g = value_at(ts)          sample BEFORE cancelling, so a release during
    cancel(ts)                the attack or decay starts from where the curve
    set(g, ts)                actually is
    ramp(0.0, ts + R)

Pinning `g` first is what keeps release click-free: the curve is continuous
at ts no matter which stage was running.


The State Machine
-----------------

    ┌──────┐ trigger ┌────────┐ t0+A ┌───────┐ t0+A+D ┌─────────┐
    │ Idle │ ──────→ │ Attack │ ───→ │ Decay │ ─────→ │ Sustain │
    └──────┘         └────────┘      └───────┘        └─────────┘
                          │              │                 │
                          └──── release ─┴─────────────────┘
                                         ↓
                                    ┌─────────┐ completion ┌──────────┐
                                    │ Release │ ─────────→ │ Disposed │
                                    └─────────┘            └──────────┘

Stages are derived from the captured timestamps, so asking for the stage at
any clock time never needs the renderer. `Disposed` is reported by the voice
that owns the envelope once its graph is gone.
*/

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,     // Not started
    Attack,   // Ramping 0 → peak
    Decay,    // Ramping peak → sustain level
    Sustain,  // Holding until release
    Release,  // Ramping current level → 0
    Disposed, // Graph torn down, terminal
}

#[derive(Debug, Clone)]
pub struct Envelope {
    config: EnvelopeConfig,
    peak: f32,
    triggered_at: Option<f64>,
    released_at: Option<f64>,
}

impl Envelope {
    pub fn new(config: EnvelopeConfig, peak: f32) -> Self {
        Self {
            config: config.sanitized(),
            peak: peak.clamp(0.0, 1.0),
            triggered_at: None,
            released_at: None,
        }
    }

    pub fn peak(&self) -> f32 {
        self.peak
    }

    pub fn sustain_level(&self) -> f32 {
        self.config.sustain * self.peak
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    /// Schedule attack, decay and the sustain hold starting at `now`.
    ///
    /// Returns false if the envelope was already triggered.
    pub fn trigger(&mut self, gain: &mut ParamTimeline, now: f64) -> bool {
        if self.triggered_at.is_some() {
            return false;
        }

        let attack_end = now + self.config.attack as f64;
        let decay_end = attack_end + self.config.decay as f64;

        gain.set_value_at_time(0.0, now);
        gain.linear_ramp_to_value_at_time(self.peak, attack_end);
        gain.linear_ramp_to_value_at_time(self.sustain_level(), decay_end);

        self.triggered_at = Some(now);
        true
    }

    /// Pin the gain at its current value and ramp it to zero.
    ///
    /// Returns the time the release ramp lands on zero, or `None` when the
    /// envelope is idle or already releasing.
    pub fn release(&mut self, gain: &mut ParamTimeline, now: f64) -> Option<f64> {
        if self.triggered_at.is_none() || self.released_at.is_some() {
            return None;
        }

        let current = gain.value_at(now);
        let release_end = now + self.config.release as f64;

        gain.cancel_scheduled_values(now);
        gain.set_value_at_time(current, now);
        gain.linear_ramp_to_value_at_time(0.0, release_end);

        self.released_at = Some(now);
        Some(release_end)
    }

    pub fn triggered_at(&self) -> Option<f64> {
        self.triggered_at
    }

    pub fn released_at(&self) -> Option<f64> {
        self.released_at
    }

    /// Stage of the envelope at clock time `time`.
    pub fn state_at(&self, time: f64) -> EnvelopeState {
        let Some(t0) = self.triggered_at else {
            return EnvelopeState::Idle;
        };

        if self.released_at.is_some_and(|ts| time >= ts) {
            return EnvelopeState::Release;
        }

        let attack_end = t0 + self.config.attack as f64;
        let decay_end = attack_end + self.config.decay as f64;

        if time < attack_end {
            EnvelopeState::Attack
        } else if time < decay_end {
            EnvelopeState::Decay
        } else {
            EnvelopeState::Sustain
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 1_000.0;

    fn voice_envelope(peak: f32) -> (Envelope, ParamTimeline) {
        (Envelope::new(EnvelopeConfig::default(), peak), ParamTimeline::new(0.0))
    }

    fn samples(gain: &ParamTimeline, from: f64, to: f64) -> Vec<f32> {
        let n = ((to - from) * SAMPLE_RATE).round() as usize;
        (0..=n)
            .map(|i| gain.value_at(from + i as f64 / SAMPLE_RATE))
            .collect()
    }

    #[test]
    fn attack_rises_to_peak() {
        let (mut env, mut gain) = voice_envelope(0.8);
        env.trigger(&mut gain, 1.0);

        let attack = samples(&gain, 1.0, 1.02);
        assert!(attack.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(attack[0], 0.0);
        assert!((attack.last().copied().unwrap_or_default() - 0.8).abs() < 1e-4);
    }

    #[test]
    fn decay_falls_to_sustain_and_holds() {
        let (mut env, mut gain) = voice_envelope(0.8);
        env.trigger(&mut gain, 0.0);

        let decay = samples(&gain, 0.02, 0.03);
        assert!(decay.windows(2).all(|w| w[1] <= w[0]));

        for t in [0.031, 0.5, 10.0, 1_000.0] {
            assert!((gain.value_at(t) - 0.4).abs() < 1e-5, "sustain at {t}");
        }
    }

    #[test]
    fn stages_follow_timestamps() {
        let (mut env, mut gain) = voice_envelope(1.0);
        assert_eq!(env.state_at(0.0), EnvelopeState::Idle);

        env.trigger(&mut gain, 2.0);
        assert_eq!(env.state_at(2.0), EnvelopeState::Attack);
        assert_eq!(env.state_at(2.025), EnvelopeState::Decay);
        assert_eq!(env.state_at(2.05), EnvelopeState::Sustain);

        env.release(&mut gain, 3.0);
        assert_eq!(env.state_at(2.5), EnvelopeState::Sustain);
        assert_eq!(env.state_at(3.0), EnvelopeState::Release);
        assert_eq!(env.state_at(9.0), EnvelopeState::Release);
    }

    #[test]
    fn release_from_sustain_reaches_zero() {
        let (mut env, mut gain) = voice_envelope(1.0);
        env.trigger(&mut gain, 0.0);

        let end = env.release(&mut gain, 1.0);
        assert_eq!(end, Some(1.5));
        assert!((gain.value_at(1.0) - 0.5).abs() < 1e-5);
        assert!((gain.value_at(1.25) - 0.25).abs() < 1e-5);
        assert_eq!(gain.value_at(1.5), 0.0);
        assert_eq!(gain.value_at(2.0), 0.0);
    }

    #[test]
    fn release_during_attack_is_continuous() {
        let (mut env, mut gain) = voice_envelope(1.0);
        env.trigger(&mut gain, 0.0);

        // Halfway up the attack ramp.
        let before = gain.value_at(0.01);
        env.release(&mut gain, 0.01);
        let after = gain.value_at(0.01);

        assert!((before - 0.5).abs() < 1e-4);
        assert!((after - before).abs() < 1e-6);

        let tail = samples(&gain, 0.01, 0.51);
        assert!(tail.windows(2).all(|w| w[1] <= w[0]));
        assert!(gain.value_at(0.51) < 1e-6);
    }

    #[test]
    fn release_during_decay_is_continuous() {
        let (mut env, mut gain) = voice_envelope(1.0);
        env.trigger(&mut gain, 0.0);

        let before = gain.value_at(0.025);
        env.release(&mut gain, 0.025);

        assert!((gain.value_at(0.025) - before).abs() < 1e-6);
        assert!(before < 1.0 && before > 0.5);
    }

    #[test]
    fn second_release_is_ignored() {
        let (mut env, mut gain) = voice_envelope(1.0);
        assert_eq!(env.release(&mut gain, 0.0), None);

        env.trigger(&mut gain, 0.0);
        assert!(env.release(&mut gain, 1.0).is_some());
        assert_eq!(env.release(&mut gain, 1.2), None);
        assert_eq!(env.released_at(), Some(1.0));
    }

    #[test]
    fn second_trigger_is_ignored() {
        let (mut env, mut gain) = voice_envelope(1.0);
        assert!(env.trigger(&mut gain, 0.0));
        assert!(!env.trigger(&mut gain, 0.5));
        assert_eq!(env.triggered_at(), Some(0.0));
    }
}
