//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They stay focused on the math; the
//! graph layer decides when and for how long they run.

/// Timestamped value curves (set / linear ramp / cancel).
pub mod automation;
/// ADSR shape written onto an automation timeline.
pub mod envelope;
/// State-variable filter with biquad-style cutoff and Q.
pub mod filter;
/// Oscillator waveforms.
pub mod oscillator;

pub use envelope::EnvelopeState;
