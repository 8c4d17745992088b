pub mod config;
pub mod dsp;
pub mod error;
pub mod graph; // Voice-level audio nodes
pub mod io;
pub mod synth; // Voices, polyphony table and the engine
pub mod theory; // Keys and scales for front ends

pub use config::{EnvelopeConfig, SynthConfig};
pub use error::{ConfigError, ParseScaleError, SynthError};
pub use synth::{poly::PolySynth, message::SynthHandle};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
