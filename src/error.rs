use snafu::Snafu;

/// Errors raised at the boundary between control code and the audio thread.
#[derive(Debug, Snafu, Clone, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum SynthError {
    #[snafu(display("note {note} is outside the MIDI range 0-127"))]
    NoteOutOfRange { note: u8 },

    #[snafu(display("message queue is full, dropped {message}"))]
    QueueFull { message: String },
}

#[derive(Debug, Snafu, Clone, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("sample rate must be positive, got {sample_rate}"))]
    InvalidSampleRate { sample_rate: f32 },

    #[snafu(display("{stage} time must be a non-negative number of seconds, got {seconds}"))]
    InvalidEnvelopeTime { stage: &'static str, seconds: f32 },

    #[snafu(display("sustain level must be within 0.0-1.0, got {sustain}"))]
    InvalidSustain { sustain: f32 },

    #[snafu(display("master gain must be non-negative, got {gain}"))]
    InvalidMasterGain { gain: f32 },

    #[snafu(display("{queue} queue needs a capacity above zero, got {capacity}"))]
    InvalidQueueCapacity {
        queue: &'static str,
        capacity: usize,
    },
}

#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(display("unknown scale name {name:?}"))]
#[snafu(visibility(pub(crate)))]
pub struct ParseScaleError {
    name: String,
}
