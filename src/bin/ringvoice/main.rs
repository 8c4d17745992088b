//! ringvoice - play the ring-mod synth from the terminal keyboard or MIDI
//!
//! Run with: cargo run
//! Set RINGVOICE_LOG=debug (or trace, info, ...) to log to stderr.
//! Set RINGVOICE_MIDI_CHANNEL=1..16 to listen on one channel; default is all.

mod app;
mod midi;
mod ui;

use app::Ringvoice;
use color_eyre::eyre::{ensure, Result as EyreResult, WrapErr};
use ringvoice::theory::{Key, Scale};

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    Ringvoice::new()
        .key(Key::C)
        .scale(Scale::MinorPentatonic)
        .octave(4)
        .midi_channel(midi_channel()?)
        .run()
}

/// Channel from RINGVOICE_MIDI_CHANNEL, numbered 1-16 as on hardware.
fn midi_channel() -> EyreResult<Option<u8>> {
    let Ok(channel) = std::env::var("RINGVOICE_MIDI_CHANNEL") else {
        return Ok(None);
    };

    let channel = channel
        .trim()
        .parse::<u8>()
        .wrap_err_with(|| format!("RINGVOICE_MIDI_CHANNEL is not a number: {channel:?}"))?;
    ensure!(
        (1..=16).contains(&channel),
        "RINGVOICE_MIDI_CHANNEL must be 1-16, got {channel}"
    );
    Ok(Some(channel - 1))
}

fn init_logging() -> EyreResult<()> {
    let Ok(level) = std::env::var("RINGVOICE_LOG") else {
        return Ok(());
    };

    let level = level
        .parse::<log::LevelFilter>()
        .wrap_err_with(|| format!("RINGVOICE_LOG has an unknown level {level:?}"))?;
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .wrap_err("failed to install logger")
}
