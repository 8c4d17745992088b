use crate::{io::midi::MidiEvent, synth::message::SynthMessage};

/// Translate a decoded MIDI event into a synth message.
///
/// `channel_filter` of `None` listens on every channel (omni). A note-on with
/// velocity 0 is a note-off, as running-status keyboards send it.
pub fn midi_to_synth(midi: MidiEvent, channel_filter: Option<u8>) -> Option<SynthMessage> {
    if channel_filter.is_some_and(|channel| channel != midi.channel()) {
        return None;
    }

    match midi {
        MidiEvent::NoteOn {
            key, velocity: 0, ..
        } => Some(SynthMessage::NoteOff { note: key }),
        MidiEvent::NoteOn { key, velocity, .. } => Some(SynthMessage::NoteOn {
            note: key,
            velocity,
        }),
        MidiEvent::NoteOff { key, .. } => Some(SynthMessage::NoteOff { note: key }),
    }
}

/// Equal-tempered frequency with A4 (note 69) at 440 Hz.
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Cubic velocity curve: soft notes drop off quickly, 127 is full scale.
pub fn velocity_to_amplitude(velocity: u8) -> f32 {
    (velocity.min(127) as f32 / 127.0).powi(3)
}
