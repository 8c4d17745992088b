/// Channel voice messages the synth reacts to.
///
/// Only note-on and note-off are decoded; everything else on the wire is
/// skipped by [`MidiEvent::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
}

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;

impl MidiEvent {
    /// Decode a single three-byte channel message.
    ///
    /// Data bytes are masked to seven bits. Returns `None` for short input and
    /// for any status other than note-on/note-off.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let &[status, key, velocity, ..] = bytes else {
            log::debug!("ignoring short MIDI message {bytes:02x?}");
            return None;
        };

        let channel = status & 0x0f;
        let key = key & 0x7f;
        let velocity = velocity & 0x7f;

        match status & 0xf0 {
            NOTE_ON => Some(MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            }),
            NOTE_OFF => Some(MidiEvent::NoteOff {
                channel,
                key,
                velocity,
            }),
            _ => None,
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. } | MidiEvent::NoteOff { channel, .. } => channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_note_on_with_channel() {
        assert_eq!(
            MidiEvent::parse(&[0x93, 60, 100]),
            Some(MidiEvent::NoteOn {
                channel: 3,
                key: 60,
                velocity: 100
            })
        );
    }

    #[test]
    fn parses_note_off() {
        assert_eq!(
            MidiEvent::parse(&[0x80, 64, 0]),
            Some(MidiEvent::NoteOff {
                channel: 0,
                key: 64,
                velocity: 0
            })
        );
    }

    #[test]
    fn skips_other_messages() {
        // Control change, pitch bend, truncated input
        assert_eq!(MidiEvent::parse(&[0xb0, 7, 100]), None);
        assert_eq!(MidiEvent::parse(&[0xe0, 0, 64]), None);
        assert_eq!(MidiEvent::parse(&[0x90, 60]), None);
        assert_eq!(MidiEvent::parse(&[]), None);
    }

    #[test]
    fn masks_data_bytes() {
        let event = MidiEvent::parse(&[0x90, 0xff, 0xff]);
        assert_eq!(
            event,
            Some(MidiEvent::NoteOn {
                channel: 0,
                key: 127,
                velocity: 127
            })
        );
    }
}
