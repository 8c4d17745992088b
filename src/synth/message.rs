use rtrb::Producer;
use snafu::ensure;

use crate::error::{NoteOutOfRangeSnafu, QueueFullSnafu, SynthError};

pub const MAX_NOTE: u8 = 127;
pub const MAX_VELOCITY: u8 = 127;

/// Control messages sent from a UI/MIDI thread to the audio thread.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    AllNotesOff,
}

/// Lifecycle notifications published by the audio thread.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthEvent {
    VoiceStarted {
        note: u8,
        frequency: f32,
        amplitude: f32,
    },
    VoiceReleased {
        note: u8,
    },
    VoiceDisposed {
        note: u8,
    },
}

impl SynthEvent {
    pub fn note(&self) -> u8 {
        match *self {
            SynthEvent::VoiceStarted { note, .. }
            | SynthEvent::VoiceReleased { note }
            | SynthEvent::VoiceDisposed { note } => note,
        }
    }
}

/// Control-side end of the message queue.
///
/// Checks notes before they reach the audio thread and clamps velocity.
pub struct SynthHandle {
    tx: Producer<SynthMessage>,
}

impl SynthHandle {
    pub(crate) fn new(tx: Producer<SynthMessage>) -> Self {
        Self { tx }
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) -> Result<(), SynthError> {
        ensure!(note <= MAX_NOTE, NoteOutOfRangeSnafu { note });
        self.send(SynthMessage::NoteOn {
            note,
            velocity: velocity.min(MAX_VELOCITY),
        })
    }

    pub fn note_off(&mut self, note: u8) -> Result<(), SynthError> {
        ensure!(note <= MAX_NOTE, NoteOutOfRangeSnafu { note });
        self.send(SynthMessage::NoteOff { note })
    }

    pub fn all_notes_off(&mut self) -> Result<(), SynthError> {
        self.send(SynthMessage::AllNotesOff)
    }

    pub fn send(&mut self, message: SynthMessage) -> Result<(), SynthError> {
        if self.tx.push(message).is_err() {
            return QueueFullSnafu {
                message: format!("{message:?}"),
            }
            .fail();
        }
        Ok(())
    }

    /// Free slots left in the queue.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrb::RingBuffer;

    #[test]
    fn forwards_messages_in_order() {
        let (tx, mut rx) = RingBuffer::new(8);
        let mut handle = SynthHandle::new(tx);

        handle.note_on(60, 100).unwrap();
        handle.note_off(60).unwrap();
        handle.all_notes_off().unwrap();

        let received: Vec<_> = std::iter::from_fn(|| rx.pop().ok()).collect();
        assert_eq!(
            received,
            vec![
                SynthMessage::NoteOn {
                    note: 60,
                    velocity: 100
                },
                SynthMessage::NoteOff { note: 60 },
                SynthMessage::AllNotesOff,
            ]
        );
    }

    #[test]
    fn rejects_out_of_range_notes() {
        let (tx, mut rx) = RingBuffer::new(8);
        let mut handle = SynthHandle::new(tx);

        assert_eq!(
            handle.note_on(128, 100),
            Err(SynthError::NoteOutOfRange { note: 128 })
        );
        assert_eq!(
            handle.note_off(200),
            Err(SynthError::NoteOutOfRange { note: 200 })
        );
        assert!(rx.pop().is_err());
    }

    #[test]
    fn clamps_velocity() {
        let (tx, mut rx) = RingBuffer::new(8);
        let mut handle = SynthHandle::new(tx);

        handle.note_on(60, 255).unwrap();
        assert_eq!(
            rx.pop().ok(),
            Some(SynthMessage::NoteOn {
                note: 60,
                velocity: 127
            })
        );
    }

    #[test]
    fn full_queue_is_an_error() {
        let (tx, _rx) = RingBuffer::new(1);
        let mut handle = SynthHandle::new(tx);

        handle.note_on(60, 100).unwrap();
        let err = handle.note_on(61, 100).unwrap_err();
        assert!(matches!(err, SynthError::QueueFull { .. }));
        assert!(err.to_string().contains("NoteOn"));
    }
}
