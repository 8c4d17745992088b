//! Computer keyboard layout and note gates

use crossterm::event::KeyCode;
use std::time::{Duration, Instant};

/// Velocity for every key press; the terminal has no touch sensitivity.
pub const VELOCITY: u8 = 100;
pub const MIN_OCTAVE: i8 = 0;
pub const MAX_OCTAVE: i8 = 8;

/// Home row plays degrees 0-9 at the current octave.
const HOME_ROW: [char; 10] = ['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l', ';'];
/// Number row plays the same degrees one octave up.
const NUMBER_ROW: [char; 10] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '0'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Play { degree: usize, octave_up: bool },
    KeyUp,
    KeyDown,
    OctaveUp,
    OctaveDown,
    NextScale,
    PreviousScale,
    Panic,
    Quit,
}

pub fn map_key(code: KeyCode) -> Option<KeyAction> {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char(' ') => Some(KeyAction::Panic),
        KeyCode::Right => Some(KeyAction::KeyUp),
        KeyCode::Left => Some(KeyAction::KeyDown),
        KeyCode::Up => Some(KeyAction::OctaveUp),
        KeyCode::Down => Some(KeyAction::OctaveDown),
        KeyCode::Tab => Some(KeyAction::NextScale),
        KeyCode::BackTab => Some(KeyAction::PreviousScale),
        KeyCode::Char(c) => {
            let c = c.to_ascii_lowercase();
            if let Some(degree) = HOME_ROW.iter().position(|&k| k == c) {
                Some(KeyAction::Play {
                    degree,
                    octave_up: false,
                })
            } else {
                NUMBER_ROW.iter().position(|&k| k == c).map(|degree| KeyAction::Play {
                    degree,
                    octave_up: true,
                })
            }
        }
        _ => None,
    }
}

/// Notes held open by a key press, each until its deadline passes.
///
/// Terminals report presses but not releases, so every press holds its note
/// for a fixed gate. Pressing the key again while the gate is open extends it.
pub struct Gates {
    length: Duration,
    open: Vec<(u8, Instant)>,
}

impl Gates {
    pub fn new(length: Duration) -> Self {
        Self {
            length,
            open: Vec::new(),
        }
    }

    /// Open a gate for `note`. Returns true if the note needs a note-on.
    pub fn open(&mut self, note: u8, now: Instant) -> bool {
        let deadline = now + self.length;
        match self.open.iter_mut().find(|(n, _)| *n == note) {
            Some((_, held_until)) => {
                *held_until = deadline;
                false
            }
            None => {
                self.open.push((note, deadline));
                true
            }
        }
    }

    /// Close and return every gate whose deadline has passed.
    pub fn expired(&mut self, now: Instant) -> Vec<u8> {
        let mut closed = Vec::new();
        self.open.retain(|&(note, deadline)| {
            let keep = deadline > now;
            if !keep {
                closed.push(note);
            }
            keep
        });
        closed
    }

    pub fn clear(&mut self) {
        self.open.clear();
    }
}
