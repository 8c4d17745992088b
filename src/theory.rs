use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;

use crate::error::{ParseScaleError, ParseScaleSnafu};

/*
Keys and Scales
===============

A key is a root pitch class (C = 0 ... B = 11). A scale is an ordered list of
semitone offsets from that root. Together they give the pitch classes the
front end maps its keys onto:

    pitch_classes(key, scale) = [(d + key) % 12 for d in scale]

Turning a scale degree into a MIDI note keeps the offsets un-wrapped so the
notes climb within an octave, and degrees past the end of the scale continue
into the next octave:

    note = 12 * (octave + 1) + key + scale[degree % len] + 12 * (degree / len)

Example usage:
  let scale: Scale = "Hirajoshi".parse()?;
  let classes = pitch_classes(Key::D, scale);     // [2, 4, 5, 9, 10]
  let note = scale.note(Key::D, 5, 4);            // Some(74), D5
*/

pub const PITCH_CLASSES: u8 = 12;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Key {
    #[default]
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Key {
    pub const ALL: [Key; 12] = [
        Key::C,
        Key::CSharp,
        Key::D,
        Key::DSharp,
        Key::E,
        Key::F,
        Key::FSharp,
        Key::G,
        Key::GSharp,
        Key::A,
        Key::ASharp,
        Key::B,
    ];

    /// Semitones above C.
    pub fn offset(self) -> u8 {
        self as u8
    }

    pub fn from_offset(offset: u8) -> Key {
        Key::ALL[(offset % PITCH_CLASSES) as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Key::C => "C",
            Key::CSharp => "C#/D♭",
            Key::D => "D",
            Key::DSharp => "D#/E♭",
            Key::E => "E",
            Key::F => "F",
            Key::FSharp => "F#/G♭",
            Key::G => "G",
            Key::GSharp => "G#/A♭",
            Key::A => "A",
            Key::ASharp => "A#/B♭",
            Key::B => "B",
        }
    }

    pub fn up(self) -> Key {
        Key::from_offset(self.offset() + 1)
    }

    pub fn down(self) -> Key {
        Key::from_offset(self.offset() + PITCH_CLASSES - 1)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scale {
    #[default]
    Major,
    NaturalMinor,
    HarmonicMinor,
    MelodicMinor,
    MajorPentatonic,
    MinorPentatonic,
    Blues,
    PerfectFifth,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
    WholeTone,
    Chromatic,
    OctatonicHalfWhole,
    OctatonicWholeHalf,
    HungarianMinor,
    Persian,
    Arabic,
    NeapolitanMinor,
    NeapolitanMajor,
    Enigmatic,
    DoubleHarmonic,
    Pelog,
    Yo,
    Hirajoshi,
    Iwato,
}

impl Scale {
    pub const ALL: [Scale; 28] = [
        Scale::Major,
        Scale::NaturalMinor,
        Scale::HarmonicMinor,
        Scale::MelodicMinor,
        Scale::MajorPentatonic,
        Scale::MinorPentatonic,
        Scale::Blues,
        Scale::PerfectFifth,
        Scale::Dorian,
        Scale::Phrygian,
        Scale::Lydian,
        Scale::Mixolydian,
        Scale::Locrian,
        Scale::WholeTone,
        Scale::Chromatic,
        Scale::OctatonicHalfWhole,
        Scale::OctatonicWholeHalf,
        Scale::HungarianMinor,
        Scale::Persian,
        Scale::Arabic,
        Scale::NeapolitanMinor,
        Scale::NeapolitanMajor,
        Scale::Enigmatic,
        Scale::DoubleHarmonic,
        Scale::Pelog,
        Scale::Yo,
        Scale::Hirajoshi,
        Scale::Iwato,
    ];

    /// Semitone offsets from the root, ascending.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::NaturalMinor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            Scale::MelodicMinor => &[0, 2, 3, 5, 7, 9, 11],
            Scale::MajorPentatonic => &[0, 2, 4, 7, 9],
            Scale::MinorPentatonic => &[0, 3, 5, 7, 10],
            Scale::Blues => &[0, 3, 5, 6, 7, 10],
            Scale::PerfectFifth => &[0, 7],
            Scale::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            Scale::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            Scale::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            Scale::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
            Scale::Locrian => &[0, 1, 3, 5, 6, 8, 10],
            Scale::WholeTone => &[0, 2, 4, 6, 8, 10],
            Scale::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
            Scale::OctatonicHalfWhole => &[0, 1, 3, 4, 6, 7, 9, 10],
            Scale::OctatonicWholeHalf => &[0, 2, 3, 5, 6, 8, 9, 11],
            Scale::HungarianMinor => &[0, 2, 3, 6, 7, 8, 11],
            Scale::Persian => &[0, 1, 4, 5, 6, 8, 11],
            Scale::Arabic => &[0, 2, 4, 5, 6, 8, 10],
            Scale::NeapolitanMinor => &[0, 1, 3, 5, 7, 8, 11],
            Scale::NeapolitanMajor => &[0, 1, 3, 5, 7, 9, 11],
            Scale::Enigmatic => &[0, 1, 4, 6, 8, 10, 11],
            Scale::DoubleHarmonic => &[0, 1, 4, 5, 7, 8, 11],
            Scale::Pelog => &[0, 1, 3, 7, 8],
            Scale::Yo => &[0, 2, 3, 7, 9],
            Scale::Hirajoshi => &[0, 2, 3, 7, 8],
            Scale::Iwato => &[0, 1, 5, 6, 10],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scale::Major => "Major",
            Scale::NaturalMinor => "Natural Minor",
            Scale::HarmonicMinor => "Harmonic Minor",
            Scale::MelodicMinor => "Melodic Minor",
            Scale::MajorPentatonic => "Major Pentatonic",
            Scale::MinorPentatonic => "Minor Pentatonic",
            Scale::Blues => "Blues",
            Scale::PerfectFifth => "Perfect 5th",
            Scale::Dorian => "Dorian",
            Scale::Phrygian => "Phrygian",
            Scale::Lydian => "Lydian",
            Scale::Mixolydian => "Mixolydian",
            Scale::Locrian => "Locrian",
            Scale::WholeTone => "Whole Tone",
            Scale::Chromatic => "Chromatic",
            Scale::OctatonicHalfWhole => "Octatonic (Half-Whole)",
            Scale::OctatonicWholeHalf => "Octatonic (Whole-Half)",
            Scale::HungarianMinor => "Hungarian Minor",
            Scale::Persian => "Persian",
            Scale::Arabic => "Arabic",
            Scale::NeapolitanMinor => "Neapolitan Minor",
            Scale::NeapolitanMajor => "Neapolitan Major",
            Scale::Enigmatic => "Enigmatic",
            Scale::DoubleHarmonic => "Double Harmonic",
            Scale::Pelog => "Pelog",
            Scale::Yo => "Yo Scale",
            Scale::Hirajoshi => "Hirajoshi",
            Scale::Iwato => "Iwato",
        }
    }

    /// Next scale in display order, wrapping around.
    pub fn next(self) -> Scale {
        Scale::ALL[(self as usize + 1) % Scale::ALL.len()]
    }

    pub fn previous(self) -> Scale {
        Scale::ALL[(self as usize + Scale::ALL.len() - 1) % Scale::ALL.len()]
    }

    /// MIDI note for a scale degree in `key`, counting octaves from C-1 = 0.
    ///
    /// Returns `None` when the note falls outside 0-127.
    pub fn note(self, key: Key, degree: usize, octave: i8) -> Option<u8> {
        let intervals = self.intervals();
        let octave_shift = i32::try_from(degree / intervals.len()).ok()?;
        let interval = intervals[degree % intervals.len()] as i32;

        let note = octave_shift
            .checked_add(octave as i32 + 1)?
            .checked_mul(12)?
            .checked_add(key.offset() as i32 + interval)?;
        u8::try_from(note).ok().filter(|&n| n <= 127)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scale {
    type Err = ParseScaleError;

    /// Parse a display name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        match Scale::ALL
            .into_iter()
            .find(|scale| scale.name().eq_ignore_ascii_case(name))
        {
            Some(scale) => Ok(scale),
            None => ParseScaleSnafu { name }.fail(),
        }
    }
}

/// Pitch classes of `scale` rooted at `key`, in scale order.
pub fn pitch_classes(key: Key, scale: Scale) -> ArrayVec<u8, 12> {
    scale
        .intervals()
        .iter()
        .map(|d| (d + key.offset()) % PITCH_CLASSES)
        .collect()
}
