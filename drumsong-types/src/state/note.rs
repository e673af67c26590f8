//! Notes and their textual pitch keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::InstrumentId;

pub const OCTAVE_MIN: i8 = -3;
pub const OCTAVE_MAX: i8 = 3;

/// Pitch class of a note key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Key {
    #[default]
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl Key {
    pub const ALL: [Key; 12] = [
        Key::C, Key::Cs, Key::D, Key::Ds, Key::E, Key::F,
        Key::Fs, Key::G, Key::Gs, Key::A, Key::As, Key::B,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Key::C => "C",
            Key::Cs => "Cs",
            Key::D => "D",
            Key::Ds => "Ds",
            Key::E => "E",
            Key::F => "F",
            Key::Fs => "Fs",
            Key::G => "G",
            Key::Gs => "Gs",
            Key::A => "A",
            Key::As => "As",
            Key::B => "B",
        }
    }

    pub fn from_name(s: &str) -> Option<Key> {
        Key::ALL.iter().copied().find(|k| k.as_str() == s)
    }
}

/// Pitch class plus octave, written as e.g. `C0`, `Fs-2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoteKey {
    pub key: Key,
    pub octave: i8,
}

impl NoteKey {
    pub fn new(key: Key, octave: i8) -> Self {
        Self {
            key,
            octave: octave.clamp(OCTAVE_MIN, OCTAVE_MAX),
        }
    }

    /// Parse the textual form. Returns `None` for an unknown key name or a
    /// missing/non-numeric octave.
    pub fn parse(s: &str) -> Option<NoteKey> {
        let split = s.find(|c: char| c == '-' || c.is_ascii_digit())?;
        let (name, octave) = s.split_at(split);
        let key = Key::from_name(name)?;
        let octave: i8 = octave.parse().ok()?;
        Some(NoteKey::new(key, octave))
    }
}

impl fmt::Display for NoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.key.as_str(), self.octave)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Tick position within the pattern
    pub position: i32,
    /// Humanization offset, -1.0 (lead) to 1.0 (lag)
    pub lead_lag: f32,
    pub velocity: f32,
    pub pan_l: f32,
    pub pan_r: f32,
    pub pitch: f32,
    pub probability: f32,
    pub key: NoteKey,
    /// Length in ticks, -1 = play the whole sample
    pub length: i32,
    pub note_off: bool,
    pub instrument: InstrumentId,
}

impl Note {
    pub fn new(instrument: InstrumentId, position: i32, velocity: f32) -> Self {
        Self {
            position,
            lead_lag: 0.0,
            velocity,
            pan_l: 0.5,
            pan_r: 0.5,
            pitch: 0.0,
            probability: 1.0,
            key: NoteKey::default(),
            length: -1,
            note_off: false,
            instrument,
        }
    }
}
