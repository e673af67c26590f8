//! # drumsong-types
//!
//! In-memory model of a drum-machine song: drum-kit components, instruments
//! with their layered samples, patterns, the pattern sequence, the timeline
//! and the velocity automation path.
//!
//! This crate is plain data. Reading and writing song files lives in
//! `drumsong-core`.

pub mod state;

pub use state::*;

/// Unique identifier for an instrument within a song.
///
/// Notes refer to their instrument by this id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct InstrumentId(i32);

impl InstrumentId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }
    pub fn get(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a drum-kit component (e.g. "Main", "Room").
/// Instrument components point back at one of these.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct ComponentId(i32);

impl ComponentId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }
    pub fn get(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
