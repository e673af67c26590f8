//! Patterns: named note collections that the pattern sequence arranges.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::note::Note;

/// Default pattern length in ticks (one 4/4 bar at 48 ticks per beat).
pub const DEFAULT_PATTERN_LENGTH: i32 = 192;

pub const DEFAULT_CATEGORY: &str = "not_categorized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Unique within a song; the sequence and virtual patterns refer to it
    pub name: String,
    pub category: String,
    pub length: i32,
    pub info: String,
    /// Notes keyed by position. Several notes may share a position; they keep
    /// insertion order.
    pub notes: BTreeMap<i32, Vec<Note>>,
    /// Names of patterns triggered together with this one
    pub virtual_patterns: BTreeSet<String>,
}

impl Pattern {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            length: DEFAULT_PATTERN_LENGTH,
            info: String::new(),
            notes: BTreeMap::new(),
            virtual_patterns: BTreeSet::new(),
        }
    }

    pub fn insert_note(&mut self, note: Note) {
        self.notes.entry(note.position).or_default().push(note);
    }

    /// Notes in position order.
    pub fn iter_notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.values().flatten()
    }

    pub fn note_count(&self) -> usize {
        self.notes.values().map(Vec::len).sum()
    }

    pub fn notes_at(&self, position: i32) -> &[Note] {
        self.notes.get(&position).map(Vec::as_slice).unwrap_or(&[])
    }
}
