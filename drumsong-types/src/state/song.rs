//! Song-level state: scalar settings plus ownership of every collection.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::automation::AutomationPath;
use super::component::DrumkitComponent;
use super::instrument::Instrument;
use super::pattern::Pattern;
use super::sequence::PatternSequence;
use super::timeline::Timeline;
use crate::{ComponentId, InstrumentId};

/// Whether playback follows the pattern sequence or loops the selected pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SongMode {
    /// Follow the pattern sequence (timeline)
    Song,
    /// Loop a fixed pattern selection
    #[default]
    Pattern,
}

/// The subset of song fields that a fresh song takes from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongDefaults {
    pub bpm: f32,
    pub volume: f32,
    pub metronome_volume: f32,
    pub author: String,
}

impl Default for SongDefaults {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            volume: 0.5,
            metronome_volume: 0.5,
            author: "Unknown Author".to_string(),
        }
    }
}

/// A complete song: the unit that is saved to and loaded from a song file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub bpm: f32,
    pub volume: f32,
    pub metronome_volume: f32,
    pub name: String,
    pub author: String,
    pub notes: String,
    pub license: String,
    pub loop_enabled: bool,
    /// In pattern mode, play only the selected pattern(s)
    pub pattern_mode_plays_selected: bool,
    pub playback_track_filename: String,
    pub playback_track_enabled: bool,
    pub playback_track_volume: f32,
    pub mode: SongMode,
    pub humanize_time: f32,
    pub humanize_velocity: f32,
    pub swing_factor: f32,

    pub components: Vec<DrumkitComponent>,
    pub instruments: Vec<Instrument>,
    pub patterns: Vec<Pattern>,
    pub pattern_sequence: PatternSequence,
    pub timeline: Timeline,
    pub velocity_automation: Option<AutomationPath>,

    /// File this song was last saved to or loaded from
    #[serde(skip)]
    pub filename: Option<PathBuf>,
    /// Whether the song changed since the last save
    #[serde(skip)]
    pub is_modified: bool,
}

impl Default for Song {
    fn default() -> Self {
        Self::new_with_defaults(SongDefaults::default())
    }
}

impl Song {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_defaults(defaults: SongDefaults) -> Self {
        Self {
            bpm: defaults.bpm,
            volume: defaults.volume,
            metronome_volume: defaults.metronome_volume,
            name: "Untitled Song".to_string(),
            author: defaults.author,
            notes: String::new(),
            license: String::new(),
            loop_enabled: false,
            pattern_mode_plays_selected: true,
            playback_track_filename: String::new(),
            playback_track_enabled: false,
            playback_track_volume: 0.0,
            mode: SongMode::Pattern,
            humanize_time: 0.0,
            humanize_velocity: 0.0,
            swing_factor: 0.0,
            components: Vec::new(),
            instruments: Vec::new(),
            patterns: Vec::new(),
            pattern_sequence: PatternSequence::default(),
            timeline: Timeline::default(),
            velocity_automation: None,
            filename: None,
            is_modified: false,
        }
    }

    pub fn component(&self, id: ComponentId) -> Option<&DrumkitComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn instrument(&self, id: InstrumentId) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.id == id)
    }

    pub fn instrument_mut(&mut self, id: InstrumentId) -> Option<&mut Instrument> {
        self.instruments.iter_mut().find(|i| i.id == id)
    }

    /// First pattern with the given name. Names are expected to be unique.
    pub fn pattern(&self, name: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    pub fn pattern_mut(&mut self, name: &str) -> Option<&mut Pattern> {
        self.patterns.iter_mut().find(|p| p.name == name)
    }

    /// Total number of notes over all patterns.
    pub fn note_count(&self) -> usize {
        self.patterns.iter().map(|p| p.note_count()).sum()
    }
}
