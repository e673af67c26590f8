//! Timeline markers: tempo changes and text tags placed on bars.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoMarker {
    pub bar: i32,
    pub bpm: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagMarker {
    pub bar: i32,
    pub tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub tempo_markers: Vec<TempoMarker>,
    pub tags: Vec<TagMarker>,
}

impl Timeline {
    pub fn add_tempo_marker(&mut self, bar: i32, bpm: f32) {
        self.tempo_markers.push(TempoMarker { bar, bpm });
    }

    pub fn add_tag(&mut self, bar: i32, tag: &str) {
        self.tags.push(TagMarker {
            bar,
            tag: tag.to_string(),
        });
    }
}
