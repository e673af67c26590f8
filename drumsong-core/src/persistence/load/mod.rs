use xmltree::Element;

use crate::paths::DrumkitRoots;
use crate::state::{EffectInfo, Song};

mod arrangement;
pub(crate) mod decoders;
mod instruments;
pub(crate) mod patterns;
mod song;

/// Everything a song file holds.
#[derive(Debug, Clone)]
pub struct LoadedSong {
    pub song: Song,
    /// Effect slots as recorded in the file (`None` = empty slot), for the
    /// caller to hand to its effect host.
    pub effects: Vec<Option<EffectInfo>>,
    /// Version of the application that wrote the file
    pub version: String,
}

/// Build the song model from a parsed `<song>` element.
///
/// Collections are loaded in dependency order so every reference can be
/// checked against what already exists: components before instruments,
/// instruments before notes, all patterns before virtual patterns and the
/// sequence.
pub fn song_from_element(root: &Element, roots: &DrumkitRoots) -> LoadedSong {
    let mut song = Song::new();

    let version = song::load_song_fields(root, &mut song);
    if version != crate::VERSION {
        log::info!(target: "persistence",
            "song was written by version {} (this is {})", version, crate::VERSION);
    }

    instruments::load_components(root, &mut song);
    instruments::load_instruments(root, roots, &mut song);
    patterns::load_patterns(root, &mut song);
    patterns::load_virtual_patterns(root, &mut song);
    patterns::load_pattern_sequence(root, &mut song);
    let effects = arrangement::load_effects(root);
    arrangement::load_timeline(root, &mut song);
    arrangement::load_automation(root, &mut song);

    log::info!(target: "persistence",
        "loaded '{}': {} instruments, {} patterns, {} notes",
        song.name, song.instruments.len(), song.patterns.len(), song.note_count());

    LoadedSong {
        song,
        effects,
        version,
    }
}
