pub mod document;
mod error;
pub mod legacy;
pub mod load;
pub mod pattern_file;
pub mod save;
#[cfg(test)]
mod tests;

pub use document::FieldPolicy;
pub use error::CodecError;
pub use load::LoadedSong;
pub use pattern_file::{drumkit_name_for_pattern, load_pattern, save_pattern};

use std::path::Path;

use crate::fx::EffectHost;
use crate::paths::DrumkitRoots;
use crate::state::Song;

/// Root element of a song document.
pub const SONG_ROOT: &str = "song";

/// Label recorded for an empty effect slot.
pub const NO_PLUGIN: &str = "no plugin";

/// Collaborators consulted while saving. Nothing in here is modified.
#[derive(Clone, Copy)]
pub struct SaveContext<'a> {
    pub roots: &'a DrumkitRoots,
    /// `None` when no effect host is available; all slots are then stored empty.
    pub effects: Option<&'a dyn EffectHost>,
    /// Application version recorded in the file
    pub version: &'a str,
}

impl<'a> SaveContext<'a> {
    pub fn new(roots: &'a DrumkitRoots) -> Self {
        Self {
            roots,
            effects: None,
            version: crate::VERSION,
        }
    }

    pub fn with_effects(mut self, host: &'a dyn EffectHost) -> Self {
        self.effects = Some(host);
        self
    }

    pub fn with_version(mut self, version: &'a str) -> Self {
        self.version = version;
        self
    }
}

/// Save `song` to `path` in the current dialect.
///
/// Only after the file is written and non-empty does the song get marked
/// unmodified and remember `path`; on error it is left untouched. There is no
/// temp-file swap, so a failed save may already have truncated the old file.
pub fn save_song(path: &Path, song: &mut Song, ctx: &SaveContext<'_>) -> Result<(), CodecError> {
    log::info!(target: "persistence", "saving song {}", path.display());

    let root = save::song_to_element(song, ctx);
    if let Err(e) = document::save_document(path, &root) {
        log::warn!(target: "persistence", "song save reported an error: {}", e);
        return Err(e);
    }

    song.is_modified = false;
    song.filename = Some(path.to_path_buf());
    log::info!(target: "persistence", "save was successful");
    Ok(())
}

/// Load a song from `path`, in either dialect.
///
/// Only document-level problems are errors. Missing or malformed fields take
/// their defaults, and dangling references (unknown instrument ids, component
/// ids or pattern names) are dropped with a warning.
pub fn load_song(path: &Path, roots: &DrumkitRoots) -> Result<LoadedSong, CodecError> {
    log::info!(target: "persistence", "loading song {}", path.display());

    let root = document::open_document(path)?;
    if root.name != SONG_ROOT {
        return Err(CodecError::MissingRoot {
            path: path.to_path_buf(),
            expected: SONG_ROOT,
        });
    }

    let mut loaded = load::song_from_element(&root, roots);
    loaded.song.filename = Some(path.to_path_buf());
    loaded.song.is_modified = false;
    Ok(loaded)
}
