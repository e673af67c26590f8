//! Single-pattern export files.
//!
//! A pattern file holds one `<pattern>` (laid out exactly as inside a song)
//! plus the name of the drum kit it was written for.

use std::path::Path;

use xmltree::Element;

use crate::state::{Instrument, Pattern};

use super::document::{self, read_string, write_string, FieldPolicy};
use super::load::patterns::load_pattern_element;
use super::save;
use super::CodecError;

/// Root element of a pattern document.
pub const PATTERN_ROOT: &str = "drumkit_pattern";

pub fn save_pattern(path: &Path, pattern: &Pattern, drumkit_name: &str) -> Result<(), CodecError> {
    log::info!(target: "persistence", "saving pattern '{}' to {}", pattern.name, path.display());

    let mut root = Element::new(PATTERN_ROOT);
    write_string(&mut root, "drumkit_name", drumkit_name);
    document::append(&mut root, save::save_pattern(pattern));
    document::save_document(path, &root)
}

/// Load the pattern in `path`. Notes for instruments not in `instruments`
/// are dropped.
pub fn load_pattern(path: &Path, instruments: &[Instrument]) -> Result<Pattern, CodecError> {
    log::info!(target: "persistence", "loading pattern {}", path.display());

    let root = pattern_root(path)?;
    let Some(node) = root.get_child("pattern") else {
        return Err(CodecError::MissingRoot {
            path: path.to_path_buf(),
            expected: "pattern",
        });
    };
    Ok(load_pattern_element(node, instruments))
}

/// Name of the drum kit a pattern file was made for, or `None` if the file
/// cannot be read or is not a pattern file.
pub fn drumkit_name_for_pattern(path: &Path) -> Option<String> {
    let root = match pattern_root(path) {
        Ok(root) => root,
        Err(e) => {
            log::warn!(target: "persistence", "{}", e);
            return None;
        }
    };

    let name = match root.get_child("drumkit_name") {
        Some(_) => read_string(Some(&root), "drumkit_name", "", FieldPolicy::TEXT),
        // Older pattern files
        None => read_string(Some(&root), "pattern_for_drumkit", "", FieldPolicy::TEXT),
    };
    Some(name)
}

fn pattern_root(path: &Path) -> Result<Element, CodecError> {
    let root = document::open_document(path)?;
    if root.name != PATTERN_ROOT {
        return Err(CodecError::MissingRoot {
            path: path.to_path_buf(),
            expected: PATTERN_ROOT,
        });
    }
    Ok(root)
}
