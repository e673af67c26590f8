//! # drumsong-core
//!
//! Song file codec for the drumsong drum machine: saves the in-memory song
//! model as an XML document and loads it back, including files written by
//! the old writer that escaped every non-ASCII byte separately.
//!
//! ## Module Overview
//!
//! - [`persistence`]: `save_song()` / `load_song()`, the document read/write
//!   primitives, legacy-dialect detection and repair, and pattern files
//! - [`paths`]: `DrumkitRoots`: where installed drum kits live, and how sample
//!   paths are stored relative to their kit
//! - [`fx`]: `EffectHost`, the read-only view of the effect rack used when saving
//! - [`config`]: TOML configuration (song defaults, drum-kit roots; embedded + user override)
//! - [`state`]: re-export of the `drumsong-types` song model

pub mod config;
pub mod fx;
pub mod paths;
pub mod persistence;

pub use drumsong_types as state;

/// Version string written into every saved song.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
