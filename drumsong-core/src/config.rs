use std::path::PathBuf;

use serde::Deserialize;

use crate::paths::DrumkitRoots;
use crate::state::SongDefaults;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
    #[serde(default)]
    drumkits: DrumkitsConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    bpm: Option<f32>,
    volume: Option<f32>,
    metronome_volume: Option<f32>,
    author: Option<String>,
}

#[derive(Deserialize, Default)]
struct DrumkitsConfig {
    user: Option<PathBuf>,
    system: Option<PathBuf>,
}

pub struct Config {
    defaults: DefaultsConfig,
    drumkits: DrumkitsConfig,
}

impl Config {
    pub fn load() -> Self {
        let mut base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");

        if let Some(path) = user_config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => merge(&mut base, user),
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            defaults: base.defaults,
            drumkits: base.drumkits,
        }
    }

    /// Parse a config from TOML text layered over the embedded defaults.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        let mut base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");
        let user: ConfigFile = toml::from_str(contents)?;
        merge(&mut base, user);
        Ok(Config {
            defaults: base.defaults,
            drumkits: base.drumkits,
        })
    }

    /// Settings for new songs.
    pub fn defaults(&self) -> SongDefaults {
        let fallback = SongDefaults::default();
        SongDefaults {
            bpm: self.defaults.bpm.unwrap_or(fallback.bpm).clamp(MIN_BPM, MAX_BPM),
            volume: self.defaults.volume.unwrap_or(fallback.volume),
            metronome_volume: self
                .defaults
                .metronome_volume
                .unwrap_or(fallback.metronome_volume),
            author: self.defaults.author.clone().unwrap_or(fallback.author),
        }
    }

    /// Directories where installed drum kits live.
    pub fn drumkit_roots(&self) -> DrumkitRoots {
        let fallback = DrumkitRoots::default();
        DrumkitRoots::new(
            self.drumkits.user.clone().unwrap_or(fallback.user),
            self.drumkits.system.clone().unwrap_or(fallback.system),
        )
    }
}

const MIN_BPM: f32 = 10.0;
const MAX_BPM: f32 = 400.0;

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("drumsong").join("config.toml"))
}

fn merge(base: &mut ConfigFile, user: ConfigFile) {
    merge_defaults(&mut base.defaults, user.defaults);
    merge_drumkits(&mut base.drumkits, user.drumkits);
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    if user.bpm.is_some() {
        base.bpm = user.bpm;
    }
    if user.volume.is_some() {
        base.volume = user.volume;
    }
    if user.metronome_volume.is_some() {
        base.metronome_volume = user.metronome_volume;
    }
    if user.author.is_some() {
        base.author = user.author;
    }
}

fn merge_drumkits(base: &mut DrumkitsConfig, user: DrumkitsConfig) {
    if user.user.is_some() {
        base.user = user.user;
    }
    if user.system.is_some() {
        base.system = user.system;
    }
}
