//! Drum-kit root directories and the sample path policy built on them.
//!
//! A drum kit is a directory `<root>/<kit name>/` holding its samples. Kits move
//! between machines as whole directories, so a sample inside a kit is stored
//! relative to the kit directory, and anything else is stored as-is.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// The two places installed drum kits are looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrumkitRoots {
    /// Per-user kits
    pub user: PathBuf,
    /// Kits shipped with the system installation
    pub system: PathBuf,
}

impl Default for DrumkitRoots {
    fn default() -> Self {
        let user = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("drumsong")
            .join("drumkits");
        Self {
            user,
            system: PathBuf::from("/usr/share/drumsong/drumkits"),
        }
    }
}

impl DrumkitRoots {
    pub fn new(user: impl Into<PathBuf>, system: impl Into<PathBuf>) -> Self {
        Self {
            user: user.into(),
            system: system.into(),
        }
    }

    /// Whether `path` lies inside a kit directory under either root.
    pub fn is_part_of_drumkit(&self, path: &Path) -> bool {
        self.kit_relative(path).is_some()
    }

    /// The form a sample path takes in a song file: relative to its kit
    /// directory when it lives inside one, unchanged otherwise.
    ///
    /// `<root>/MyKit/snare.wav` becomes `snare.wav`; `<root>` and `<root>/MyKit`
    /// themselves are returned unchanged.
    pub fn relativize(&self, path: &Path) -> PathBuf {
        match self.kit_relative(path) {
            Some((_, relative)) => relative,
            None => path.to_path_buf(),
        }
    }

    /// Name of the kit directory `path` lies in, if any.
    pub fn kit_name(&self, path: &Path) -> Option<String> {
        self.kit_relative(path)
            .map(|(kit, _)| kit.to_string_lossy().into_owned())
    }

    /// Inverse of [`relativize`](Self::relativize) at load time. Absolute paths
    /// are returned as-is; relative ones are placed in the kit directory named
    /// `kit_name`, preferring the user root, then the system root.
    pub fn resolve(&self, kit_name: &str, stored: &Path) -> PathBuf {
        if stored.is_absolute() {
            return stored.to_path_buf();
        }
        let user_kit = self.user.join(kit_name);
        if user_kit.is_dir() {
            return user_kit.join(stored);
        }
        let system_kit = self.system.join(kit_name);
        if system_kit.is_dir() {
            return system_kit.join(stored);
        }
        log::warn!(target: "paths",
            "drum kit '{}' not found under {} or {}; resolving {} against the user root",
            kit_name, self.user.display(), self.system.display(), stored.display());
        user_kit.join(stored)
    }

    /// Kit directory name and the path below `<root>/<kit>/`, if there is
    /// at least one segment left.
    fn kit_relative<'p>(&self, path: &'p Path) -> Option<(&'p OsStr, PathBuf)> {
        [&self.user, &self.system]
            .into_iter()
            .find_map(|root| strip_kit(root, path))
    }
}

fn strip_kit<'p>(root: &Path, path: &'p Path) -> Option<(&'p OsStr, PathBuf)> {
    if root.as_os_str().is_empty() {
        return None;
    }
    let rest = path.strip_prefix(root).ok()?;
    let mut components = rest.components();
    let kit = match components.next() {
        Some(Component::Normal(kit)) => kit,
        _ => return None,
    };
    let inside: PathBuf = components.collect();
    if inside.as_os_str().is_empty() {
        None
    } else {
        Some((kit, inside))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots() -> DrumkitRoots {
        DrumkitRoots::new("/home/u/kits", "/usr/share/kits")
    }

    #[test]
    fn user_kit_sample_is_relative_to_kit() {
        let r = roots();
        assert_eq!(r.relativize(Path::new("/home/u/kits/MyKit/snare.wav")), PathBuf::from("snare.wav"));
        assert_eq!(
            r.relativize(Path::new("/home/u/kits/MyKit/sub/dir/hat.flac")),
            PathBuf::from("sub/dir/hat.flac")
        );
    }

    #[test]
    fn system_kit_sample_is_relative_to_kit() {
        let r = roots();
        assert_eq!(r.relativize(Path::new("/usr/share/kits/GMkit/kick.wav")), PathBuf::from("kick.wav"));
        assert!(r.is_part_of_drumkit(Path::new("/usr/share/kits/GMkit/kick.wav")));
    }

    #[test]
    fn kit_name_is_the_directory_below_the_root() {
        let r = roots();
        assert_eq!(r.kit_name(Path::new("/home/u/kits/MyKit/sub/hat.wav")).as_deref(), Some("MyKit"));
        assert_eq!(r.kit_name(Path::new("/usr/share/kits/GMkit/kick.wav")).as_deref(), Some("GMkit"));
        assert_eq!(r.kit_name(Path::new("/home/u/kits/MyKit")), None);
        assert_eq!(r.kit_name(Path::new("/elsewhere/clap.wav")), None);
    }

    #[test]
    fn path_outside_roots_is_unchanged() {
        let r = roots();
        let p = Path::new("/home/u/recordings/clap.wav");
        assert_eq!(r.relativize(p), p);
        assert!(!r.is_part_of_drumkit(p));
    }

    #[test]
    fn root_itself_and_kit_dir_are_unchanged() {
        let r = roots();
        assert_eq!(r.relativize(Path::new("/home/u/kits")), PathBuf::from("/home/u/kits"));
        assert_eq!(r.relativize(Path::new("/home/u/kits/MyKit")), PathBuf::from("/home/u/kits/MyKit"));
        assert_eq!(r.relativize(Path::new("/home/u/kits/")), PathBuf::from("/home/u/kits/"));
    }

    #[test]
    fn sibling_with_shared_prefix_does_not_match() {
        let r = roots();
        let p = Path::new("/home/u/kits2/MyKit/snare.wav");
        assert_eq!(r.relativize(p), p);
    }

    #[test]
    fn resolve_prefers_existing_user_kit() {
        let user = tempfile::tempdir().unwrap();
        let system = tempfile::tempdir().unwrap();
        std::fs::create_dir(system.path().join("GMkit")).unwrap();
        let r = DrumkitRoots::new(user.path(), system.path());

        assert_eq!(
            r.resolve("GMkit", Path::new("kick.wav")),
            system.path().join("GMkit").join("kick.wav")
        );

        std::fs::create_dir(user.path().join("GMkit")).unwrap();
        assert_eq!(
            r.resolve("GMkit", Path::new("kick.wav")),
            user.path().join("GMkit").join("kick.wav")
        );
    }

    #[test]
    fn resolve_keeps_absolute_and_falls_back_to_user_root() {
        let r = roots();
        assert_eq!(r.resolve("Any", Path::new("/abs/x.wav")), PathBuf::from("/abs/x.wav"));
        assert_eq!(
            r.resolve("Missing", Path::new("x.wav")),
            PathBuf::from("/home/u/kits/Missing/x.wav")
        );
    }
}
