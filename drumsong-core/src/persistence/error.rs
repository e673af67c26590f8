use std::fmt;
use std::path::{Path, PathBuf};

/// Document-level failure of a save or load.
///
/// Field-level problems (missing, empty or malformed values) never end up
/// here; they are logged and replaced by defaults.
#[derive(Debug)]
pub enum CodecError {
    /// The file could not be opened, read or written.
    Io { path: PathBuf, source: std::io::Error },
    /// The content is not a well-formed document (after legacy repair, if any).
    Parse { path: PathBuf, message: String },
    /// The document's root element is not the expected one.
    MissingRoot { path: PathBuf, expected: &'static str },
    /// Serializing the document tree failed.
    Write { path: PathBuf, message: String },
    /// The file is empty after writing.
    EmptyOutput { path: PathBuf },
}

impl CodecError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// File the failed operation was working on.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Parse { path, .. }
            | Self::MissingRoot { path, .. }
            | Self::Write { path, .. }
            | Self::EmptyOutput { path } => path,
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            Self::Parse { path, message } => {
                write!(f, "{}: not a valid document: {}", path.display(), message)
            }
            Self::MissingRoot { path, expected } => {
                write!(f, "{}: missing <{}> root element", path.display(), expected)
            }
            Self::Write { path, message } => {
                write!(f, "{}: could not serialize document: {}", path.display(), message)
            }
            Self::EmptyOutput { path } => write!(f, "{}: file is empty after save", path.display()),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
