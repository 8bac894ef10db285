//! Error types for uta-voicebank.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for voicebank operations.
pub type Result<T> = std::result::Result<T, VoicebankError>;

/// Errors that can occur while loading a voicebank.
#[derive(Debug, Error)]
pub enum VoicebankError {
    /// A file could not be read.
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The given path does not exist.
    #[error("Voicebank not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Loading succeeded but produced no aliases.
    #[error("No oto.ini aliases found in {}", .0.display())]
    Empty(PathBuf),

    /// A single oto.ini line was malformed.
    #[error("oto.ini line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl VoicebankError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VoicebankError::Io {
            path: path.into(),
            source,
        }
    }
}
