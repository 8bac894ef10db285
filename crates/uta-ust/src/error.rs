//! Error types for uta-ust.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for UST parsing.
pub type Result<T> = std::result::Result<T, UstError>;

/// Errors that can occur while reading a UST or USTX file.
#[derive(Debug, Error)]
pub enum UstError {
    /// The file could not be read.
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required numeric field was malformed.
    #[error("UST line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A USTX document was not valid YAML or had mistyped fields.
    #[error("USTX parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file contained no playable note sections.
    #[error("UST contains no notes")]
    NoNotes,
}
