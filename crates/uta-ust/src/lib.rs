//! UTAU sequence reading for Uta.
//!
//! Produces [`uta_core::Note`] timelines plus the project tempo from classic
//! `.ust` files and OpenUtau `.ustx` projects:
//!
//! ```ignore
//! let project = uta_ust::load_project("song.ustx")?;
//! let config = RenderConfig::default().with_tempo(project.tempo_bpm.unwrap_or(120.0));
//! ```

use std::path::Path;

pub mod error;
pub use error::{Result, UstError};

mod parser;
pub use parser::{load_ust, parse_ust, UstProject, MAX_NOTE_NUM, MAX_TEMPO_BPM, MAX_VELOCITY};

mod ustx;
pub use ustx::{load_ustx, parse_ustx, DEFAULT_USTX_LYRIC};

/// Project file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    /// UTAU `.ust` (INI-like sections)
    Ust,
    /// OpenUtau `.ustx` (YAML)
    Ustx,
}

impl ProjectFormat {
    /// Format from the file extension (case-insensitive); anything that is
    /// not `.ustx` is read as a UST.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ustx") => ProjectFormat::Ustx,
            _ => ProjectFormat::Ust,
        }
    }
}

/// Load a `.ust` or `.ustx` project, choosing the importer by extension.
pub fn load_project(path: impl AsRef<Path>) -> Result<UstProject> {
    let path = path.as_ref();
    match ProjectFormat::from_path(path) {
        ProjectFormat::Ust => load_ust(path),
        ProjectFormat::Ustx => load_ustx(path),
    }
}
