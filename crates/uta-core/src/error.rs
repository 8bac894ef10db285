//! Error types for uta-core.

use thiserror::Error;

/// Result type alias for uta-core operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while rendering.
///
/// Only structural failures surface here. Per-sample numeric hazards are
/// guarded inside the engine and never reach the caller.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Configuration rejected before any work began.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// A worker panicked while rendering a note.
    #[error("Worker {worker} failed{}: {message}", note_suffix(.note_index))]
    WorkerPanicked {
        /// Logical worker index
        worker: usize,
        /// Index of the note being rendered, when known
        note_index: Option<usize>,
        /// Panic payload rendered as text
        message: String,
    },

    /// A note produced a NaN or infinite sample.
    #[error("Note {note_index} produced a non-finite sample at frame {frame}")]
    NonFiniteSample {
        /// Index of the offending note in the timeline
        note_index: usize,
        /// Frame offset within the note
        frame: usize,
    },

    /// The timeline is too long to allocate a render buffer for.
    #[error("Render length of {frames} frames exceeds the limit of {max_frames}")]
    TooLong {
        /// Requested output length
        frames: usize,
        /// Longest output allowed at this sample rate
        max_frames: usize,
    },

    /// Configuration file could not be parsed.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl RenderError {
    /// Index of the failing note, if the error is tied to one.
    pub fn note_index(&self) -> Option<usize> {
        match self {
            RenderError::WorkerPanicked { note_index, .. } => *note_index,
            RenderError::NonFiniteSample { note_index, .. } => Some(*note_index),
            _ => None,
        }
    }
}

fn note_suffix(note_index: &Option<usize>) -> String {
    match note_index {
        Some(index) => format!(" on note {index}"),
        None => String::new(),
    }
}
