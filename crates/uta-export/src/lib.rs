//! # Uta Export
//!
//! Writes rendered Uta buffers to disk.
//!
//! - **Format encoding**: mono WAV (16-bit, 24-bit, 32-bit float)
//! - **Peak normalization**: raise quiet renders to a target peak
//!
//! ```ignore
//! use uta_export::{export_to_file, ExportOptions};
//!
//! export_to_file("take.wav", &result.buffer, result.sample_rate, &ExportOptions::default())?;
//! ```
//!
//! ## Feature Flags
//!
//! - `wav` (default): WAV export via hound (pure Rust)

pub mod dsp;
pub mod error;
pub mod format;
mod options;

pub use error::{ExportError, Result};
pub use options::{AudioFormat, BitDepth, ExportOptions, NormalizationMode, DEFAULT_PEAK_TARGET};

#[cfg(feature = "wav")]
pub use format::wav::{export_wav, ExportSummary, WavConfig};

#[cfg(feature = "wav")]
use std::path::Path;

/// Export mono audio to a file, choosing the format from the extension.
///
/// Only `.wav` is supported.
#[cfg(feature = "wav")]
pub fn export_to_file(
    path: impl AsRef<Path>,
    samples: &[f32],
    sample_rate: u32,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    let path = path.as_ref();
    match AudioFormat::from_path(path) {
        Some(AudioFormat::Wav) => export_wav(path, samples, sample_rate, options),
        None => Err(ExportError::UnsupportedFormat(format!(
            "Unknown or unsupported file extension: {}. Supported: .wav",
            path.display()
        ))),
    }
}
