//! Export options.

use crate::error::ExportError;
use std::path::Path;
use std::str::FromStr;

/// Default peak target for normalization (linear).
pub const DEFAULT_PEAK_TARGET: f32 = 0.95;

/// Audio format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFormat {
    #[default]
    Wav,
}

impl AudioFormat {
    /// File extension (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
        }
    }

    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.eq_ignore_ascii_case("wav").then_some(AudioFormat::Wav)
    }
}

/// Bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    #[default]
    Int16,
    Int24,
    Float32,
}

impl BitDepth {
    /// Bits per sample.
    pub fn bits(&self) -> u16 {
        match self {
            BitDepth::Int16 => 16,
            BitDepth::Int24 => 24,
            BitDepth::Float32 => 32,
        }
    }
}

impl FromStr for BitDepth {
    type Err = ExportError;

    /// Accepts `16`, `24` and `32f` (`32` and `f32` are aliases).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "16" | "int16" => Ok(BitDepth::Int16),
            "24" | "int24" => Ok(BitDepth::Int24),
            "32" | "32f" | "f32" | "float32" => Ok(BitDepth::Float32),
            other => Err(ExportError::InvalidOptions(format!(
                "unsupported bit depth '{other}', expected 16, 24 or 32f"
            ))),
        }
    }
}

/// Normalization mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizationMode {
    None,
    /// Raise quiet renders to this linear peak; never attenuates.
    Peak(f32),
}

impl Default for NormalizationMode {
    fn default() -> Self {
        NormalizationMode::Peak(DEFAULT_PEAK_TARGET)
    }
}

/// Export options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportOptions {
    /// Audio format.
    pub format: AudioFormat,
    /// Bit depth.
    pub bit_depth: BitDepth,
    /// Normalization mode.
    pub normalization: NormalizationMode,
}

impl ExportOptions {
    pub fn with_bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = bit_depth;
        self
    }

    pub fn with_normalization(mut self, normalization: NormalizationMode) -> Self {
        self.normalization = normalization;
        self
    }

    /// Check option ranges.
    pub fn validate(&self) -> Result<(), ExportError> {
        if let NormalizationMode::Peak(target) = self.normalization {
            if !(target.is_finite() && target > 0.0 && target <= 1.0) {
                return Err(ExportError::InvalidOptions(format!(
                    "peak target must be in (0, 1], got {target}"
                )));
            }
        }
        Ok(())
    }
}
