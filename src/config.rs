//! Session configuration file.
//!
//! ```toml
//! [render]
//! sample_rate = 48000
//! master_gain = 0.8
//! max_workers = 4
//! tempo_bpm = 132.0
//!
//! [export]
//! bit_depth = "24"
//! normalize = true
//! peak_target = 0.95
//! ```
//!
//! Every key is optional. A `tempo_bpm` given here pins the tempo; otherwise
//! a UST's own tempo is used.

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;
use uta_core::RenderConfig;

/// `[export]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// `16`, `24` or `32f`
    pub bit_depth: String,
    /// Raise quiet renders to `peak_target`
    pub normalize: bool,
    pub peak_target: f32,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            bit_depth: "16".to_string(),
            normalize: true,
            peak_target: 0.95,
        }
    }
}

#[cfg(feature = "export")]
impl ExportSection {
    /// Convert to encoder options, rejecting unknown bit depths.
    pub fn to_options(&self) -> Result<uta_export::ExportOptions> {
        use uta_export::{ExportOptions, NormalizationMode};

        let normalization = if self.normalize {
            NormalizationMode::Peak(self.peak_target)
        } else {
            NormalizationMode::None
        };
        let options = ExportOptions::default()
            .with_bit_depth(self.bit_depth.parse()?)
            .with_normalization(normalization);
        options.validate()?;
        Ok(options)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSession {
    render: toml::Table,
    export: ExportSection,
}

/// Parsed session file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionConfig {
    pub render: RenderConfig,
    pub export: ExportSection,
    /// Whether `render.tempo_bpm` overrides the tempo stored in a UST
    pub tempo_pinned: bool,
}

impl SessionConfig {
    /// Parse from TOML text and validate the render section.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawSession = toml::from_str(text)?;
        let tempo_pinned = raw.render.contains_key("tempo_bpm");
        let render: RenderConfig = toml::Value::Table(raw.render).try_into()?;
        render.validate()?;

        Ok(Self {
            render,
            export: raw.export,
            tempo_pinned,
        })
    }

    /// Read and parse a session file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Pin the tempo, overriding any tempo a UST declares.
    pub fn with_tempo(mut self, bpm: f64) -> Self {
        self.render.tempo_bpm = bpm;
        self.tempo_pinned = true;
        self
    }
}
