//! Render configuration.

use crate::error::{RenderError, Result};
use crate::math::{TickClock, DEFAULT_TICKS_PER_QUARTER};
use serde::Deserialize;

/// Lowest supported output sample rate.
pub const MIN_SAMPLE_RATE: u32 = 8_000;

/// Highest supported output sample rate.
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Default per-render memory budget for worker buffers (64 MiB).
pub const DEFAULT_MEMORY_BUDGET_BYTES: usize = 64 * 1024 * 1024;

/// Options recognized by the renderer.
///
/// `sample_rate == 0` is treated as degenerate input and yields an empty
/// buffer; any other rate must lie in
/// [`MIN_SAMPLE_RATE`]..=[`MAX_SAMPLE_RATE`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Linear gain applied after mixing
    pub master_gain: f32,
    /// Worker cap; 0 = use hardware concurrency
    pub max_workers: usize,
    /// Global tempo for tick-to-time conversion
    pub tempo_bpm: f64,
    /// Tick resolution of the note timeline
    pub ticks_per_quarter: u32,
    /// Upper bound on the total size of worker buffers
    pub memory_budget_bytes: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            master_gain: 1.0,
            max_workers: 0,
            tempo_bpm: 120.0,
            ticks_per_quarter: DEFAULT_TICKS_PER_QUARTER,
            memory_budget_bytes: DEFAULT_MEMORY_BUDGET_BYTES,
        }
    }
}

impl RenderConfig {
    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RenderConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_master_gain(mut self, gain: f32) -> Self {
        self.master_gain = gain;
        self
    }

    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers;
        self
    }

    pub fn with_tempo(mut self, bpm: f64) -> Self {
        self.tempo_bpm = bpm;
        self
    }

    pub fn with_ticks_per_quarter(mut self, ticks: u32) -> Self {
        self.ticks_per_quarter = ticks;
        self
    }

    pub fn with_memory_budget(mut self, bytes: usize) -> Self {
        self.memory_budget_bytes = bytes;
        self
    }

    /// Whether this configuration describes degenerate output (no audio).
    pub fn is_degenerate(&self) -> bool {
        self.sample_rate == 0
    }

    /// Check every field against its supported range.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate != 0
            && !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.sample_rate)
        {
            return Err(RenderError::InvalidConfig(format!(
                "sample rate {} Hz outside supported range {}..={}",
                self.sample_rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
            )));
        }
        if !self.tempo_bpm.is_finite() || self.tempo_bpm <= 0.0 {
            return Err(RenderError::InvalidConfig(format!(
                "tempo must be a positive number, got {}",
                self.tempo_bpm
            )));
        }
        if !self.master_gain.is_finite() || self.master_gain < 0.0 {
            return Err(RenderError::InvalidConfig(format!(
                "master gain must be finite and non-negative, got {}",
                self.master_gain
            )));
        }
        if self.ticks_per_quarter == 0 {
            return Err(RenderError::InvalidConfig(
                "ticks per quarter must be positive".into(),
            ));
        }
        if self.memory_budget_bytes == 0 {
            return Err(RenderError::InvalidConfig(
                "memory budget must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Tick clock for this configuration.
    pub fn clock(&self) -> TickClock {
        TickClock::new(self.sample_rate, self.tempo_bpm, self.ticks_per_quarter)
    }
}
