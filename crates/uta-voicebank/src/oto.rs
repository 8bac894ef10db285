//! `oto.ini` parsing.
//!
//! Each line has the form
//!
//! ```text
//! wavFile=alias,offset,consonant,cutoff,preutter,overlap
//! ```
//!
//! with all numeric fields in milliseconds. Missing or empty fields read
//! as 0. A line whose numbers cannot be parsed is skipped with a warning
//! rather than failing the whole file.

use crate::error::{Result, VoicebankError};
use std::path::Path;
use tracing::warn;
use uta_core::TimingEntry;

/// One alias declared in an `oto.ini`.
#[derive(Debug, Clone, PartialEq)]
pub struct OtoEntry {
    /// Sample file the alias points into
    pub wav_file: String,
    /// Lookup key (lyric)
    pub alias: String,
    /// Timing parameters, already clamped non-negative
    pub timing: TimingEntry,
}

/// Decode raw file bytes: lossy UTF-8, BOM and carriage returns removed.
pub fn decode_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let text: &str = &text;
    text.strip_prefix('\u{feff}').unwrap_or(text).replace('\r', "")
}

/// Parse a whole `oto.ini`, skipping blank, comment and malformed lines.
pub fn parse_oto(text: &str) -> Vec<OtoEntry> {
    let mut entries = Vec::new();
    for (number, line) in text.lines().enumerate() {
        match parse_line(line, number + 1) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(e) => warn!("skipping {e}"),
        }
    }
    entries
}

/// Parse a single line. `Ok(None)` means the line carries no entry.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<OtoEntry>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
        return Ok(None);
    }
    let Some((wav_file, rhs)) = line.split_once('=') else {
        return Ok(None);
    };

    let wav_file = wav_file.trim();
    let mut fields = rhs.split(',');
    let alias = fields.next().unwrap_or("").trim();
    let alias = if alias.is_empty() {
        wav_stem(wav_file)
    } else {
        alias.to_string()
    };
    if alias.is_empty() {
        return Ok(None);
    }

    let mut values = [0.0f64; 5];
    for (slot, field) in values.iter_mut().zip(fields) {
        *slot = parse_ms(field).map_err(|message| VoicebankError::Parse {
            line: line_number,
            message,
        })?;
    }
    let [offset_ms, consonant_ms, cutoff_ms, preutter_ms, overlap_ms] = values;

    Ok(Some(OtoEntry {
        wav_file: wav_file.to_string(),
        alias,
        timing: TimingEntry {
            offset_ms,
            consonant_ms,
            cutoff_ms,
            preutter_ms,
            overlap_ms,
        }
        .sanitized(),
    }))
}

fn parse_ms(field: &str) -> std::result::Result<f64, String> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(0.0);
    }
    field
        .parse::<f64>()
        .map_err(|_| format!("invalid number '{field}'"))
}

fn wav_stem(wav_file: &str) -> String {
    Path::new(wav_file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
