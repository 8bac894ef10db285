//! OpenUtau project (`.ustx`) import.
//!
//! USTX is YAML. Two layouts are read:
//!
//! - `tracks[].notes[]`, positions absolute
//! - `voice_parts[].notes[]`, positions relative to the part
//!
//! Only the first track with notes is imported; other tracks are skipped.
//! Because YAML is a superset of JSON, JSON exports load as well.

use crate::error::{Result, UstError};
use crate::parser::{UstProject, MAX_NOTE_NUM, MAX_TEMPO_BPM};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};
use uta_core::Note;

/// Lyric used when a note has none.
pub const DEFAULT_USTX_LYRIC: &str = "a";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UstxFile {
    name: Option<String>,
    bpm: Option<f64>,
    tempos: Vec<UstxTempo>,
    tracks: Vec<UstxPart>,
    voice_parts: Vec<UstxPart>,
}

#[derive(Debug, Deserialize)]
struct UstxTempo {
    #[serde(default)]
    position: i64,
    bpm: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UstxPart {
    track_no: usize,
    position: i64,
    notes: Vec<UstxNote>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct UstxNote {
    position: i64,
    duration: i64,
    tone: i32,
    lyric: String,
    pitch: Option<UstxPitch>,
    vibrato: Option<UstxVibrato>,
}

impl Default for UstxNote {
    fn default() -> Self {
        Self {
            position: 0,
            duration: 480,
            tone: 60,
            lyric: String::new(),
            pitch: None,
            vibrato: None,
        }
    }
}

/// A flat cent list, or OpenUtau's point-based curve (not imported).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UstxPitch {
    Cents(Vec<f64>),
    Points(serde_yaml::Value),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UstxVibrato {
    /// Share of the note covered, in percent
    length: f64,
    /// Cycle length in milliseconds
    period: f64,
    /// Depth in cents
    depth: f64,
}

/// Read and parse a `.ustx` file. Bytes are decoded as lossy UTF-8.
pub fn load_ustx(path: impl AsRef<Path>) -> Result<UstProject> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| UstError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);

    let mut project = parse_ustx(&text)?;
    if project.title.is_none() {
        project.title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
    }
    Ok(project)
}

/// Parse USTX text.
pub fn parse_ustx(text: &str) -> Result<UstProject> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let file: UstxFile = serde_yaml::from_str(text)?;

    let tempo_bpm = project_tempo(&file);
    let title = file.name.filter(|name| !name.trim().is_empty());

    let mut notes = if file.tracks.iter().any(|part| !part.notes.is_empty()) {
        first_track(file.tracks, |_, index| index)
    } else {
        first_track(file.voice_parts, |part, _| part.track_no)
    };
    notes.sort_by_key(|note| note.start_tick);

    if notes.is_empty() {
        return Err(UstError::NoNotes);
    }
    debug!(notes = notes.len(), ?tempo_bpm, "parsed USTX");

    Ok(UstProject {
        tempo_bpm,
        title,
        notes,
    })
}

/// `bpm`, else the tempo marker at the earliest position.
fn project_tempo(file: &UstxFile) -> Option<f64> {
    let bpm = file.bpm.or_else(|| {
        file.tempos
            .iter()
            .min_by_key(|tempo| tempo.position)
            .map(|tempo| tempo.bpm)
    })?;
    if bpm > 0.0 && bpm < MAX_TEMPO_BPM {
        Some(bpm)
    } else {
        warn!(bpm, "tempo out of range, ignored");
        None
    }
}

/// Notes of every part on the lowest-numbered track that has notes.
fn first_track(parts: Vec<UstxPart>, track_of: impl Fn(&UstxPart, usize) -> usize) -> Vec<Note> {
    let Some(track) = parts
        .iter()
        .enumerate()
        .filter(|(_, part)| !part.notes.is_empty())
        .map(|(index, part)| track_of(part, index))
        .min()
    else {
        return Vec::new();
    };

    let mut notes = Vec::new();
    for (index, part) in parts.into_iter().enumerate() {
        if track_of(&part, index) != track {
            if !part.notes.is_empty() {
                debug!(track = track_of(&part, index), "skipping extra track");
            }
            continue;
        }
        let offset = part.position.max(0);
        notes.extend(part.notes.into_iter().filter_map(|note| convert(note, offset)));
    }
    notes
}

fn convert(source: UstxNote, offset: i64) -> Option<Note> {
    if source.duration <= 0 {
        debug!(lyric = %source.lyric, "dropping note without length");
        return None;
    }

    let lyric = match source.lyric.trim() {
        "" => DEFAULT_USTX_LYRIC.to_string(),
        lyric => lyric.to_string(),
    };
    let mut note = Note::new(
        source.tone.clamp(0, MAX_NOTE_NUM),
        offset.saturating_add(source.position.max(0)),
        source.duration,
        lyric,
    );

    match source.pitch {
        Some(UstxPitch::Cents(cents)) if cents.iter().all(|c| c.is_finite()) => {
            note.manual_pitch_curve = cents;
        }
        Some(UstxPitch::Cents(_)) => warn!(lyric = %note.lyric, "non-finite pitch curve, ignored"),
        Some(UstxPitch::Points(_)) | None => {}
    }

    if let Some(vibrato) = source.vibrato {
        if vibrato.length > 0.0 && vibrato.period > 0.0 {
            note.vibrato_depth_cents = vibrato.depth.max(0.0);
            note.vibrato_rate_hz = 1000.0 / vibrato.period;
            note.auto_pitch_enabled = true;
        }
    }
    Some(note)
}
