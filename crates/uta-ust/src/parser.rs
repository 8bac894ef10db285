//! Line-oriented `.ust` parser.
//!
//! A UST is an INI-like file of `[#...]` sections. Numbered sections
//! (`[#0000]`, `[#0001]`, ...) are notes; `[#SETTING]` carries project-wide
//! values; `[#VERSION]`, `[#PREV]`, `[#NEXT]` and other named sections are
//! ignored; `[#TRACKEND]` ends the track. Notes are laid end to end, so each
//! start tick is the sum of the preceding lengths.

use crate::error::{Result, UstError};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};
use uta_core::Note;

/// Tempo values outside this open range are ignored.
pub const MAX_TEMPO_BPM: f64 = 1000.0;

/// Highest accepted `NoteNum`.
pub const MAX_NOTE_NUM: i32 = 127;

/// Highest accepted `Velocity`.
pub const MAX_VELOCITY: i32 = 200;

/// A parsed UST project.
#[derive(Debug, Clone, PartialEq)]
pub struct UstProject {
    /// Project tempo, if the file declared a usable one
    pub tempo_bpm: Option<f64>,
    /// `ProjectName`, or the file stem when loaded from disk
    pub title: Option<String>,
    /// Notes in timeline order
    pub notes: Vec<Note>,
}

impl UstProject {
    /// Total timeline length in ticks.
    pub fn length_ticks(&self) -> i64 {
        self.notes.iter().map(Note::end_tick).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Setting,
    Note,
    Ignored,
}

fn classify_section(header: &str) -> Option<Section> {
    let name = header.strip_prefix("[#")?.strip_suffix(']')?;
    let section = match name {
        "SETTING" => Section::Setting,
        _ if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) => Section::Note,
        _ => Section::Ignored,
    };
    Some(section)
}

/// Read and parse a `.ust` file. Bytes are decoded as lossy UTF-8.
pub fn load_ust(path: impl AsRef<Path>) -> Result<UstProject> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| UstError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);

    let mut project = parse_ust(&text)?;
    if project.title.is_none() {
        project.title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
    }
    Ok(project)
}

/// Parse UST text.
pub fn parse_ust(text: &str) -> Result<UstProject> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut tempo_bpm = None;
    let mut title = None;
    let mut notes = Vec::new();
    let mut cursor: i64 = 0;
    let mut section = Section::Ignored;
    let mut current: Option<Note> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            if let Some(note) = current.take() {
                push_note(&mut notes, &mut cursor, note);
            }
            if line == "[#TRACKEND]" {
                break;
            }
            section = classify_section(line).unwrap_or(Section::Ignored);
            if section == Section::Note {
                current = Some(Note {
                    duration_tick: 0,
                    ..Note::default()
                });
            }
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        if key == "Tempo" && section != Section::Ignored {
            let bpm: f64 = parse_number(value, line_number, "Tempo")?;
            if tempo_bpm.is_some() {
                debug!(line = line_number, bpm, "ignoring tempo change");
            } else if bpm > 0.0 && bpm < MAX_TEMPO_BPM {
                tempo_bpm = Some(bpm);
            } else {
                warn!(line = line_number, bpm, "tempo out of range, ignored");
            }
            continue;
        }

        match (section, current.as_mut()) {
            (Section::Setting, _) if key == "ProjectName" && !value.is_empty() => {
                title = Some(value.to_string());
            }
            (Section::Note, Some(note)) => apply_note_key(note, key, value, line_number)?,
            _ => {}
        }
    }

    if let Some(note) = current.take() {
        push_note(&mut notes, &mut cursor, note);
    }

    if notes.is_empty() {
        return Err(UstError::NoNotes);
    }
    debug!(notes = notes.len(), ?tempo_bpm, "parsed UST");

    Ok(UstProject {
        tempo_bpm,
        title,
        notes,
    })
}

/// Place a finished note on the timeline; non-positive lengths are dropped.
fn push_note(notes: &mut Vec<Note>, cursor: &mut i64, mut note: Note) {
    if note.duration_tick <= 0 {
        debug!(lyric = %note.lyric, "dropping note without length");
        return;
    }
    note.start_tick = *cursor;
    *cursor = cursor.saturating_add(note.duration_tick);
    notes.push(note);
}

fn apply_note_key(note: &mut Note, key: &str, value: &str, line: usize) -> Result<()> {
    match key {
        "Length" => note.duration_tick = parse_number(value, line, key)?,
        "NoteNum" => {
            let pitch: i32 = parse_number(value, line, key)?;
            note.pitch = pitch.clamp(0, MAX_NOTE_NUM);
        }
        "Lyric" => note.lyric = value.to_string(),
        "Velocity" => match value.parse::<i32>() {
            Ok(v) => note.velocity = v.clamp(0, MAX_VELOCITY) as u8,
            Err(_) => warn!(line, "invalid Velocity '{value}', ignored"),
        },
        "PBY" => match parse_list(value) {
            Some(cents) => note.manual_pitch_curve = cents,
            None => warn!(line, "invalid PBY '{value}', ignored"),
        },
        "VBR" => match parse_list(value).as_deref().and_then(vibrato_from_vbr) {
            Some((depth, rate)) => {
                note.vibrato_depth_cents = depth;
                note.vibrato_rate_hz = rate;
                note.auto_pitch_enabled = true;
            }
            None => debug!(line, "VBR '{value}' carries no vibrato"),
        },
        _ => {}
    }
    Ok(())
}

/// `VBR=length%,cycleMs,depthCents,...` → `(depth_cents, rate_hz)`.
fn vibrato_from_vbr(fields: &[f64]) -> Option<(f64, f64)> {
    let (length, cycle_ms, depth) = match fields {
        [length, cycle_ms, depth, ..] => (*length, *cycle_ms, *depth),
        _ => return None,
    };
    if length <= 0.0 || cycle_ms <= 0.0 {
        return None;
    }
    Some((depth.max(0.0), 1000.0 / cycle_ms))
}

/// Comma-separated numbers; empty fields read as 0.
fn parse_list(value: &str) -> Option<Vec<f64>> {
    value
        .split(',')
        .map(str::trim)
        .map(|field| {
            if field.is_empty() {
                Some(0.0)
            } else {
                field.parse::<f64>().ok().filter(|v| v.is_finite())
            }
        })
        .collect()
}

fn parse_number<T: FromStr>(value: &str, line: usize, key: &str) -> Result<T> {
    value.parse().map_err(|_| UstError::Parse {
        line,
        message: format!("invalid {key} '{value}'"),
    })
}
