//! UST + voicebank → render → WAV integration tests.
//!
//! Run with:
//! ```bash
//! cargo test -p uta --test pipeline_integration
//! ```

#![cfg(feature = "full")]

#[path = "helpers/mod.rs"]
mod helpers;

use helpers::tolerances::*;
use helpers::{assert_has_audio, peak, write_fixture_project, TEST_OTO, TEST_UST};
use std::process::Command;
use uta::export::{BitDepth, NormalizationMode};
use uta::prelude::*;

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn test_fixture_ust_parses() {
    let project = uta::ust::parse_ust(TEST_UST).unwrap();
    assert_eq!(project.tempo_bpm, Some(120.0));
    assert_eq!(project.title.as_deref(), Some("fixture"));
    assert_eq!(project.notes.len(), 4);
    assert_eq!(project.length_ticks(), 2160);
    assert!(project.notes[2].is_rest());
}

#[test]
fn test_fixture_voicebank_loads() {
    let dir = tempfile::tempdir().unwrap();
    let (_, bank_dir) = write_fixture_project(dir.path());
    let bank = Voicebank::load_dir(&bank_dir).unwrap();
    assert_eq!(bank.aliases(), ["ka", "ko", "na"]);
    assert_eq!(bank.name(), Some("Fixture"));
    assert_eq!(bank.lookup("ka").unwrap().preutter_ms, 45.0);
    // negative cutoff is clamped
    assert_eq!(bank.lookup("na").unwrap().cutoff_ms, 0.0);
}

// =============================================================================
// Session
// =============================================================================

#[test]
fn test_session_render_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let (ust, bank_dir) = write_fixture_project(dir.path());
    let bank = Voicebank::load_dir(&bank_dir).unwrap();

    let session = Session::new(SessionConfig::default());
    let result = session.render_ust_file(&ust, &bank).unwrap();
    // 2160 ticks at 120 BPM = 2.25 s
    assert_eq!(result.length_samples(), 99225);
    assert_has_audio(&result.buffer, 0.01);

    let out = dir.path().join("song.wav");
    let summary = session.export(&result, &out).unwrap();
    assert_eq!(summary.frames, 99225);
    assert!(summary.gain >= 1.0);

    let mut reader = hound::WavReader::open(&out).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);
    let samples: Vec<f32> = reader
        .samples::<i16>()
        .map(|s| f32::from(s.unwrap()) / 32767.0)
        .collect();
    assert_eq!(samples.len(), 99225);
    // quiet renders are raised to the 0.95 target, loud ones left alone
    let expected = if summary.gain > 1.0 {
        0.95
    } else {
        peak(&result.buffer)
    };
    assert!((peak(&samples) - expected).abs() <= 2.0 * INT16_EPSILON);
}

#[test]
fn test_voicebank_timing_changes_output() {
    let project = uta::ust::parse_ust(TEST_UST).unwrap();
    let session = Session::default();
    let bank = Voicebank::from_oto_str(TEST_OTO);
    let with_bank = session.render_ust(&project, &bank).unwrap();
    let without = session.render_ust(&project, &NoTiming).unwrap();
    assert_eq!(with_bank.buffer.len(), without.buffer.len());
    assert_ne!(with_bank.buffer, without.buffer);
}

#[test]
fn test_export_without_normalization_keeps_level() {
    let project = uta::ust::parse_ust(TEST_UST).unwrap();
    let session = Session::default();
    let result = session.render_ust(&project, &NoTiming).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("raw.wav");
    let options = ExportOptions::default()
        .with_bit_depth(BitDepth::Float32)
        .with_normalization(NormalizationMode::None);
    export_to_file(&out, &result.buffer, result.sample_rate, &options).unwrap();

    let mut reader = hound::WavReader::open(&out).unwrap();
    let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
    assert_eq!(samples.as_slice(), result.buffer.as_slice());
}

#[test]
fn test_session_file_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let (ust, _) = write_fixture_project(dir.path());
    let config_path = dir.path().join("session.toml");
    std::fs::write(
        &config_path,
        "[render]\nsample_rate = 22050\ntempo_bpm = 60.0\n\n[export]\nbit_depth = \"24\"\n",
    )
    .unwrap();

    let config = SessionConfig::load(&config_path).unwrap();
    let result = uta::render_ust_file(&ust, &NoTiming, &config).unwrap();
    // pinned 60 BPM doubles the length; 2160 ticks = 4.5 s
    assert_eq!(result.sample_rate, 22050);
    assert_eq!(result.length_samples(), 99225);
}

// =============================================================================
// CLI
// =============================================================================

#[test]
fn test_cli_renders_wav() {
    let dir = tempfile::tempdir().unwrap();
    let (ust, bank_dir) = write_fixture_project(dir.path());
    let out = dir.path().join("cli.wav");

    let status = Command::new(env!("CARGO_BIN_EXE_uta-render"))
        .arg("--ust")
        .arg(&ust)
        .arg("--out")
        .arg(&out)
        .arg("--voicebank")
        .arg(&bank_dir)
        .args(["--workers", "2", "--bit-depth", "24", "--sample-rate", "48000"])
        .status()
        .unwrap();
    assert!(status.success());

    let reader = hound::WavReader::open(&out).unwrap();
    assert_eq!(reader.spec().bits_per_sample, 24);
    assert_eq!(reader.spec().sample_rate, 48000);
    assert_eq!(reader.duration(), 108000);
}

#[test]
fn test_cli_renders_ustx() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("song.ustx");
    std::fs::write(
        &project,
        "bpm: 120\ntracks:\n  - notes:\n      - {position: 0, duration: 960, tone: 69, lyric: ka}\n      - {position: 1440, duration: 480, tone: 71, lyric: na}\n",
    )
    .unwrap();
    let out = dir.path().join("ustx.wav");

    let status = Command::new(env!("CARGO_BIN_EXE_uta-render"))
        .arg("--ust")
        .arg(&project)
        .arg("--out")
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    // 1920 ticks at 120 BPM = 1 s
    let reader = hound::WavReader::open(&out).unwrap();
    assert_eq!(reader.duration(), 44100);
}

#[test]
fn test_cli_reports_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_uta-render"))
        .arg("--ust")
        .arg(dir.path().join("missing.ust"))
        .arg("--out")
        .arg(dir.path().join("out.wav"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error"));
    assert!(!dir.path().join("out.wav").exists());
}

#[test]
fn test_cli_rejects_bad_bit_depth() {
    let dir = tempfile::tempdir().unwrap();
    let (ust, _) = write_fixture_project(dir.path());
    let status = Command::new(env!("CARGO_BIN_EXE_uta-render"))
        .arg("--ust")
        .arg(&ust)
        .arg("--out")
        .arg(dir.path().join("out.wav"))
        .args(["--bit-depth", "12"])
        .status()
        .unwrap();
    assert!(!status.success());
}
