//! Test helpers and fixtures for Uta integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): identical renders
//! - `MIX_EPSILON` (1e-5): renders that differ only in summation order
//! - `SILENCE_THRESHOLD` (0.0001): silence detection (-80dB)
//! - `PITCH_TOLERANCE_RATIO` (0.5%): steady-note pitch accuracy

#![allow(dead_code)]

pub mod tolerances;

use std::path::Path;
use uta::prelude::*;

/// Default test sample rate
pub const TEST_SAMPLE_RATE: u32 = 44100;

/// Render configuration with a fixed worker count.
pub fn test_config(workers: usize) -> RenderConfig {
    RenderConfig::default()
        .with_sample_rate(TEST_SAMPLE_RATE)
        .with_max_workers(workers)
}

/// A short phrase with a rest, a glide and vibrato.
pub fn test_phrase() -> Vec<Note> {
    vec![
        Note::new(60, 0, 480, "ka"),
        Note::new(62, 480, 480, "ra"),
        Note::new(64, 960, 240, "su"),
        Note::new(64, 1200, 240, "R"),
        Note::new(67, 1440, 720, "no").with_vibrato(30.0, 6.0),
        Note::new(65, 2160, 480, "ko").with_velocity(160),
        Note::new(64, 2640, 960, "e").with_pitch_curve(vec![0.0, 40.0, -20.0, 0.0]),
    ]
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

/// Largest absolute difference between consecutive samples.
pub fn max_step(samples: &[f32]) -> f32 {
    samples
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(0.0_f32, f32::max)
}

/// Largest absolute difference between two equal-length signals.
pub fn max_difference(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "signal lengths differ");
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0_f32, f32::max)
}

/// Assert that a signal is approximately silent (all values near zero).
pub fn assert_silence(samples: &[f32], tolerance: f32) {
    let max = peak(samples);
    assert!(
        max <= tolerance,
        "Expected silence, but peak amplitude was {}",
        max
    );
}

/// Assert that a signal has content (not silent).
pub fn assert_has_audio(samples: &[f32], min_rms: f32) {
    let r = rms(samples);
    assert!(
        r >= min_rms,
        "Expected audio content with RMS >= {}, but RMS was {}",
        min_rms,
        r
    );
}

/// Power of `samples` at `frequency` (Goertzel algorithm).
pub fn goertzel_power(samples: &[f32], frequency: f64, sample_rate: u32) -> f64 {
    let omega = 2.0 * std::f64::consts::PI * frequency / f64::from(sample_rate);
    let coeff = 2.0 * omega.cos();
    let (mut s1, mut s2) = (0.0f64, 0.0f64);
    for &x in samples {
        let s0 = f64::from(x) + coeff * s1 - s2;
        s2 = s1;
        s1 = s0;
    }
    s1 * s1 + s2 * s2 - coeff * s1 * s2
}

/// Frequency with the most energy in `[low, high]`, searched in `step` Hz increments.
pub fn dominant_frequency(samples: &[f32], sample_rate: u32, low: f64, high: f64, step: f64) -> f64 {
    let mut best = (low, f64::MIN);
    let mut f = low;
    while f <= high {
        let power = goertzel_power(samples, f, sample_rate);
        if power > best.1 {
            best = (f, power);
        }
        f += step;
    }
    best.0
}

/// Frame index of a duration in seconds.
pub fn frames(seconds: f64, sample_rate: u32) -> usize {
    (seconds * f64::from(sample_rate)).round() as usize
}

// =============================================================================
// File fixtures
// =============================================================================

/// A minimal UST: 120 BPM, three notes and a rest.
pub const TEST_UST: &str = "\
[#VERSION]
UST Version1.2
[#SETTING]
Tempo=120.00
ProjectName=fixture
[#0000]
Length=480
Lyric=ka
NoteNum=69
[#0001]
Length=480
Lyric=na
NoteNum=71
[#0002]
Length=240
Lyric=R
NoteNum=60
[#0003]
Length=960
Lyric=ko
NoteNum=67
VBR=65,180,25,20,20,0,0
[#TRACKEND]
";

/// oto.ini matching [`TEST_UST`].
pub const TEST_OTO: &str = "\
_ka.wav=ka,20,80,0,45,12
_na.wav=na,15,70,-120,35,8
_ko.wav=ko,10,90,0,50,15
";

/// Write [`TEST_UST`] and a voicebank directory under `dir`.
///
/// Returns `(ust_path, voicebank_dir)`.
pub fn write_fixture_project(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let ust = dir.join("song.ust");
    std::fs::write(&ust, TEST_UST).expect("write ust");

    let bank = dir.join("bank");
    std::fs::create_dir_all(&bank).expect("create voicebank dir");
    std::fs::write(bank.join("oto.ini"), TEST_OTO).expect("write oto.ini");
    std::fs::write(bank.join("character.txt"), "name=Fixture\nauthor=Tests\n")
        .expect("write character.txt");

    (ust, bank)
}
