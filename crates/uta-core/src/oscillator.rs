//! Phase-continuous harmonic oscillator with a noisy consonant onset.
//!
//! The phase accumulator is advanced by `2π f / sr` every sample, so pitch
//! modulation never introduces phase discontinuities. All mutable DSP state
//! lives in [`SynthState`], which the caller owns and resets per note.

use crate::shaping::ToneSmoother;
use crate::vowel::HarmonicProfile;
use std::f64::consts::TAU;

/// Seed mixed with the note index for the consonant noise.
const NOISE_SEED: u32 = 0x1234_5678;

/// Smoothing coefficient of the one-pole noise low-pass.
pub const NOISE_LOWPASS_COEFF: f64 = 0.35;

/// Tone level at the start of the consonant window (rises to 1).
pub const CONSONANT_TONE_FLOOR: f64 = 0.3;

/// Noise level at the start of the consonant window (falls to 0).
pub const CONSONANT_NOISE_LEVEL: f64 = 0.5;

/// Deterministic xorshift32 white noise in [-1, 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseSource {
    state: u32,
}

impl NoiseSource {
    pub fn new(seed: u32) -> Self {
        // xorshift has a fixed point at zero
        let state = if seed == 0 { NOISE_SEED } else { seed };
        Self { state }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        f64::from(self.state & 0xFFFF) / 32768.0 - 1.0
    }
}

/// Per-note synthesis state: phase, noise generator and filter memories.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthState {
    phase: f64,
    noise: NoiseSource,
    noise_lp: f64,
    tone: ToneSmoother,
}

impl SynthState {
    /// Fresh state seeded for the note at `note_index`.
    pub fn for_note(note_index: usize) -> Self {
        Self {
            phase: 0.0,
            noise: NoiseSource::new(note_seed(note_index)),
            noise_lp: 0.0,
            tone: ToneSmoother::tone(),
        }
    }

    /// Reset in place so the next note starts from the same state a
    /// fresh [`SynthState::for_note`] would have.
    pub fn reset(&mut self, note_index: usize) {
        *self = Self::for_note(note_index);
    }

    /// Current oscillator phase in radians, always in [0, 2π).
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Emit the harmonic sum at the current phase, then advance by `frequency`.
    #[inline]
    pub fn oscillate(&mut self, profile: &HarmonicProfile, frequency: f64, sample_rate: f64) -> f64 {
        let out = profile.sample(self.phase);
        self.phase = (self.phase + TAU * frequency / sample_rate).rem_euclid(TAU);
        out
    }

    /// Low-passed white noise.
    #[inline]
    pub fn filtered_noise(&mut self) -> f64 {
        let white = self.noise.next_sample();
        self.noise_lp += NOISE_LOWPASS_COEFF * (white - self.noise_lp);
        self.noise_lp
    }

    /// One-pole tone smoothing.
    #[inline]
    pub fn smooth(&mut self, x: f64) -> f64 {
        self.tone.process(x)
    }

    /// Blend tone with noise for frame `f` of a `window`-frame consonant.
    ///
    /// Outside the window the tone passes through untouched.
    #[inline]
    pub fn consonant_blend(&mut self, tone: f64, f: usize, window: usize) -> f64 {
        if f >= window {
            return tone;
        }
        let progress = f as f64 / window as f64;
        let noise = self.filtered_noise();
        tone * (CONSONANT_TONE_FLOOR + (1.0 - CONSONANT_TONE_FLOOR) * progress)
            + noise * CONSONANT_NOISE_LEVEL * (1.0 - progress)
    }
}

fn note_seed(note_index: usize) -> u32 {
    NOISE_SEED ^ (note_index as u32).wrapping_mul(0x9E37_79B9)
}
