//! Lyric-to-timbre classification.
//!
//! A coarse substring heuristic, kept behind [`classify`] so a real
//! phoneme classifier can replace it without touching the oscillator.

/// Vowel class selected from a lyric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VowelClass {
    A,
    I,
    U,
    E,
    O,
    /// No recognizable vowel; blended profile
    Neutral,
}

/// Relative weights of the fundamental and harmonics 2-4.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicProfile {
    weights: [f64; 4],
}

impl HarmonicProfile {
    /// Build from raw weights; they are normalized to sum to 1.
    pub fn from_weights(raw: [f64; 4]) -> Self {
        let sum: f64 = raw.iter().sum();
        let norm = sum.max(1e-6);
        Self {
            weights: raw.map(|w| w / norm),
        }
    }

    /// Normalized weights, fundamental first.
    pub fn weights(&self) -> [f64; 4] {
        self.weights
    }

    /// Sum of harmonics at a fundamental phase (radians).
    #[inline]
    pub fn sample(&self, phase: f64) -> f64 {
        let [h1, h2, h3, h4] = self.weights;
        h1 * phase.sin()
            + h2 * (2.0 * phase).sin()
            + h3 * (3.0 * phase).sin()
            + h4 * (4.0 * phase).sin()
    }
}

impl VowelClass {
    /// Harmonic profile for this class.
    pub fn profile(self) -> HarmonicProfile {
        let raw = match self {
            VowelClass::A => [1.0, 0.45, 0.2, 0.08],
            VowelClass::I => [1.0, 0.2, 0.35, 0.15],
            VowelClass::U => [1.0, 0.25, 0.25, 0.2],
            VowelClass::E => [1.0, 0.3, 0.28, 0.12],
            VowelClass::O => [1.0, 0.5, 0.22, 0.06],
            VowelClass::Neutral => [1.0, 0.3, 0.2, 0.1],
        };
        HarmonicProfile::from_weights(raw)
    }
}

/// Classify a lyric by the first matching vowel letter, tested in the
/// order a, i, u, e, o (case-insensitive).
pub fn classify(lyric: &str) -> VowelClass {
    let lower = lyric.to_ascii_lowercase();
    [
        ('a', VowelClass::A),
        ('i', VowelClass::I),
        ('u', VowelClass::U),
        ('e', VowelClass::E),
        ('o', VowelClass::O),
    ]
    .into_iter()
    .find(|(letter, _)| lower.contains(*letter))
    .map(|(_, class)| class)
    .unwrap_or(VowelClass::Neutral)
}
