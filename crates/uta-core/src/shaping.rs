//! Envelope and safety shaping.
//!
//! - [`NoteEnvelope`] - velocity/length-scaled smoothstep attack and release
//! - [`safety_gain`] - attenuation when the fundamental approaches Nyquist
//! - [`ToneSmoother`] - one-pole low-pass softening harmonic edges
//! - [`DcBlocker`] - one-pole high-pass applied after mixing
//! - [`soft_limit`] - saturating limiter applied before quantization

/// Hermite smoothstep `t²(3 - 2t)` with `t` clamped to [0, 1].
#[inline]
pub fn smoothstep(x: f64) -> f64 {
    let t = x.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Fraction of the sample rate above which the safety gain engages.
pub const NYQUIST_GUARD_RATIO: f64 = 0.45;

/// Floor for the safety gain.
pub const MIN_SAFETY_GAIN: f64 = 0.35;

/// Gain for a fundamental at `frequency` Hz.
///
/// Returns 1.0 below `0.45 * sample_rate`, otherwise
/// `clamp(0.45 * sample_rate / frequency, 0.35, 1.0)`. Never exceeds 1.
#[inline]
pub fn safety_gain(frequency: f64, sample_rate: u32) -> f64 {
    let guard = NYQUIST_GUARD_RATIO * f64::from(sample_rate);
    if frequency <= guard {
        return 1.0;
    }
    (guard / frequency.max(1.0)).clamp(MIN_SAFETY_GAIN, 1.0)
}

/// Saturating limiter `x / (1 + |x|)`; output is always inside (-1, 1).
#[inline]
pub fn soft_limit(x: f32) -> f32 {
    x / (1.0 + x.abs())
}

/// Attack/release envelope for one note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEnvelope {
    frames: usize,
    attack_frames: usize,
    release_frames: usize,
}

impl NoteEnvelope {
    /// Longest release, in seconds.
    pub const MAX_RELEASE_SECONDS: f64 = 0.06;
    /// Release never exceeds this share of the note.
    pub const RELEASE_SHARE: f64 = 0.35;
    /// Attack never exceeds this share of the note.
    pub const ATTACK_SHARE: f64 = 0.4;

    /// Build an envelope for a note of `frames` frames.
    ///
    /// Higher velocity gives a faster attack; `overlap_ms` stabilizes the
    /// onset earlier by shortening the attack further.
    pub fn new(velocity: u8, frames: usize, sample_rate: u32, overlap_ms: f64) -> Self {
        let sr = f64::from(sample_rate);
        let stabilization = 1.0 / (1.0 + overlap_ms.max(0.0) / 100.0);
        let attack_seconds = Self::attack_seconds(velocity) * stabilization;

        let attack_cap = (frames as f64 * Self::ATTACK_SHARE).floor();
        let attack_frames = (attack_seconds * sr).round().min(attack_cap).max(1.0) as usize;

        let release_cap = (frames as f64 * Self::RELEASE_SHARE).floor();
        let release_frames = (Self::MAX_RELEASE_SECONDS * sr)
            .round()
            .min(release_cap)
            .max(1.0) as usize;

        Self {
            frames,
            attack_frames,
            release_frames,
        }
    }

    /// Attack time in seconds before overlap stabilization.
    pub fn attack_seconds(velocity: u8) -> f64 {
        let velocity = f64::from(velocity.min(200));
        (0.02 + (140.0 - velocity) * 0.0002).clamp(0.005, 0.045)
    }

    pub fn attack_frames(&self) -> usize {
        self.attack_frames
    }

    pub fn release_frames(&self) -> usize {
        self.release_frames
    }

    /// Gain at frame `f` (0-based); both ramps multiply.
    #[inline]
    pub fn gain(&self, f: usize) -> f64 {
        let mut env = 1.0;
        if f < self.attack_frames {
            env *= smoothstep(f as f64 / self.attack_frames as f64);
        }
        let release_start = self.frames.saturating_sub(self.release_frames);
        if f >= release_start {
            let tail = (f - release_start + 1) as f64;
            env *= 1.0 - smoothstep(tail / self.release_frames as f64);
        }
        env
    }
}

/// One-pole low-pass `y[n] = a*y[n-1] + (1-a)*x[n]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSmoother {
    feedback: f64,
    state: f64,
}

impl ToneSmoother {
    /// Feedback used for tone smoothing.
    pub const TONE_FEEDBACK: f64 = 0.78;

    pub fn new(feedback: f64) -> Self {
        Self {
            feedback,
            state: 0.0,
        }
    }

    /// Smoother with the standard tone coefficients (0.78 / 0.22).
    pub fn tone() -> Self {
        Self::new(Self::TONE_FEEDBACK)
    }

    #[inline]
    pub fn process(&mut self, x: f64) -> f64 {
        self.state = self.feedback * self.state + (1.0 - self.feedback) * x;
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

impl Default for ToneSmoother {
    fn default() -> Self {
        Self::tone()
    }
}

/// One-pole DC blocker `y[n] = x[n] - x[n-1] + R*y[n-1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DcBlocker {
    pole: f32,
    prev_in: f32,
    prev_out: f32,
}

impl DcBlocker {
    /// Pole radius used after mixing.
    pub const POLE: f32 = 0.995;

    pub fn new() -> Self {
        Self {
            pole: Self::POLE,
            prev_in: 0.0,
            prev_out: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = x - self.prev_in + self.pole * self.prev_out;
        self.prev_in = x;
        self.prev_out = y;
        y
    }

    /// Filter a buffer in place.
    pub fn process_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

impl Default for DcBlocker {
    fn default() -> Self {
        Self::new()
    }
}

/// Final master chain: gain, DC blocking, soft limiting.
pub fn finalize_mix(buffer: &mut [f32], master_gain: f32) {
    let mut dc = DcBlocker::new();
    for sample in buffer.iter_mut() {
        *sample = soft_limit(dc.process(*sample * master_gain));
    }
}
