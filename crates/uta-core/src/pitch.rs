//! Per-frame pitch curve for a note.
//!
//! The curve is a sum of cent offsets:
//! - manual automation, interpolated across the note
//! - an attack scoop and delayed vibrato (when auto pitch is enabled)
//! - a legato glide toward the next note's pitch

use crate::math::{cents_to_ratio, frequency, TickClock};
use crate::note::Note;
use crate::shaping::smoothstep;
use std::f64::consts::TAU;

/// Largest gap (ticks) between notes that still produces a legato glide.
pub const LEGATO_MAX_GAP_TICKS: i64 = 120;

/// Bridge length cap as a share of the note.
pub const LEGATO_MAX_SHARE: f64 = 0.18;

/// Bridge length cap in seconds.
pub const LEGATO_MAX_SECONDS: f64 = 0.03;

/// Progress below which the attack scoop applies.
pub const SCOOP_END: f64 = 0.12;

/// Depth of the attack scoop at the onset, in cents.
pub const SCOOP_DEPTH_CENTS: f64 = -28.0;

/// Progress after which vibrato fades in.
pub const VIBRATO_START: f64 = 0.35;

/// Progress span of the vibrato fade-in.
pub const VIBRATO_RAMP: f64 = 0.20;

/// Evaluates cents offsets for each rendered frame of one note.
#[derive(Debug, Clone)]
pub struct PitchCurve<'a> {
    note: &'a Note,
    frames: usize,
    sample_rate: f64,
    base_frequency: f64,
    bridge_frames: usize,
    bridge_target_cents: f64,
}

impl<'a> PitchCurve<'a> {
    /// Build the curve for `note` rendered over `frames` frames.
    ///
    /// `next` is the following note in the timeline; pass `None` when
    /// there is none or it is a rest.
    pub fn new(note: &'a Note, next: Option<&Note>, frames: usize, clock: &TickClock) -> Self {
        let bridge_frames = next
            .map(|next| legato_bridge_frames(note, next, frames, clock))
            .unwrap_or(0);
        let bridge_target_cents = next
            .map(|next| 100.0 * (f64::from(next.pitch) - f64::from(note.pitch)))
            .unwrap_or(0.0);

        Self {
            note,
            frames,
            sample_rate: f64::from(clock.sample_rate()),
            base_frequency: frequency(note.pitch),
            bridge_frames,
            bridge_target_cents,
        }
    }

    /// Number of frames the curve spans.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Length of the legato bridge (0 when there is no glide).
    pub fn bridge_frames(&self) -> usize {
        self.bridge_frames
    }

    /// Unmodulated note frequency in Hz.
    pub fn base_frequency(&self) -> f64 {
        self.base_frequency
    }

    /// Progress through the note, 0 at the first frame and 1 at the last.
    #[inline]
    pub fn progress(&self, f: usize) -> f64 {
        f as f64 / self.frames.saturating_sub(1).max(1) as f64
    }

    /// Total cents offset at frame `f`.
    #[inline]
    pub fn cents_at(&self, f: usize) -> f64 {
        let progress = self.progress(f);
        let seconds = f as f64 / self.sample_rate;
        self.manual_cents(progress) + self.auto_cents(progress, seconds) + self.legato_cents(f)
    }

    /// Modulated frequency at frame `f` in Hz.
    #[inline]
    pub fn frequency_at(&self, f: usize) -> f64 {
        self.base_frequency * cents_to_ratio(self.cents_at(f))
    }

    /// Linear interpolation of the manual curve.
    pub fn manual_cents(&self, progress: f64) -> f64 {
        let points = &self.note.manual_pitch_curve;
        match points.len() {
            0 => 0.0,
            1 => points[0],
            len => {
                let position = progress.clamp(0.0, 1.0) * (len - 1) as f64;
                let index = (position.floor() as usize).min(len - 1);
                let next = (index + 1).min(len - 1);
                let frac = position - index as f64;
                points[index] + (points[next] - points[index]) * frac
            }
        }
    }

    /// Attack scoop plus ramped vibrato.
    pub fn auto_cents(&self, progress: f64, seconds: f64) -> f64 {
        if !self.note.auto_pitch_enabled {
            return 0.0;
        }

        let mut cents = 0.0;
        if progress < SCOOP_END {
            cents += SCOOP_DEPTH_CENTS * (1.0 - progress / SCOOP_END);
        }
        if progress > VIBRATO_START {
            let ramp = ((progress - VIBRATO_START) / VIBRATO_RAMP).min(1.0);
            cents += self.note.vibrato_depth_cents
                * ramp
                * (TAU * self.note.vibrato_rate_hz * seconds).sin();
        }
        cents
    }

    /// Glide toward the next note over the final bridge frames.
    pub fn legato_cents(&self, f: usize) -> f64 {
        if self.bridge_frames == 0 {
            return 0.0;
        }
        let bridge_start = self.frames - self.bridge_frames;
        if f < bridge_start {
            return 0.0;
        }
        let position = (f - bridge_start) as f64;
        let span = self.bridge_frames.saturating_sub(1).max(1) as f64;
        self.bridge_target_cents * smoothstep(position / span)
    }
}

/// Bridge length for a note followed by `next`, or 0 if they are too far apart.
fn legato_bridge_frames(note: &Note, next: &Note, frames: usize, clock: &TickClock) -> usize {
    if next.start_tick.max(0) < note.start_tick.max(0) {
        return 0;
    }
    let gap_ticks = next.start_tick.max(0) - note.end_tick();
    if gap_ticks > LEGATO_MAX_GAP_TICKS || frames == 0 {
        return 0;
    }

    let note_frames = clock.frame_of(note.duration_tick).max(1);
    let by_share = ((LEGATO_MAX_SHARE * note_frames as f64) as usize).max(1);
    let by_time = ((LEGATO_MAX_SECONDS * f64::from(clock.sample_rate())) as usize).max(1);
    by_share.min(by_time).min(frames)
}
