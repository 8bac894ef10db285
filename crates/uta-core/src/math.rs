//! Pitch and timing conversions.
//!
//! Pure, side-effect-free helpers shared by every stage of the renderer.
//! All rounding goes through [`f64::round`], which rounds half away from
//! zero on every platform, so frame positions are bit-reproducible.

/// Reference pitch for A4.
pub const A4_FREQ: f64 = 440.0;

/// Semitone index of A4.
pub const A4_NOTE: i32 = 69;

/// Default tick resolution (ticks per quarter note).
pub const DEFAULT_TICKS_PER_QUARTER: u32 = 480;

/// Frequency in Hz of a semitone index (A4 = 69 = 440 Hz).
#[inline]
pub fn frequency(pitch: i32) -> f64 {
    A4_FREQ * 2.0f64.powf((f64::from(pitch) - f64::from(A4_NOTE)) / 12.0)
}

/// Frequency multiplier for an offset in cents.
#[inline]
pub fn cents_to_ratio(cents: f64) -> f64 {
    2.0f64.powf(cents / 1200.0)
}

/// Convert milliseconds to a whole number of frames (rounded, never negative).
#[inline]
pub fn ms_to_frames(ms: f64, sample_rate: u32) -> usize {
    if !ms.is_finite() || ms <= 0.0 {
        return 0;
    }
    (ms * f64::from(sample_rate) / 1000.0).round() as usize
}

/// Tick-to-frame conversion at a fixed tempo.
///
/// `frames_per_tick = (60 * sample_rate) / (tempo_bpm * ticks_per_quarter)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickClock {
    sample_rate: u32,
    frames_per_tick: f64,
}

impl TickClock {
    /// Create a clock. Callers validate `tempo_bpm > 0` and `ticks_per_quarter > 0`.
    pub fn new(sample_rate: u32, tempo_bpm: f64, ticks_per_quarter: u32) -> Self {
        let frames_per_tick =
            (60.0 * f64::from(sample_rate)) / (tempo_bpm * f64::from(ticks_per_quarter));
        Self {
            sample_rate,
            frames_per_tick,
        }
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frames per tick at this tempo.
    pub fn frames_per_tick(&self) -> f64 {
        self.frames_per_tick
    }

    /// Frame index of a tick position. Negative ticks map to frame 0.
    #[inline]
    pub fn frame_of(&self, tick: i64) -> usize {
        if tick <= 0 {
            return 0;
        }
        (tick as f64 * self.frames_per_tick).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frequency_reference_points() {
        assert_relative_eq!(frequency(69), 440.0);
        assert_relative_eq!(frequency(81), 880.0, epsilon = 1e-9);
        assert_relative_eq!(frequency(57), 220.0, epsilon = 1e-9);
        assert_relative_eq!(frequency(60), 261.625_565_300_6, epsilon = 1e-6);
    }

    #[test]
    fn test_cents_ratio() {
        assert_relative_eq!(cents_to_ratio(0.0), 1.0);
        assert_relative_eq!(cents_to_ratio(1200.0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(cents_to_ratio(-1200.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_quarter_note_at_120_bpm_is_half_second() {
        let clock = TickClock::new(44100, 120.0, 480);
        assert_eq!(clock.frame_of(480), 22050);
        assert_eq!(clock.frame_of(960), 44100);
    }

    #[test]
    fn test_negative_ticks_clamp_to_zero() {
        let clock = TickClock::new(44100, 120.0, 480);
        assert_eq!(clock.frame_of(-100), 0);
        assert_eq!(clock.frame_of(0), 0);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 48000 Hz, 100 BPM, 480 tpq -> 60 frames per tick
        let clock = TickClock::new(48000, 100.0, 480);
        assert_relative_eq!(clock.frames_per_tick(), 60.0);
        // 1 tick at 0.5 frames per tick rounds up
        let half = TickClock::new(8000, 1000.0, 960);
        assert_relative_eq!(half.frames_per_tick(), 0.5);
        assert_eq!(half.frame_of(1), 1);
        assert_eq!(half.frame_of(3), 2);
    }

    #[test]
    fn test_ms_to_frames() {
        assert_eq!(ms_to_frames(30.0, 44100), 1323);
        assert_eq!(ms_to_frames(0.0, 44100), 0);
        assert_eq!(ms_to_frames(-5.0, 44100), 0);
        assert_eq!(ms_to_frames(f64::NAN, 44100), 0);
    }
}
