//! Note events consumed by the renderer.

/// Lyrics that mark a rest instead of a sung note.
pub const REST_LYRICS: [&str; 6] = ["R", "r", "rest", "REST", "pau", "sil"];

/// Default automatic vibrato depth in cents.
pub const DEFAULT_VIBRATO_DEPTH_CENTS: f64 = 18.0;

/// Default automatic vibrato rate in Hz.
pub const DEFAULT_VIBRATO_RATE_HZ: f64 = 5.5;

/// A single note in the timeline.
///
/// Tick fields are signed so that malformed input can be carried without
/// panicking; negative positions and durations render as zero / empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Semitone index (A4 = 69)
    pub pitch: i32,
    /// Start position in ticks
    pub start_tick: i64,
    /// Duration in ticks
    pub duration_tick: i64,
    /// Velocity (0-200); higher values shorten the attack
    pub velocity: u8,
    /// Key used for timing lookup and vowel classification
    pub lyric: String,
    /// Cent offsets sampled uniformly across the note
    pub manual_pitch_curve: Vec<f64>,
    /// Enables the attack scoop and vibrato
    pub auto_pitch_enabled: bool,
    /// Vibrato depth in cents
    pub vibrato_depth_cents: f64,
    /// Vibrato rate in Hz
    pub vibrato_rate_hz: f64,
}

impl Default for Note {
    fn default() -> Self {
        Self {
            pitch: 60,
            start_tick: 0,
            duration_tick: 480,
            velocity: 100,
            lyric: "a".to_string(),
            manual_pitch_curve: Vec::new(),
            auto_pitch_enabled: true,
            vibrato_depth_cents: DEFAULT_VIBRATO_DEPTH_CENTS,
            vibrato_rate_hz: DEFAULT_VIBRATO_RATE_HZ,
        }
    }
}

impl Note {
    /// Create a note with default expression settings.
    pub fn new(pitch: i32, start_tick: i64, duration_tick: i64, lyric: impl Into<String>) -> Self {
        Self {
            pitch,
            start_tick,
            duration_tick,
            lyric: lyric.into(),
            ..Default::default()
        }
    }

    /// Set velocity (clamped to 0-200).
    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity.min(200);
        self
    }

    /// Set the manual pitch curve in cents.
    pub fn with_pitch_curve(mut self, cents: Vec<f64>) -> Self {
        self.manual_pitch_curve = cents;
        self
    }

    /// Enable or disable the automatic scoop and vibrato.
    pub fn with_auto_pitch(mut self, enabled: bool) -> Self {
        self.auto_pitch_enabled = enabled;
        self
    }

    /// Set vibrato depth (cents) and rate (Hz).
    pub fn with_vibrato(mut self, depth_cents: f64, rate_hz: f64) -> Self {
        self.vibrato_depth_cents = depth_cents;
        self.vibrato_rate_hz = rate_hz;
        self
    }

    /// End position in ticks, treating negative values as zero.
    pub fn end_tick(&self) -> i64 {
        self.start_tick.max(0).saturating_add(self.duration_tick.max(0))
    }

    /// Whether this note is a rest (renders silence).
    pub fn is_rest(&self) -> bool {
        let lyric = self.lyric.trim();
        REST_LYRICS.contains(&lyric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_detection() {
        assert!(Note::new(60, 0, 480, "R").is_rest());
        assert!(Note::new(60, 0, 480, " pau ").is_rest());
        assert!(Note::new(60, 0, 480, "sil").is_rest());
        assert!(!Note::new(60, 0, 480, "ra").is_rest());
        assert!(!Note::new(60, 0, 480, "").is_rest());
    }

    #[test]
    fn test_end_tick_ignores_negative_values() {
        assert_eq!(Note::new(60, 480, 240, "a").end_tick(), 720);
        assert_eq!(Note::new(60, -100, 240, "a").end_tick(), 240);
        assert_eq!(Note::new(60, 480, -5, "a").end_tick(), 480);
        assert_eq!(Note::new(60, i64::MAX, 480, "a").end_tick(), i64::MAX);
    }

    #[test]
    fn test_default_note_is_sung_quarter() {
        let note = Note::default();
        assert_eq!(note.duration_tick, 480);
        assert_eq!(note.lyric, "a");
        assert!(note.auto_pitch_enabled);
        assert!(!note.is_rest());
    }

    #[test]
    fn test_velocity_clamped() {
        assert_eq!(Note::default().with_velocity(255).velocity, 200);
    }
}
