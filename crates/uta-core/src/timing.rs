//! Per-phoneme timing parameters and the lookup boundary.

use std::collections::HashMap;

/// Timing parameters for one lyric, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingEntry {
    /// Playback offset into the source recording
    pub offset_ms: f64,
    /// Fixed (unstretched) consonant region
    pub consonant_ms: f64,
    /// Time trimmed from the end of the rendered segment
    pub cutoff_ms: f64,
    /// Consonant lead-in; drives the noise onset window
    pub preutter_ms: f64,
    /// Crossfade with the previous phoneme; shortens the attack
    pub overlap_ms: f64,
}

impl TimingEntry {
    /// Values used when a lyric has no entry.
    pub const FALLBACK: TimingEntry = TimingEntry {
        offset_ms: 0.0,
        consonant_ms: 60.0,
        cutoff_ms: 0.0,
        preutter_ms: 30.0,
        overlap_ms: 10.0,
    };

    /// Copy with every field forced non-negative and finite.
    pub fn sanitized(self) -> Self {
        fn clean(v: f64) -> f64 {
            if v.is_finite() {
                v.max(0.0)
            } else {
                0.0
            }
        }
        Self {
            offset_ms: clean(self.offset_ms),
            consonant_ms: clean(self.consonant_ms),
            cutoff_ms: clean(self.cutoff_ms),
            preutter_ms: clean(self.preutter_ms),
            overlap_ms: clean(self.overlap_ms),
        }
    }
}

impl Default for TimingEntry {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Read-only lyric-to-timing lookup.
///
/// Shared across render workers, so implementations must be `Sync`.
/// Returning `None` is not an error; the renderer applies
/// [`TimingEntry::FALLBACK`].
pub trait TimingLookup: Sync {
    /// Look up the timing entry for a lyric key.
    fn lookup(&self, lyric: &str) -> Option<TimingEntry>;
}

/// Lookup that never has an entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTiming;

impl TimingLookup for NoTiming {
    fn lookup(&self, _lyric: &str) -> Option<TimingEntry> {
        None
    }
}

impl TimingLookup for HashMap<String, TimingEntry> {
    fn lookup(&self, lyric: &str) -> Option<TimingEntry> {
        self.get(lyric).copied()
    }
}

impl<T: TimingLookup + ?Sized> TimingLookup for &T {
    fn lookup(&self, lyric: &str) -> Option<TimingEntry> {
        (**self).lookup(lyric)
    }
}

/// Resolve a lyric's timing, falling back to defaults.
pub(crate) fn resolve<T: TimingLookup + ?Sized>(timing: &T, lyric: &str) -> TimingEntry {
    timing
        .lookup(lyric)
        .map(TimingEntry::sanitized)
        .unwrap_or(TimingEntry::FALLBACK)
}
