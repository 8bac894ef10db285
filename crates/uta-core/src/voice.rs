//! Per-note rendering: pitch curve → oscillator → envelope → worker buffer.

use crate::error::{RenderError, Result};
use crate::math::{ms_to_frames, TickClock};
use crate::note::Note;
use crate::oscillator::SynthState;
use crate::pitch::PitchCurve;
use crate::shaping::{safety_gain, NoteEnvelope};
use crate::timing::TimingEntry;
use crate::vowel::{classify, HarmonicProfile};

/// Peak amplitude of a single voice before master gain.
pub const NOTE_AMPLITUDE: f64 = 0.5;

/// Cutoff never trims a note below this length.
pub const MIN_NOTE_MS: f64 = 20.0;

/// Consonant window never exceeds this share of the note.
pub const CONSONANT_MAX_SHARE: f64 = 0.45;

/// A note resolved against the timeline, ready to synthesize.
#[derive(Debug, Clone)]
pub struct NoteVoice<'a> {
    index: usize,
    start_frame: usize,
    frames: usize,
    sample_rate: u32,
    curve: PitchCurve<'a>,
    envelope: NoteEnvelope,
    profile: HarmonicProfile,
    consonant_frames: usize,
}

impl<'a> NoteVoice<'a> {
    /// Resolve note `index` of `notes`.
    ///
    /// Returns `None` for rests and for notes that produce no frames inside
    /// a buffer of `total_frames`.
    pub fn prepare(
        notes: &'a [Note],
        index: usize,
        timing: TimingEntry,
        clock: &TickClock,
        total_frames: usize,
    ) -> Option<Self> {
        let note = notes.get(index)?;
        if note.is_rest() {
            return None;
        }

        let start_frame = clock.frame_of(note.start_tick);
        let note_frames = clock.frame_of(note.duration_tick);
        if start_frame >= total_frames || note_frames == 0 {
            return None;
        }

        let sample_rate = clock.sample_rate();
        let render_frames = note_frames.min(total_frames - start_frame);
        let min_frames = ms_to_frames(MIN_NOTE_MS, sample_rate).min(render_frames);
        let frames = render_frames
            .saturating_sub(ms_to_frames(timing.cutoff_ms, sample_rate))
            .max(min_frames);
        if frames == 0 {
            return None;
        }

        let next = notes.get(index + 1).filter(|next| !next.is_rest());
        let consonant_cap = (frames as f64 * CONSONANT_MAX_SHARE) as usize;

        Some(Self {
            index,
            start_frame,
            frames,
            sample_rate,
            curve: PitchCurve::new(note, next, frames, clock),
            envelope: NoteEnvelope::new(note.velocity, frames, sample_rate, timing.overlap_ms),
            profile: classify(&note.lyric).profile(),
            consonant_frames: ms_to_frames(timing.preutter_ms, sample_rate).min(consonant_cap),
        })
    }

    /// Index of the note in the timeline.
    pub fn index(&self) -> usize {
        self.index
    }

    /// First output frame written by this note.
    pub fn start_frame(&self) -> usize {
        self.start_frame
    }

    /// Number of synthesized frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Length of the noisy consonant onset.
    pub fn consonant_frames(&self) -> usize {
        self.consonant_frames
    }

    pub fn curve(&self) -> &PitchCurve<'a> {
        &self.curve
    }

    /// Synthesize additively into `buffer`; writes past its end are dropped.
    pub fn render_into(&self, state: &mut SynthState, buffer: &mut [f32]) -> Result<()> {
        let sr = f64::from(self.sample_rate);
        let max_frequency = sr;
        let base = self.curve.base_frequency();

        for f in 0..self.frames {
            let frequency = match self.curve.frequency_at(f) {
                hz if hz.is_finite() => hz.clamp(0.0, max_frequency),
                _ => base.clamp(0.0, max_frequency),
            };

            let tone = state.oscillate(&self.profile, frequency, sr);
            let voiced = state.consonant_blend(tone, f, self.consonant_frames);
            let smoothed = state.smooth(voiced);

            let sample = NOTE_AMPLITUDE
                * self.envelope.gain(f)
                * safety_gain(frequency, self.sample_rate)
                * smoothed;
            if !sample.is_finite() {
                return Err(RenderError::NonFiniteSample {
                    note_index: self.index,
                    frame: f,
                });
            }

            if let Some(slot) = buffer.get_mut(self.start_frame + f) {
                *slot += sample as f32;
            }
        }
        Ok(())
    }
}
