//! Singing-voice rendering kernel for Uta.
//!
//! Turns a timeline of [`Note`]s into a mono `f32` buffer:
//!
//! - **[`PitchCurve`]** - manual automation, attack scoop, vibrato and legato glide
//! - **[`SynthState`]** - phase-continuous harmonic oscillator with a noisy consonant onset
//! - **[`NoteEnvelope`]** - velocity-scaled smoothstep attack and release
//! - **[`Renderer`]** - parallel scheduler with deterministic merge
//! - **[`TimingLookup`]** - read-only per-lyric timing boundary (oto.ini lives elsewhere)
//!
//! # Quick Start
//!
//! ```ignore
//! use uta_core::{render, Note, NoTiming, RenderConfig};
//!
//! let notes = vec![
//!     Note::new(60, 0, 480, "ka"),
//!     Note::new(64, 480, 480, "na"),
//! ];
//! let result = render(&notes, &NoTiming, &RenderConfig::default())?;
//! assert_eq!(result.sample_rate, 44100);
//! ```
//!
//! Output is identical for any worker count; only wall-clock time changes.

pub mod error;
pub use error::{RenderError, Result};

pub mod math;
pub use math::{frequency, TickClock};

mod note;
pub use note::{Note, REST_LYRICS};

mod timing;
pub use timing::{NoTiming, TimingEntry, TimingLookup};

mod config;
pub use config::{RenderConfig, DEFAULT_MEMORY_BUDGET_BYTES, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE};

pub mod shaping;
pub use shaping::{safety_gain, soft_limit, NoteEnvelope};

mod vowel;
pub use vowel::{classify, HarmonicProfile, VowelClass};

mod pitch;
pub use pitch::PitchCurve;

mod oscillator;
pub use oscillator::{NoiseSource, SynthState};

mod voice;
pub use voice::{NoteVoice, NOTE_AMPLITUDE};

mod scheduler;
pub use scheduler::{
    hardware_concurrency, max_render_frames, render, RenderBuffer, RenderPhase, RenderPlan,
    RenderResult, Renderer, MAX_RENDER_SECONDS,
};
