//! # Uta - Offline Singing-Voice Renderer
//!
//! Renders UTAU-style note timelines to audio.
//!
//! ## Architecture
//!
//! Uta is an umbrella crate that coordinates:
//! - **uta-core** - Rendering engine (pitch curves, harmonic voice, shaping, parallel scheduler)
//! - **uta-voicebank** - `oto.ini` parsing and per-alias timing lookup
//! - **uta-ust** - `.ust` and `.ustx` sequence parsing
//! - **uta-export** - WAV encoding
//!
//! ## Quick Start
//!
//! ```ignore
//! use uta::prelude::*;
//!
//! let bank = Voicebank::load_dir("voices/teto")?;
//! let session = Session::new(SessionConfig::default());
//! let result = session.render_ust_file("song.ust", &bank)?;
//! session.export(&result, "song.wav")?;
//! ```
//!
//! ## Feature Flags
//!
//! - `default` / `full` - Everything enabled
//! - `voicebank` - Voicebank loading
//! - `ust` - UST parsing and session helpers
//! - `export` - WAV export

/// Re-export of uta-core for direct access
pub use uta_core as core;

// Core types
pub use uta_core::{
    render, Note, NoTiming, RenderBuffer, RenderConfig, RenderError, RenderResult, Renderer,
    TimingEntry, TimingLookup,
};

#[cfg(feature = "voicebank")]
pub use uta_voicebank as voicebank;

#[cfg(feature = "ust")]
pub use uta_ust as ust;

#[cfg(feature = "export")]
pub use uta_export as export;

mod config;
mod error;

pub use config::{ExportSection, SessionConfig};
pub use error::{Error, Result};

#[cfg(feature = "ust")]
mod session;

#[cfg(feature = "ust")]
pub use session::{render_ust_file, Session};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{Error, SessionConfig};

    // Engine
    pub use crate::core::{
        render, Note, NoTiming, RenderConfig, RenderError, RenderResult, Renderer, TimingEntry,
        TimingLookup,
    };

    // Inputs
    #[cfg(feature = "voicebank")]
    pub use crate::voicebank::Voicebank;

    #[cfg(feature = "ust")]
    pub use crate::ust::{load_project, load_ust, UstProject};

    #[cfg(feature = "ust")]
    pub use crate::Session;

    // Output
    #[cfg(feature = "export")]
    pub use crate::export::{export_to_file, BitDepth, ExportOptions, NormalizationMode};
}
