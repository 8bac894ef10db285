//! UTAU voicebank support for Uta.
//!
//! - **[`Voicebank`]** - alias table loaded from a directory or a single `oto.ini`
//! - **[`OtoEntry`]** - one parsed `oto.ini` line
//! - **[`CharacterInfo`]** - singer name and author from `character.txt`
//!
//! [`Voicebank`] implements [`uta_core::TimingLookup`], so it can be passed
//! straight to the renderer:
//!
//! ```ignore
//! use uta_voicebank::Voicebank;
//!
//! let bank = Voicebank::load_dir("voices/teto")?;
//! let result = uta_core::render(&notes, &bank, &config)?;
//! ```

pub mod error;
pub use error::{Result, VoicebankError};

mod character;
pub use character::CharacterInfo;

pub mod oto;
pub use oto::{parse_oto, OtoEntry};

mod voicebank;
pub use voicebank::Voicebank;
