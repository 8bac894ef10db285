//! Centralized error type for the uta umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Render(#[from] uta_core::RenderError),

    #[cfg(feature = "voicebank")]
    #[error("Voicebank: {0}")]
    Voicebank(#[from] uta_voicebank::VoicebankError),

    #[cfg(feature = "ust")]
    #[error("UST: {0}")]
    Ust(#[from] uta_ust::UstError),

    #[cfg(feature = "export")]
    #[error("Export: {0}")]
    Export(#[from] uta_export::ExportError),

    #[error("Config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
