//! Error type shared by the library modules.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised outside the per-frame core (config, audio, terminal).
///
/// The analyzer and the renderers never return errors: degenerate input is
/// clamped instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("audio device error: {0}")]
    AudioDevice(String),

    #[error("failed to decode WAV file {path}: {source}")]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("unknown visualization style '{0}'")]
    UnknownStyle(String),

    #[error("unknown color scheme '{0}'")]
    UnknownScheme(String),

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
