//! Error types for the patch engine

use thiserror::Error;

/// Errors raised by generators, effects and the master bus
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied parameter is out of range. Nothing was processed.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The bus could not be configured (e.g. unsupported bit depth)
    #[error("configuration failure: {0}")]
    Configuration(String),

    /// The WAV writer failed
    #[error("WAV sink error: {0}")]
    Wav(#[from] hound::Error),

    /// The playback device failed
    #[error("playback sink error: {0}")]
    Playback(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A write was attempted after the sink was closed
    #[error("sink `{0}` is closed")]
    SinkClosed(String),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
