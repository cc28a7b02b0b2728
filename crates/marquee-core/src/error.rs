//! Error types for Marquee Core

use thiserror::Error;

/// Result type alias for player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal player errors.
///
/// Any of these during initialization puts the player into its terminal
/// error state. Nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    // Fetch errors
    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("No media found")]
    EmptyPlaylist,

    #[error("Invalid playlist response: {0}")]
    InvalidResponse(String),

    // Network errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Playback errors
    #[error("Invalid player state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },
}

impl Error {
    /// Returns true if this error ends the session
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::InvalidStateTransition { .. })
    }

    /// Returns a stable error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::HttpStatus { .. } => "HTTP_STATUS",
            Error::EmptyPlaylist => "EMPTY_PLAYLIST",
            Error::InvalidResponse(_) => "INVALID_RESPONSE",
            Error::Network(_) => "NETWORK",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::InvalidStateTransition { .. } => "INVALID_STATE",
        }
    }
}

/// Per-item media failures.
///
/// These never reach the display; the player logs them and skips to the
/// next item.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaFailure {
    #[error("Image could not be decoded: {url}")]
    ImageDecode { url: String },

    #[error("Playback rejected: {url}")]
    PlaybackRejected { url: String },

    #[error("Playback failed: {url}")]
    Playback { url: String },
}
