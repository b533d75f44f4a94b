//! Error types for the Ethos Mini App backend.

use thiserror::Error;

/// Result type for credibility operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching or building credibility data.
///
/// A subject without an Ethos profile is not an error; lookups return
/// `Ok(None)` for that case.
#[derive(Debug, Error)]
pub enum Error {
    /// Upstream answered with a non-2xx, non-404 status
    #[error("Ethos API error: status {status}")]
    Upstream { status: u16 },

    /// Upstream body could not be decoded
    #[error("Failed to decode Ethos response: {0}")]
    Decode(String),

    /// Request never produced a response (connect error, timeout, ...)
    #[error("Ethos request failed: {0}")]
    Transport(String),

    /// Bad caller input
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Configuration problem
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }

    /// Upstream-side failure (as opposed to a caller mistake)
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Upstream { .. } | Error::Decode(_) | Error::Transport(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Error::Upstream {
                status: status.as_u16(),
            }
        } else {
            Error::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}
