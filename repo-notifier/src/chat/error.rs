//! Chat client error types.

use thiserror::Error;

/// Errors that can occur while sending or editing notifications.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The message to edit no longer exists.
    #[error("Message {message} no longer exists in channel {channel}")]
    NotFound { channel: u64, message: String },

    /// The chat API rejected the request.
    #[error("Chat API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Transport failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid API URL.
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ChatError {
    /// Whether the edit target was deleted and a fresh send should follow.
    #[must_use]
    pub fn is_target_missing(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
