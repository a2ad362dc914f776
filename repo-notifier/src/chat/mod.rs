//! Posting notifications to a chat channel.
//!
//! [`ChatClient`] is the seam the dispatcher depends on. [`DiscordClient`]
//! talks to the Discord REST API; [`DryRunChat`] only logs.

mod discord;
mod dry_run;
mod error;

pub use discord::{DiscordClient, DEFAULT_API_BASE};
pub use dry_run::DryRunChat;
pub use error::ChatError;

use crate::render::Notification;
use async_trait::async_trait;
use std::fmt;

/// Channel identifier.
pub type ChannelId = u64;

/// Opaque handle to a previously sent message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageRef(String);

impl MessageRef {
    /// Wraps a platform message id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the platform message id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An already authenticated chat connection.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Posts a new message and returns its reference.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError`] if the message could not be posted.
    async fn send_message(
        &self,
        channel: ChannelId,
        notification: &Notification,
    ) -> Result<MessageRef, ChatError>;

    /// Replaces the content of an existing message.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::NotFound`] if the message was deleted, or another
    /// [`ChatError`] for any other failure.
    async fn edit_message(
        &self,
        channel: ChannelId,
        message: &MessageRef,
        notification: &Notification,
    ) -> Result<(), ChatError>;
}
