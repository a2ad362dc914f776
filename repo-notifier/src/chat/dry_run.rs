//! Log-only [`ChatClient`] for previewing notifications.

use super::{ChannelId, ChatClient, ChatError, MessageRef};
use crate::render::Notification;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Logs notifications instead of posting them.
///
/// Returns synthetic references so edits can be previewed too.
#[derive(Debug, Default)]
pub struct DryRunChat {
    next_id: AtomicU64,
}

impl DryRunChat {
    /// Creates a new dry-run client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatClient for DryRunChat {
    async fn send_message(
        &self,
        channel: ChannelId,
        notification: &Notification,
    ) -> Result<MessageRef, ChatError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let message = MessageRef::new(format!("dry-run-{id}"));
        info!(
            channel,
            message = %message,
            title = %notification.title,
            url = %notification.url,
            "[DRY RUN] Would send notification"
        );
        Ok(message)
    }

    async fn edit_message(
        &self,
        channel: ChannelId,
        message: &MessageRef,
        notification: &Notification,
    ) -> Result<(), ChatError> {
        info!(
            channel,
            message = %message,
            title = %notification.title,
            url = %notification.url,
            "[DRY RUN] Would edit notification"
        );
        Ok(())
    }
}
