//! Turning classifications into chat actions.
//!
//! The dispatcher is the only component that talks to the chat platform.
//! It never mutates tracked state itself: it returns the replacement
//! [`TrackedRepoState`] and the caller stores it, or keeps the old entry
//! when an error is returned.

mod action;
mod error;

pub use action::{DispatchAction, Dispatched};
pub use error::DispatchError;

use crate::chat::{ChannelId, ChatClient, MessageRef};
use crate::config::Settings;
use crate::differ::Classification;
use crate::render::{Notification, NotificationRenderer};
use crate::source::RepositoryObservation;
use crate::state::TrackedRepoState;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};

/// Sends and edits notifications.
pub struct Dispatcher {
    chat: Arc<dyn ChatClient>,
    renderer: NotificationRenderer,
}

impl Dispatcher {
    /// Creates a dispatcher posting through `chat`.
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self {
            chat,
            renderer: NotificationRenderer::new(),
        }
    }

    /// Acts on one classified repository.
    ///
    /// - [`Classification::UnseenNew`]: sends a creation notification.
    /// - [`Classification::UnseenNotYetNew`]: records silently.
    /// - [`Classification::Changed`]: edits the stored notification, sending
    ///   a new one if it was deleted or never existed.
    /// - [`Classification::Unchanged`]: refreshes the stored observation.
    ///
    /// At most one send or edit succeeds per call.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] if rendering or the chat call fails. The
    /// caller must then keep `previous` as is.
    pub async fn dispatch(
        &self,
        settings: &Settings,
        channel: ChannelId,
        observation: &RepositoryObservation,
        classification: Classification,
        previous: Option<&TrackedRepoState>,
    ) -> Result<Dispatched, DispatchError> {
        let span = info_span!(
            "dispatch",
            repo = %observation.name,
            classification = classification.as_str()
        );

        async {
            let existing = previous.and_then(|p| p.notification_ref.clone());

            match classification {
                Classification::UnseenNew => {
                    let notification = self.renderer.render(observation, false, settings)?;
                    let message = self.chat.send_message(channel, &notification).await?;
                    info!(message = %message, "Announced new repository");
                    Ok(dispatched(observation, Some(message), DispatchAction::Announced))
                }
                Classification::UnseenNotYetNew => {
                    debug!("Recording pre-existing repository");
                    Ok(dispatched(observation, None, DispatchAction::Recorded))
                }
                Classification::Changed => {
                    let notification = self.renderer.render(observation, true, settings)?;
                    match existing {
                        Some(message) => {
                            self.update(channel, observation, message, &notification)
                                .await
                        }
                        None => {
                            let message = self.chat.send_message(channel, &notification).await?;
                            info!(message = %message, "Announced update for untracked notification");
                            Ok(dispatched(
                                observation,
                                Some(message),
                                DispatchAction::AnnouncedUpdate,
                            ))
                        }
                    }
                }
                Classification::Unchanged => {
                    Ok(dispatched(observation, existing, DispatchAction::Refreshed))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Edits `message`, falling back to a fresh send if it was deleted.
    async fn update(
        &self,
        channel: ChannelId,
        observation: &RepositoryObservation,
        message: MessageRef,
        notification: &Notification,
    ) -> Result<Dispatched, DispatchError> {
        match self.chat.edit_message(channel, &message, notification).await {
            Ok(()) => {
                info!(message = %message, "Edited notification");
                Ok(dispatched(observation, Some(message), DispatchAction::Edited))
            }
            Err(e) if e.is_target_missing() => {
                warn!(message = %message, "Notification was deleted, sending a new one");
                let replacement = self.chat.send_message(channel, notification).await?;
                info!(message = %replacement, "Reposted notification");
                Ok(dispatched(
                    observation,
                    Some(replacement),
                    DispatchAction::Reposted,
                ))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn dispatched(
    observation: &RepositoryObservation,
    notification_ref: Option<MessageRef>,
    action: DispatchAction,
) -> Dispatched {
    Dispatched {
        state: TrackedRepoState::observe(observation, notification_ref),
        action,
    }
}
