//! Dispatch action types.

use crate::chat::MessageRef;
use crate::state::TrackedRepoState;

/// What the dispatcher did for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchAction {
    /// Sent a creation notification.
    Announced,

    /// Edited the existing notification in place.
    Edited,

    /// The existing notification was gone; sent a replacement.
    Reposted,

    /// Changed, but no notification existed yet; sent an update.
    AnnouncedUpdate,

    /// Recorded a pre-existing repository silently.
    Recorded,

    /// Nothing changed; refreshed the stored observation.
    Refreshed,
}

impl DispatchAction {
    /// Returns the action as a string for logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Announced => "announced",
            Self::Edited => "edited",
            Self::Reposted => "reposted",
            Self::AnnouncedUpdate => "announced_update",
            Self::Recorded => "recorded",
            Self::Refreshed => "refreshed",
        }
    }
}

/// Successful dispatch: the state to store and what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// Replacement tracked state for the repository.
    pub state: TrackedRepoState,

    /// Action taken.
    pub action: DispatchAction,
}

impl Dispatched {
    /// Reference of the notification now representing the repository.
    #[must_use]
    pub fn notification_ref(&self) -> Option<&MessageRef> {
        self.state.notification_ref.as_ref()
    }
}
