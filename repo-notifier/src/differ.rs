//! Classifies fresh observations against tracked state.

use crate::source::RepositoryObservation;
use crate::state::TrackedRepoState;
use chrono::{DateTime, Utc};

/// How a fetched repository relates to what was seen before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// First sighting of a repository created after the startup cutoff.
    UnseenNew,

    /// First sighting of a repository that already existed at startup.
    UnseenNotYetNew,

    /// Tracked, and stars, forks, watchers or description changed.
    Changed,

    /// Tracked and nothing compared has changed.
    Unchanged,
}

impl Classification {
    /// Returns the classification as a string for logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnseenNew => "unseen_new",
            Self::UnseenNotYetNew => "unseen_not_yet_new",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Classifies `current` given its tracked state, if any.
///
/// Only repositories created strictly after `startup_cutoff` are ever
/// announced as new.
#[must_use]
pub fn classify(
    previous: Option<&TrackedRepoState>,
    current: &RepositoryObservation,
    startup_cutoff: DateTime<Utc>,
) -> Classification {
    match previous {
        None if current.created_at > startup_cutoff => Classification::UnseenNew,
        None => Classification::UnseenNotYetNew,
        Some(previous) if previous.differs_from(current) => Classification::Changed,
        Some(_) => Classification::Unchanged,
    }
}

/// Sorts a batch so the most recently created repository is handled last.
///
/// Ties on creation time are broken by ascending id.
pub fn processing_order(observations: &mut [RepositoryObservation]) {
    observations.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}
