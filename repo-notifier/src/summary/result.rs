//! Per-repository outcome types.

use crate::dispatch::DispatchAction;
use crate::source::RepositoryId;

/// Result of reconciling a single repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    /// Dispatch succeeded and the tracked state advanced.
    Dispatched {
        /// Repository id.
        id: RepositoryId,
        /// Repository name.
        repository: String,
        /// Action taken.
        action: DispatchAction,
    },

    /// Dispatch failed; the tracked state was left as it was.
    Failed {
        /// Repository id.
        id: RepositoryId,
        /// Repository name.
        repository: String,
        /// Error message.
        error: String,
    },
}
