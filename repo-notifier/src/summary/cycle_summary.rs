//! Cycle summary types.

use super::result::RepoOutcome;
use crate::dispatch::DispatchAction;

/// Why a cycle did no reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No account configured.
    NoAccount,

    /// No channel configured.
    NoChannel,

    /// The fetch failed; state was left untouched.
    FetchFailed {
        /// Error message.
        error: String,
    },
}

/// Summary of one fetch, diff and dispatch pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Number of repositories fetched.
    pub fetched: usize,

    /// New repositories announced.
    pub announced: usize,

    /// Notifications edited in place.
    pub edited: usize,

    /// Notifications re-sent, either because the old one was deleted or
    /// because none existed yet.
    pub reposted: usize,

    /// Pre-existing repositories recorded silently.
    pub recorded: usize,

    /// Repositories without changes.
    pub unchanged: usize,

    /// Repositories whose dispatch failed.
    pub failed: usize,

    /// Tracked repositories forgotten after being absent too long.
    pub evicted: usize,

    /// Set when the cycle was skipped.
    pub skipped: Option<SkipReason>,
}

impl CycleSummary {
    /// Creates a summary for a skipped cycle.
    #[must_use]
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Default::default()
        }
    }

    /// Updates the summary with a repository outcome.
    pub fn record(&mut self, outcome: &RepoOutcome) {
        match outcome {
            RepoOutcome::Dispatched { action, .. } => match action {
                DispatchAction::Announced => self.announced += 1,
                DispatchAction::Edited => self.edited += 1,
                DispatchAction::Reposted | DispatchAction::AnnouncedUpdate => self.reposted += 1,
                DispatchAction::Recorded => self.recorded += 1,
                DispatchAction::Refreshed => self.unchanged += 1,
            },
            RepoOutcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Returns true if any repository failed or the fetch failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || matches!(self.skipped, Some(SkipReason::FetchFailed { .. }))
    }
}
