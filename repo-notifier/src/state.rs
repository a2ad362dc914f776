//! In-memory record of repositories already observed.

use crate::chat::MessageRef;
use crate::source::{RepositoryId, RepositoryObservation};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// What the engine remembers about one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedRepoState {
    /// Last seen name, for logging.
    pub name: String,

    /// Last dispatched description.
    pub description: Option<String>,

    /// Last dispatched stargazer count.
    pub star_count: u64,

    /// Last dispatched fork count.
    pub fork_count: u64,

    /// Last dispatched watcher count.
    pub watcher_count: u64,

    /// Last seen update time.
    pub updated_at: DateTime<Utc>,

    /// Chat message announcing this repository, if one was ever sent.
    pub notification_ref: Option<MessageRef>,

    /// Consecutive successful fetches this repository was absent from.
    pub missed_polls: u32,
}

impl TrackedRepoState {
    /// Captures `observation` together with its notification reference.
    #[must_use]
    pub fn observe(observation: &RepositoryObservation, notification_ref: Option<MessageRef>) -> Self {
        Self {
            name: observation.name.clone(),
            description: observation.description.clone(),
            star_count: observation.star_count,
            fork_count: observation.fork_count,
            watcher_count: observation.watcher_count,
            updated_at: observation.updated_at,
            notification_ref,
            missed_polls: 0,
        }
    }

    /// Whether any of the compared fields differ from `observation`.
    ///
    /// Only stars, forks, watchers and description are compared.
    #[must_use]
    pub fn differs_from(&self, observation: &RepositoryObservation) -> bool {
        self.star_count != observation.star_count
            || self.fork_count != observation.fork_count
            || self.watcher_count != observation.watcher_count
            || self.description != observation.description
    }
}

/// Tracked repositories keyed by id. Holds at most one entry per id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedState {
    entries: HashMap<RepositoryId, TrackedRepoState>,
}

impl TrackedState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a repository.
    #[must_use]
    pub fn get(&self, id: RepositoryId) -> Option<&TrackedRepoState> {
        self.entries.get(&id)
    }

    /// Inserts or replaces the entry for `id`.
    pub fn upsert(&mut self, id: RepositoryId, state: TrackedRepoState) {
        self.entries.insert(id, state);
    }

    /// Number of tracked repositories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Updates miss counters after a successful fetch.
    ///
    /// Entries in `seen` get their counter reset. Others are incremented and
    /// dropped once they reach `evict_after`; `0` disables eviction.
    /// Returns the evicted ids in ascending order.
    pub fn record_fetch(&mut self, seen: &HashSet<RepositoryId>, evict_after: u32) -> Vec<RepositoryId> {
        let mut evicted = Vec::new();

        self.entries.retain(|id, entry| {
            if seen.contains(id) {
                entry.missed_polls = 0;
                return true;
            }

            entry.missed_polls = entry.missed_polls.saturating_add(1);
            if evict_after > 0 && entry.missed_polls >= evict_after {
                evicted.push(*id);
                false
            } else {
                true
            }
        });

        evicted.sort();
        evicted
    }
}
