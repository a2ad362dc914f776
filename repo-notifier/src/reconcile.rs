//! The reconciliation loop.
//!
//! One [`Reconciler`] owns the tracked state and runs cycles one after
//! another: fetch, classify and dispatch every repository in order, then
//! sleep. Nothing else touches the state, so no locking is needed.

use crate::chat::{ChannelId, ChatClient};
use crate::config::Settings;
use crate::differ::{classify, processing_order};
use crate::dispatch::Dispatcher;
use crate::source::{RepositoryObservation, RepositorySource, SourceError};
use crate::state::TrackedState;
use crate::summary::{CycleSummary, RepoOutcome, SkipReason};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Waiting to start the next cycle.
    Idle,
    /// Fetching repositories.
    Fetching,
    /// Classifying and dispatching the fetched batch.
    Reconciling,
    /// Waiting out the poll interval.
    Sleeping,
}

/// Drives fetch, diff and dispatch cycles for one watched account.
pub struct Reconciler {
    source: Arc<dyn RepositorySource>,
    dispatcher: Dispatcher,
    settings: watch::Receiver<Settings>,
    state: TrackedState,
    account: Option<String>,
    startup_cutoff: Option<DateTime<Utc>>,
    phase: LoopPhase,
}

impl Reconciler {
    /// Creates a reconciler reading settings from `settings`.
    pub fn new(
        source: Arc<dyn RepositorySource>,
        chat: Arc<dyn ChatClient>,
        settings: watch::Receiver<Settings>,
    ) -> Self {
        Self {
            source,
            dispatcher: Dispatcher::new(chat),
            settings,
            state: TrackedState::new(),
            account: None,
            startup_cutoff: None,
            phase: LoopPhase::Idle,
        }
    }

    /// Fixes the startup cutoff instead of taking it from the clock at the
    /// first cycle.
    #[must_use]
    pub fn with_startup_cutoff(mut self, cutoff: DateTime<Utc>) -> Self {
        self.startup_cutoff = Some(cutoff);
        self
    }

    /// Tracked repositories.
    #[must_use]
    pub fn state(&self) -> &TrackedState {
        &self.state
    }

    /// Cutoff separating new repositories from pre-existing ones, once set.
    #[must_use]
    pub fn startup_cutoff(&self) -> Option<DateTime<Utc>> {
        self.startup_cutoff
    }

    /// Current loop phase.
    #[must_use]
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Runs cycles forever, sleeping the configured interval between them.
    ///
    /// Never returns; errors are logged and retried on the next cycle.
    pub async fn run(&mut self) {
        info!("Starting reconciliation loop");
        loop {
            self.run_cycle().await;

            let interval = self.settings.borrow().poll_interval();
            debug!(secs = interval.as_secs(), "Sleeping until next cycle");
            tokio::time::sleep(interval).await;
            self.phase = LoopPhase::Idle;
        }
    }

    /// Runs a single cycle against a snapshot of the current settings.
    ///
    /// The first call fixes the startup cutoff if none was given.
    pub async fn run_cycle(&mut self) -> CycleSummary {
        let settings = self.settings.borrow().clone();
        let cutoff = *self.startup_cutoff.get_or_insert_with(Utc::now);

        let summary = self.cycle(&settings, cutoff).await;
        self.phase = LoopPhase::Sleeping;

        if summary.skipped.is_none() {
            info!(
                fetched = summary.fetched,
                announced = summary.announced,
                edited = summary.edited,
                reposted = summary.reposted,
                recorded = summary.recorded,
                unchanged = summary.unchanged,
                failed = summary.failed,
                evicted = summary.evicted,
                tracked = self.state.len(),
                "Cycle complete"
            );
        }
        summary
    }

    async fn cycle(&mut self, settings: &Settings, cutoff: DateTime<Utc>) -> CycleSummary {
        let Some(account) = settings.account() else {
            debug!("No account configured, skipping cycle");
            return CycleSummary::skipped(SkipReason::NoAccount);
        };
        let Some(channel) = settings.channel() else {
            warn!(account, "No channel configured, skipping cycle");
            return CycleSummary::skipped(SkipReason::NoChannel);
        };

        self.phase = LoopPhase::Fetching;
        let mut observations = match self.fetch(account, settings.request_timeout()).await {
            Ok(observations) => observations,
            Err(e) => {
                error!(account, error = %e, "Failed to fetch repositories, skipping cycle");
                return CycleSummary::skipped(SkipReason::FetchFailed {
                    error: e.to_string(),
                });
            }
        };

        if self.account.as_deref() != Some(account) {
            if let Some(previous) = &self.account {
                info!(
                    previous = %previous,
                    account,
                    discarded = self.state.len(),
                    "Watched account changed, discarding tracked state"
                );
            }
            self.state.clear();
            self.account = Some(account.to_string());
        }

        self.phase = LoopPhase::Reconciling;
        let mut summary = CycleSummary {
            fetched: observations.len(),
            ..Default::default()
        };

        processing_order(&mut observations);
        for observation in &observations {
            let outcome = self
                .reconcile_one(settings, channel, observation, cutoff)
                .await;
            summary.record(&outcome);
        }

        let seen: HashSet<_> = observations.iter().map(|o| o.id).collect();
        let evicted = self
            .state
            .record_fetch(&seen, settings.github.evict_after_missed_polls);
        for id in &evicted {
            info!(id = %id, "Forgetting repository missing from recent polls");
        }
        summary.evicted = evicted.len();

        summary
    }

    async fn fetch(
        &self,
        account: &str,
        timeout: Duration,
    ) -> Result<Vec<RepositoryObservation>, SourceError> {
        match tokio::time::timeout(timeout, self.source.fetch_all(account)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                account: account.to_string(),
                timeout,
            }),
        }
    }

    /// Classifies and dispatches one repository.
    ///
    /// The tracked entry only changes when dispatch succeeds.
    async fn reconcile_one(
        &mut self,
        settings: &Settings,
        channel: ChannelId,
        observation: &RepositoryObservation,
        cutoff: DateTime<Utc>,
    ) -> RepoOutcome {
        let previous = self.state.get(observation.id);
        let classification = classify(previous, observation, cutoff);

        let result = self
            .dispatcher
            .dispatch(settings, channel, observation, classification, previous)
            .await;

        match result {
            Ok(dispatched) => {
                let action = dispatched.action;
                debug!(
                    repo = %observation.name,
                    action = action.as_str(),
                    message = ?dispatched.notification_ref(),
                    "Dispatched"
                );
                self.state.upsert(observation.id, dispatched.state);
                RepoOutcome::Dispatched {
                    id: observation.id,
                    repository: observation.name.clone(),
                    action,
                }
            }
            Err(e) => {
                error!(
                    repo = %observation.name,
                    classification = classification.as_str(),
                    error = %e,
                    "Failed to dispatch notification"
                );
                RepoOutcome::Failed {
                    id: observation.id,
                    repository: observation.name.clone(),
                    error: e.to_string(),
                }
            }
        }
    }
}
