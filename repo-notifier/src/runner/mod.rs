//! Wires settings, GitHub and Discord into a running reconciler.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::chat::{ChatClient, DiscordClient, DryRunChat};
use crate::config::{load_settings, SettingsWatcher};
use crate::reconcile::Reconciler;
use crate::source::GitHubSource;
use crate::summary::CycleSummary;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// A fully wired notifier.
pub struct Runner {
    reconciler: Reconciler,
    watcher: SettingsWatcher,
    reload_debounce: Duration,
}

impl Runner {
    /// Builds a runner from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the settings are invalid, a client can't be
    /// built, or no Discord token is available outside dry-run mode.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let settings = load_settings(config.config_path())?;
        let request_timeout = settings.request_timeout();
        let (watcher, receiver) = SettingsWatcher::new(config.config_path(), settings);

        let source = GitHubSource::from_token(
            config.github_token().map(str::to_string),
            config.github_api_url(),
        )?;

        let chat: Arc<dyn ChatClient> = if config.dry_run() {
            info!("Dry run: notifications will be logged, not posted");
            Arc::new(DryRunChat::new())
        } else {
            let token = config
                .discord_token()
                .ok_or(RunnerError::MissingDiscordToken)?;
            Arc::new(DiscordClient::with_base_url(
                token.to_string(),
                config.discord_api_url(),
                request_timeout,
            )?)
        };

        Ok(Self {
            reconciler: Reconciler::new(Arc::new(source), chat, receiver),
            watcher,
            reload_debounce: config.reload_debounce(),
        })
    }

    /// Watches the settings file and reconciles until the process ends.
    ///
    /// If the settings file can't be watched, the loop still runs with the
    /// settings loaded at startup.
    pub async fn run(self) {
        let Self {
            mut reconciler,
            watcher,
            reload_debounce,
        } = self;

        let _guard = match watcher.spawn(reload_debounce) {
            Ok(guard) => Some(guard),
            Err(e) => {
                warn!(error = %e, "Settings hot reload disabled");
                None
            }
        };
        reconciler.run().await;
    }

    /// Runs a single cycle and returns its summary.
    pub async fn run_once(mut self) -> CycleSummary {
        self.reconciler.run_cycle().await
    }
}
