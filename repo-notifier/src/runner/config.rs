//! Runner configuration.

use crate::chat::DEFAULT_API_BASE;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Startup options for the notifier.
///
/// Secrets live here rather than in the settings file, which may be
/// reloaded at any time.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Path to the settings file.
    config_path: PathBuf,
    /// Discord bot token.
    discord_token: Option<String>,
    /// GitHub token; unauthenticated if absent.
    github_token: Option<String>,
    /// GitHub API root; `https://api.github.com` if absent.
    github_api_url: Option<String>,
    /// Discord API root.
    discord_api_url: String,
    /// Whether to log notifications instead of posting them.
    dry_run: bool,
    /// Quiet period after a settings file change before it is reloaded.
    reload_debounce: Duration,
}

impl RunnerConfig {
    /// Creates a new configuration.
    pub fn new(config_path: PathBuf, discord_token: Option<String>, dry_run: bool) -> Self {
        Self {
            config_path,
            discord_token,
            github_token: None,
            github_api_url: None,
            discord_api_url: DEFAULT_API_BASE.to_string(),
            dry_run,
            reload_debounce: Duration::from_millis(500),
        }
    }

    /// Sets a GitHub token.
    pub fn with_github_token(mut self, github_token: String) -> Self {
        self.github_token = Some(github_token);
        self
    }

    /// Sets a custom GitHub API root.
    pub fn with_github_api_url(mut self, github_api_url: String) -> Self {
        self.github_api_url = Some(github_api_url);
        self
    }

    /// Sets a custom Discord API root.
    pub fn with_discord_api_url(mut self, discord_api_url: String) -> Self {
        self.discord_api_url = discord_api_url;
        self
    }

    /// Sets the settings reload debounce.
    pub fn with_reload_debounce(mut self, reload_debounce: Duration) -> Self {
        self.reload_debounce = reload_debounce;
        self
    }

    /// Returns the settings file path.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the Discord bot token.
    pub fn discord_token(&self) -> Option<&str> {
        self.discord_token.as_deref()
    }

    /// Returns the GitHub token.
    pub fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    /// Returns the GitHub API root, if overridden.
    pub fn github_api_url(&self) -> Option<&str> {
        self.github_api_url.as_deref()
    }

    /// Returns the Discord API root.
    pub fn discord_api_url(&self) -> &str {
        &self.discord_api_url
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the settings reload debounce.
    pub fn reload_debounce(&self) -> Duration {
        self.reload_debounce
    }
}
