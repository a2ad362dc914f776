//! Settings loading and hot reload.
//!
//! Settings live in a TOML file next to the binary. They are loaded once at
//! startup and then republished through a [`tokio::sync::watch`] channel
//! whenever the file changes, so the reconciliation loop never observes a
//! half-applied edit.

mod error;
mod settings;
mod watcher;

pub use error::ConfigError;
pub use settings::{parse_color, DiscordSettings, EmbedSettings, GitHubSettings, Settings};
pub use watcher::{SettingsWatchGuard, SettingsWatcher};

use std::path::Path;
use tracing::{info, warn};

/// Loads settings from `path`.
///
/// A missing file yields [`Settings::default`], which has no account
/// configured and therefore polls nothing until the file is created.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but can't be read, parsed or
/// validated.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        warn!(path = %path.display(), "Settings file not found, using defaults");
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let settings = Settings::from_toml(&contents, path)?;
    info!(
        path = %path.display(),
        account = settings.account().unwrap_or(""),
        channel = settings.discord.channel_id,
        "Loaded settings"
    );
    Ok(settings)
}
