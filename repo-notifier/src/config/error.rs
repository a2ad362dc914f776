//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading notifier settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse settings in '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Validation error in settings.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },

    /// Failed to watch the settings file for changes.
    #[error("Failed to watch settings file '{path}': {source}")]
    WatchError {
        path: String,
        #[source]
        source: notify::Error,
    },
}
