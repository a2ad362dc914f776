//! Runner error types.

/// Errors that can occur while setting up the notifier.
///
/// Once running, nothing is fatal; these only occur at startup.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Settings loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Chat client initialization errors.
    #[error(transparent)]
    Chat(#[from] crate::chat::ChatError),

    /// No chat token was given outside dry-run mode.
    #[error("A Discord bot token is required unless running in dry-run mode")]
    MissingDiscordToken,
}
