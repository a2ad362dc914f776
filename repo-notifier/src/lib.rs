#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod chat;
pub mod config;
pub mod differ;
pub mod dispatch;
pub mod reconcile;
pub mod render;
pub mod runner;
pub mod source;
pub mod state;
pub mod summary;

#[cfg(test)]
mod test_support;

pub use chat::{ChannelId, ChatClient, ChatError, DiscordClient, DryRunChat, MessageRef};
pub use config::{load_settings, ConfigError, Settings, SettingsWatcher};
pub use differ::{classify, processing_order, Classification};
pub use dispatch::{DispatchAction, DispatchError, Dispatched, Dispatcher};
pub use reconcile::{LoopPhase, Reconciler};
pub use render::{Notification, NotificationRenderer, TemplateError};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use source::{GitHubSource, RepositoryId, RepositoryObservation, RepositorySource, SourceError};
pub use state::{TrackedRepoState, TrackedState};
pub use summary::{CycleSummary, RepoOutcome, SkipReason};
