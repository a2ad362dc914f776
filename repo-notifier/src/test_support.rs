//! Fakes shared by unit tests.

use crate::chat::{ChannelId, ChatClient, ChatError, MessageRef};
use crate::config::Settings;
use crate::render::Notification;
use crate::source::{RepositoryId, RepositoryObservation, RepositorySource, SourceError};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

pub(crate) fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap()
}

pub(crate) fn observation(id: u64, name: &str) -> RepositoryObservation {
    RepositoryObservation {
        id: RepositoryId(id),
        name: name.to_string(),
        description: Some(format!("{name} description")),
        html_url: format!("https://github.com/octocat/{name}"),
        star_count: 5,
        fork_count: 1,
        watcher_count: 5,
        created_at: created_at(),
        updated_at: created_at(),
        language: Some("Rust".to_string()),
        license: Some("MIT License".to_string()),
        visibility: Some("public".to_string()),
    }
}

pub(crate) fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.github.username = "octocat".to_string();
    settings.discord.channel_id = 55;
    settings
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ChatCall {
    Send {
        channel: ChannelId,
        url: String,
        title: String,
    },
    Edit {
        channel: ChannelId,
        message: MessageRef,
        url: String,
        title: String,
    },
}

/// Records calls; sends return `msg-1`, `msg-2`, ...
#[derive(Default)]
pub(crate) struct FakeChat {
    calls: Mutex<Vec<ChatCall>>,
    sent: Mutex<u64>,
    missing: Mutex<HashSet<String>>,
    failing_urls: Mutex<HashSet<String>>,
}

impl FakeChat {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Edits of `message` report the target as deleted.
    pub(crate) fn mark_missing(&self, message: &str) {
        self.missing.lock().unwrap().insert(message.to_string());
    }

    /// Sends and edits for this repository URL fail.
    pub(crate) fn fail_for(&self, url: &str) {
        self.failing_urls.lock().unwrap().insert(url.to_string());
    }

    pub(crate) fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn sends(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ChatCall::Send { .. }))
            .count()
    }

    pub(crate) fn edits(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ChatCall::Edit { .. }))
            .count()
    }

    fn check_failure(&self, notification: &Notification) -> Result<(), ChatError> {
        if self.failing_urls.lock().unwrap().contains(&notification.url) {
            return Err(ChatError::ApiError {
                status: 503,
                message: "channel unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChatClient for FakeChat {
    async fn send_message(
        &self,
        channel: ChannelId,
        notification: &Notification,
    ) -> Result<MessageRef, ChatError> {
        self.calls.lock().unwrap().push(ChatCall::Send {
            channel,
            url: notification.url.clone(),
            title: notification.title.clone(),
        });
        self.check_failure(notification)?;

        let mut sent = self.sent.lock().unwrap();
        *sent += 1;
        Ok(MessageRef::new(format!("msg-{sent}")))
    }

    async fn edit_message(
        &self,
        channel: ChannelId,
        message: &MessageRef,
        notification: &Notification,
    ) -> Result<(), ChatError> {
        self.calls.lock().unwrap().push(ChatCall::Edit {
            channel,
            message: message.clone(),
            url: notification.url.clone(),
            title: notification.title.clone(),
        });
        self.check_failure(notification)?;

        if self.missing.lock().unwrap().contains(message.as_str()) {
            return Err(ChatError::NotFound {
                channel,
                message: message.to_string(),
            });
        }
        Ok(())
    }
}

/// Serves a settable list of repositories, or fails.
#[derive(Default)]
pub(crate) struct FakeSource {
    repositories: Mutex<Vec<RepositoryObservation>>,
    failing: Mutex<bool>,
    fetched: Mutex<Vec<String>>,
}

impl FakeSource {
    pub(crate) fn new(repositories: Vec<RepositoryObservation>) -> Self {
        Self {
            repositories: Mutex::new(repositories),
            ..Self::default()
        }
    }

    pub(crate) fn set(&self, repositories: Vec<RepositoryObservation>) {
        *self.repositories.lock().unwrap() = repositories;
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// Accounts fetched so far, in order.
    pub(crate) fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositorySource for FakeSource {
    async fn fetch_all(&self, account: &str) -> Result<Vec<RepositoryObservation>, SourceError> {
        self.fetched.lock().unwrap().push(account.to_string());
        if *self.failing.lock().unwrap() {
            return Err(SourceError::Timeout {
                account: account.to_string(),
                timeout: Duration::from_secs(1),
            });
        }
        Ok(self.repositories.lock().unwrap().clone())
    }
}
