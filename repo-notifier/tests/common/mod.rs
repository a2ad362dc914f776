#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use repo_notifier::{
    ChannelId, ChatClient, ChatError, MessageRef, Notification, Reconciler, RepositoryId,
    RepositoryObservation, RepositorySource, Settings, SourceError,
};
use tokio::sync::watch;

pub const CHANNEL: ChannelId = 4242;

pub fn cutoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn repo(id: u64, name: &str, created_offset_secs: i64) -> RepositoryObservation {
    let created_at = cutoff() + Duration::seconds(created_offset_secs);
    RepositoryObservation {
        id: RepositoryId(id),
        name: name.to_string(),
        description: Some(format!("{name} description")),
        html_url: format!("https://github.com/octocat/{name}"),
        star_count: 5,
        fork_count: 0,
        watcher_count: 5,
        created_at,
        updated_at: created_at,
        language: Some("Rust".to_string()),
        license: None,
        visibility: Some("public".to_string()),
    }
}

pub fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.github.username = "octocat".to_string();
    settings.discord.channel_id = CHANNEL;
    settings
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send { url: String, title: String },
    Edit { message: String, url: String },
}

#[derive(Default)]
pub struct ScriptedChat {
    calls: Mutex<Vec<Call>>,
    sent: Mutex<u64>,
    deleted: Mutex<HashSet<String>>,
    unreachable: Mutex<HashSet<String>>,
}

impl ScriptedChat {
    pub fn delete(&self, message: &MessageRef) {
        self.deleted.lock().unwrap().insert(message.to_string());
    }

    pub fn make_unreachable(&self, url: &str) {
        self.unreachable.lock().unwrap().insert(url.to_string());
    }

    pub fn make_reachable(&self, url: &str) {
        self.unreachable.lock().unwrap().remove(url);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn fail_if_unreachable(&self, notification: &Notification) -> Result<(), ChatError> {
        if self.unreachable.lock().unwrap().contains(&notification.url) {
            return Err(ChatError::ApiError {
                status: 503,
                message: "unreachable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChatClient for ScriptedChat {
    async fn send_message(
        &self,
        _channel: ChannelId,
        notification: &Notification,
    ) -> Result<MessageRef, ChatError> {
        self.calls.lock().unwrap().push(Call::Send {
            url: notification.url.clone(),
            title: notification.title.clone(),
        });
        self.fail_if_unreachable(notification)?;

        let mut sent = self.sent.lock().unwrap();
        *sent += 1;
        Ok(MessageRef::new(format!("m{sent}")))
    }

    async fn edit_message(
        &self,
        channel: ChannelId,
        message: &MessageRef,
        notification: &Notification,
    ) -> Result<(), ChatError> {
        self.calls.lock().unwrap().push(Call::Edit {
            message: message.to_string(),
            url: notification.url.clone(),
        });
        self.fail_if_unreachable(notification)?;

        if self.deleted.lock().unwrap().contains(message.as_str()) {
            return Err(ChatError::NotFound {
                channel,
                message: message.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct ScriptedSource {
    repositories: Mutex<Vec<RepositoryObservation>>,
    failing: Mutex<bool>,
}

impl ScriptedSource {
    pub fn set(&self, repositories: Vec<RepositoryObservation>) {
        *self.repositories.lock().unwrap() = repositories;
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl RepositorySource for ScriptedSource {
    async fn fetch_all(&self, account: &str) -> Result<Vec<RepositoryObservation>, SourceError> {
        if *self.failing.lock().unwrap() {
            return Err(SourceError::Timeout {
                account: account.to_string(),
                timeout: std::time::Duration::from_secs(30),
            });
        }
        Ok(self.repositories.lock().unwrap().clone())
    }
}

pub struct Harness {
    pub source: Arc<ScriptedSource>,
    pub chat: Arc<ScriptedChat>,
    pub reconciler: Reconciler,
    pub settings: watch::Sender<Settings>,
}

impl Harness {
    pub fn new(initial: Vec<RepositoryObservation>) -> Self {
        let source = Arc::new(ScriptedSource::default());
        source.set(initial);
        let chat = Arc::new(ScriptedChat::default());
        let (sender, receiver) = watch::channel(settings());
        let reconciler =
            Reconciler::new(source.clone(), chat.clone(), receiver).with_startup_cutoff(cutoff());

        Self {
            source,
            chat,
            reconciler,
            settings: sender,
        }
    }

    pub fn notification_ref(&self, id: u64) -> Option<MessageRef> {
        self.reconciler
            .state()
            .get(RepositoryId(id))
            .and_then(|entry| entry.notification_ref.clone())
    }
}
