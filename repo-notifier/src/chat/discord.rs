//! Discord REST implementation of [`ChatClient`].

use super::{ChannelId, ChatClient, ChatError, MessageRef};
use crate::render::Notification;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Discord API root used unless overridden.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10/";

/// Discord JSON error code for a deleted or unknown channel.
const UNKNOWN_CHANNEL: u64 = 10003;

#[derive(Serialize)]
struct MessagePayload<'a> {
    embeds: [&'a Notification; 1],
}

#[derive(Deserialize)]
struct SentMessage {
    id: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    code: Option<u64>,
    message: Option<String>,
}

/// Bot-token authenticated Discord client.
pub struct DiscordClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl DiscordClient {
    /// Creates a client against the public Discord API.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError`] if the HTTP client can't be built.
    pub fn new(token: String, timeout: Duration) -> Result<Self, ChatError> {
        Self::with_base_url(token, DEFAULT_API_BASE, timeout)
    }

    /// Creates a client against a custom API root.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError`] if `base_url` is invalid or the HTTP client
    /// can't be built.
    pub fn with_base_url(
        token: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ChatError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    fn messages_url(&self, channel: ChannelId) -> Result<Url, ChatError> {
        Ok(self.base_url.join(&format!("channels/{channel}/messages"))?)
    }

    fn message_url(&self, channel: ChannelId, message: &MessageRef) -> Result<Url, ChatError> {
        Ok(self
            .base_url
            .join(&format!("channels/{channel}/messages/{message}"))?)
    }

    fn authorization(&self) -> String {
        format!("Bot {}", self.token)
    }
}

/// Converts a non-success response into a [`ChatError`].
///
/// A 404 for anything but an unknown channel means the message is gone.
async fn error_from_response(
    response: Response,
    channel: ChannelId,
    message: Option<&MessageRef>,
) -> ChatError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body: Option<ApiErrorBody> = serde_json::from_str(&text).ok();
    let code = body.as_ref().and_then(|b| b.code);

    if status == StatusCode::NOT_FOUND && code != Some(UNKNOWN_CHANNEL) {
        if let Some(message) = message {
            debug!(channel, message = %message, code = ?code, "Discord reports message missing");
            return ChatError::NotFound {
                channel,
                message: message.to_string(),
            };
        }
    }

    let detail = body.and_then(|b| b.message).unwrap_or(text);
    ChatError::ApiError {
        status: status.as_u16(),
        message: match code {
            Some(code) => format!("{detail} (code {code})"),
            None => detail,
        },
    }
}

#[async_trait]
impl ChatClient for DiscordClient {
    async fn send_message(
        &self,
        channel: ChannelId,
        notification: &Notification,
    ) -> Result<MessageRef, ChatError> {
        let response = self
            .http
            .post(self.messages_url(channel)?)
            .header(AUTHORIZATION, self.authorization())
            .json(&MessagePayload {
                embeds: [notification],
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response, channel, None).await);
        }

        let sent: SentMessage = response.json().await?;
        debug!(channel, message = %sent.id, "Message sent");
        Ok(MessageRef::new(sent.id))
    }

    async fn edit_message(
        &self,
        channel: ChannelId,
        message: &MessageRef,
        notification: &Notification,
    ) -> Result<(), ChatError> {
        let response = self
            .http
            .patch(self.message_url(channel, message)?)
            .header(AUTHORIZATION, self.authorization())
            .json(&MessagePayload {
                embeds: [notification],
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response, channel, Some(message)).await);
        }

        debug!(channel, message = %message, "Message edited");
        Ok(())
    }
}
