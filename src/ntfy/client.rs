use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{NtfyAuthConfig, NtfyConfig};
use crate::notification::Notification;

use super::{NotificationSender, NtfyError};

/// JSON body of an ntfy publish request
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PublishPayload<'a> {
    pub topic: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub title: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub message: &'a str,
    #[serde(skip_serializing_if = "no_tags")]
    pub tags: &'a [String],
    pub priority: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click: Option<&'a str>,
}

fn no_tags(tags: &&[String]) -> bool {
    tags.is_empty()
}

impl<'a> From<&'a Notification> for PublishPayload<'a> {
    fn from(notification: &'a Notification) -> Self {
        Self {
            topic: &notification.topic,
            title: &notification.title,
            message: &notification.message,
            tags: &notification.tags,
            priority: notification.priority.as_level(),
            click: notification.click.as_deref(),
        }
    }
}

/// Client for the ntfy JSON publish API
pub struct NtfyClient {
    base_url: String,
    auth: Option<NtfyAuthConfig>,
    client: reqwest::Client,
}

impl NtfyClient {
    /// Create a client from configuration
    pub fn new(config: &NtfyConfig) -> Result<Self, NtfyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth: config.auth.clone(),
            client,
        })
    }

    /// Endpoint that accepts JSON publish requests
    pub fn publish_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(NtfyAuthConfig {
                token: Some(token), ..
            }) => request.bearer_auth(token),
            Some(NtfyAuthConfig {
                username: Some(username),
                password,
                ..
            }) => request.basic_auth(username, password.as_ref()),
            _ => request,
        }
    }
}

#[async_trait]
impl NotificationSender for NtfyClient {
    async fn send(&self, notification: &Notification) -> Result<(), NtfyError> {
        let payload = PublishPayload::from(notification);

        debug!(topic = %notification.topic, title = %notification.title, "Publishing notification");

        let request = self.authorize(self.client.post(&self.base_url).json(&payload));
        let response = request.send().await?;

        if response.status().is_success() {
            debug!(topic = %notification.topic, "Notification published");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            warn!(
                topic = %notification.topic,
                status = %status,
                body = %body,
                "ntfy publish request failed"
            );

            Err(NtfyError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
