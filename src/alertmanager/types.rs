use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Key/value labels (or annotations) of an alert.
///
/// Ordered by key so that anything iterating it is deterministic.
pub type LabelSet = BTreeMap<String, String>;

/// Webhook payload version this service understands
pub const SUPPORTED_VERSION: &str = "4";

/// Whether an alert (or alert group) is still active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Firing,
    Resolved,
}

/// A single alert inside a webhook message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(default)]
    pub status: AlertStatus,
    #[serde(default)]
    pub labels: LabelSet,
    #[serde(default)]
    pub annotations: LabelSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    /// Link back to the entity that generated the alert
    #[serde(rename = "generatorURL", default)]
    pub generator_url: String,
    #[serde(default)]
    pub fingerprint: String,
}

impl Alert {
    /// The `alertname` label, if present and non-empty
    pub fn name(&self) -> Option<&str> {
        self.labels
            .get("alertname")
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }
}

/// Alert group notification sent by Alertmanager
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMessage {
    pub version: String,
    #[serde(default)]
    pub group_key: String,
    #[serde(default)]
    pub truncated_alerts: u64,
    #[serde(default)]
    pub status: AlertStatus,
    #[serde(default)]
    pub receiver: String,
    #[serde(default)]
    pub group_labels: LabelSet,
    #[serde(default)]
    pub common_labels: LabelSet,
    #[serde(default)]
    pub common_annotations: LabelSet,
    #[serde(rename = "externalURL", default)]
    pub external_url: String,
    pub alerts: Vec<Alert>,
}

impl WebhookMessage {
    /// Reject payload versions whose layout may differ from this one
    pub fn validate(&self) -> Result<()> {
        if self.version != SUPPORTED_VERSION {
            return Err(AppError::Validation(format!(
                "Unsupported webhook version {:?}, expected {:?}",
                self.version, SUPPORTED_VERSION
            )));
        }
        Ok(())
    }
}
