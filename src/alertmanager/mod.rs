//! Alertmanager webhook payloads.
//!
//! Mirrors the JSON Alertmanager posts to webhook receivers (payload
//! version 4).

mod types;

pub use types::{Alert, AlertStatus, LabelSet, WebhookMessage, SUPPORTED_VERSION};
