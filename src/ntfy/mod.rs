//! Delivery of notifications to an ntfy server.
//!
//! - [`NotificationSender`] is the seam the dispatcher publishes through
//! - [`NtfyClient`] implements it against the ntfy JSON publish API

mod client;
mod error;

use async_trait::async_trait;

use crate::notification::Notification;

pub use client::{NtfyClient, PublishPayload};
pub use error::NtfyError;

/// Publishes notifications to a delivery service
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Publish one notification
    async fn send(&self, notification: &Notification) -> Result<(), NtfyError>;
}
