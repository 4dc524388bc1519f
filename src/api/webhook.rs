//! Alertmanager webhook receiver.

use axum::{extract::State, Json};

use crate::alertmanager::WebhookMessage;
use crate::error::{AppError, Result};
use crate::notification::DispatchSummary;
use crate::server::AppState;

/// Receive an alert group and publish one notification per alert.
///
/// Responds with 502 when any notification could not be delivered so that
/// Alertmanager retries the group.
#[tracing::instrument(
    name = "api.webhook",
    skip(state, message),
    fields(receiver = %message.receiver, alerts = message.alerts.len())
)]
pub async fn receive_webhook(
    State(state): State<AppState>,
    Json(message): Json<WebhookMessage>,
) -> Result<Json<DispatchSummary>> {
    message.validate()?;

    if message.truncated_alerts > 0 {
        tracing::warn!(
            truncated = message.truncated_alerts,
            "Alertmanager truncated the alert group"
        );
    }

    let summary = state.dispatcher.dispatch(&message).await;

    if !summary.is_success() {
        return Err(AppError::Delivery(format!(
            "{} of {} notifications could not be delivered",
            summary.failed, summary.received
        )));
    }

    tracing::info!(sent = summary.sent, untagged = summary.untagged, "Webhook processed");

    Ok(Json(summary))
}
