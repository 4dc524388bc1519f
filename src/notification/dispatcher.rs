use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::alertmanager::{Alert, WebhookMessage};
use crate::config::NtfyConfig;
use crate::ntfy::NotificationSender;
use crate::template::NotificationTemplates;

use super::{Notification, NotificationBuilder, Priority};

/// Maximum number of concurrent publish requests per webhook
const MAX_CONCURRENT_SENDS: usize = 8;

/// Title used when neither the template nor the labels yield one
const FALLBACK_TITLE: &str = "Alert";

/// Outcome of dispatching one webhook message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    /// Alerts contained in the message
    pub received: usize,
    /// Notifications accepted by ntfy
    pub sent: usize,
    /// Notifications that could not be delivered
    pub failed: usize,
    /// Notifications sent without tags because the labels template failed
    pub untagged: usize,
}

impl DispatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Statistics for the alert dispatcher
#[derive(Debug, Default)]
pub struct DispatcherStats {
    /// Webhook messages handled
    pub webhooks: AtomicU64,
    /// Alerts received across all webhooks
    pub alerts_received: AtomicU64,
    /// Notifications accepted by ntfy
    pub notifications_sent: AtomicU64,
    /// Notifications that failed to deliver
    pub notifications_failed: AtomicU64,
    /// Label template evaluation failures
    pub tag_render_failures: AtomicU64,
}

impl DispatcherStats {
    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            webhooks: self.webhooks.load(Ordering::Relaxed),
            alerts_received: self.alerts_received.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            notifications_failed: self.notifications_failed.load(Ordering::Relaxed),
            tag_render_failures: self.tag_render_failures.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub webhooks: u64,
    pub alerts_received: u64,
    pub notifications_sent: u64,
    pub notifications_failed: u64,
    pub tag_render_failures: u64,
}

/// Turns alerts into notifications and hands them to a sender
pub struct AlertDispatcher {
    templates: NotificationTemplates,
    sender: Arc<dyn NotificationSender>,
    topic: String,
    priority: Priority,
    stats: DispatcherStats,
}

impl AlertDispatcher {
    pub fn new(
        templates: NotificationTemplates,
        sender: Arc<dyn NotificationSender>,
        ntfy: &NtfyConfig,
    ) -> Self {
        Self {
            templates,
            sender,
            topic: ntfy.topic.clone(),
            priority: ntfy.priority,
            stats: DispatcherStats::default(),
        }
    }

    /// Topic notifications are published to
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Get dispatcher statistics
    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Build the notification for a single alert.
    ///
    /// Template failures never drop the alert: the title and message fall
    /// back to label-derived text and a failing labels template yields no
    /// tags. The returned flag reports whether tags were dropped.
    pub fn build_notification(&self, alert: &Alert) -> (Notification, bool) {
        let fallback_title = alert.name().unwrap_or(FALLBACK_TITLE);

        let title = match self.templates.render_title(alert) {
            Ok(title) if !title.is_empty() => title,
            Ok(_) => fallback_title.to_string(),
            Err(e) => {
                tracing::warn!(
                    fingerprint = %alert.fingerprint,
                    error = %e,
                    "Failed to render title"
                );
                fallback_title.to_string()
            }
        };

        let message = match self.templates.render_description(alert) {
            Ok(message) if !message.is_empty() => message,
            Ok(_) => title.clone(),
            Err(e) => {
                tracing::warn!(
                    fingerprint = %alert.fingerprint,
                    error = %e,
                    "Failed to render description"
                );
                title.clone()
            }
        };

        let (tags, untagged) = match self.templates.render_tags(alert) {
            Ok(tags) => (tags, false),
            Err(e) => {
                self.stats.tag_render_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    alert = %fallback_title,
                    fingerprint = %alert.fingerprint,
                    error = %e,
                    "Failed to render label tags, sending without tags"
                );
                (Vec::new(), true)
            }
        };

        let notification = NotificationBuilder::new(&self.topic)
            .title(title)
            .message(message)
            .tags(tags)
            .priority(self.priority)
            .click(alert.generator_url.as_str())
            .build();

        (notification, untagged)
    }

    /// Publish one notification per alert in the message
    #[tracing::instrument(
        name = "dispatcher.dispatch",
        skip(self, message),
        fields(
            receiver = %message.receiver,
            status = ?message.status,
            alert_count = message.alerts.len()
        )
    )]
    pub async fn dispatch(&self, message: &WebhookMessage) -> DispatchSummary {
        let mut summary = DispatchSummary {
            received: message.alerts.len(),
            ..Default::default()
        };

        let notifications: Vec<Notification> = message
            .alerts
            .iter()
            .map(|alert| {
                let (notification, untagged) = self.build_notification(alert);
                if untagged {
                    summary.untagged += 1;
                }
                notification
            })
            .collect();

        let results: Vec<bool> = stream::iter(notifications)
            .map(|notification| async move {
                match self.sender.send(&notification).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::error!(
                            topic = %notification.topic,
                            title = %notification.title,
                            error = %e,
                            "Failed to deliver notification"
                        );
                        false
                    }
                }
            })
            .buffer_unordered(MAX_CONCURRENT_SENDS)
            .collect()
            .await;

        summary.sent = results.iter().filter(|delivered| **delivered).count();
        summary.failed = results.len() - summary.sent;

        // Update stats
        self.stats.webhooks.fetch_add(1, Ordering::Relaxed);
        self.stats
            .alerts_received
            .fetch_add(summary.received as u64, Ordering::Relaxed);
        self.stats
            .notifications_sent
            .fetch_add(summary.sent as u64, Ordering::Relaxed);
        self.stats
            .notifications_failed
            .fetch_add(summary.failed as u64, Ordering::Relaxed);

        tracing::debug!(
            received = summary.received,
            sent = summary.sent,
            failed = summary.failed,
            untagged = summary.untagged,
            "Dispatched webhook"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alertmanager::AlertStatus;
    use crate::config::TemplatesConfig;
    use crate::ntfy::NtfyError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records notifications; fails those whose title is listed
    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<Notification>>,
        fail_titles: Vec<String>,
    }

    #[async_trait]
    impl NotificationSender for RecordingSender {
        async fn send(&self, notification: &Notification) -> Result<(), NtfyError> {
            if self.fail_titles.contains(&notification.title) {
                return Err(NtfyError::Rejected {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn ntfy_config() -> NtfyConfig {
        NtfyConfig {
            base_url: "https://ntfy.sh".to_string(),
            topic: "alerts".to_string(),
            priority: Priority::High,
            timeout_seconds: 10,
            auth: None,
        }
    }

    fn dispatcher(templates: TemplatesConfig, sender: Arc<RecordingSender>) -> AlertDispatcher {
        AlertDispatcher::new(
            NotificationTemplates::compile(&templates).unwrap(),
            sender,
            &ntfy_config(),
        )
    }

    fn alert(name: &str, labels: &[(&str, &str)]) -> Alert {
        let mut labels: crate::alertmanager::LabelSet = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        labels.insert("alertname".to_string(), name.to_string());
        Alert {
            status: AlertStatus::Firing,
            labels,
            annotations: Default::default(),
            starts_at: None,
            ends_at: None,
            generator_url: format!("http://prometheus/{}", name),
            fingerprint: format!("fp-{}", name),
        }
    }

    fn message(alerts: Vec<Alert>) -> WebhookMessage {
        WebhookMessage {
            version: "4".to_string(),
            group_key: String::new(),
            truncated_alerts: 0,
            status: AlertStatus::Firing,
            receiver: "ntfy".to_string(),
            group_labels: Default::default(),
            common_labels: Default::default(),
            common_annotations: Default::default(),
            external_url: String::new(),
            alerts,
        }
    }

    #[test]
    fn test_build_notification_defaults() {
        let sender = Arc::new(RecordingSender::default());
        let dispatcher = dispatcher(TemplatesConfig::default(), sender);

        let (notification, untagged) =
            dispatcher.build_notification(&alert("Down", &[("severity", "critical")]));

        assert!(!untagged);
        assert_eq!(notification.topic, "alerts");
        assert_eq!(notification.title, "Down");
        assert_eq!(notification.message, "Down");
        assert_eq!(notification.tags, vec!["alertname = Down", "severity = critical"]);
        assert_eq!(notification.priority, Priority::High);
        assert_eq!(notification.click.as_deref(), Some("http://prometheus/Down"));
    }

    #[test]
    fn test_tag_failure_sends_without_tags() {
        let sender = Arc::new(RecordingSender::default());
        let templates = TemplatesConfig {
            labels: Some("{{#each this}}{{frobnicate @key}}{{/each}}".to_string()),
            ..Default::default()
        };
        let dispatcher = dispatcher(templates, sender);

        let (notification, untagged) = dispatcher.build_notification(&alert("Down", &[]));

        assert!(untagged);
        assert!(notification.tags.is_empty());
        assert_eq!(notification.title, "Down");
        assert_eq!(dispatcher.stats().tag_render_failures, 1);
    }

    #[test]
    fn test_title_failure_falls_back_to_alertname() {
        let sender = Arc::new(RecordingSender::default());
        let templates = TemplatesConfig {
            title: Some("{{upper annotations}}".to_string()),
            description: Some("{{missing_helper labels}}".to_string()),
            ..Default::default()
        };
        let dispatcher = dispatcher(templates, sender);

        let (notification, _) = dispatcher.build_notification(&alert("Down", &[]));
        assert_eq!(notification.title, "Down");
        assert_eq!(notification.message, "Down");
    }

    #[test]
    fn test_missing_alertname_uses_generic_title() {
        let sender = Arc::new(RecordingSender::default());
        let dispatcher = dispatcher(TemplatesConfig::default(), sender);

        let mut nameless = alert("", &[]);
        nameless.labels.remove("alertname");
        let (notification, _) = dispatcher.build_notification(&nameless);
        assert_eq!(notification.title, FALLBACK_TITLE);
    }

    #[tokio::test]
    async fn test_dispatch_sends_every_alert() {
        let sender = Arc::new(RecordingSender::default());
        let dispatcher = dispatcher(TemplatesConfig::default(), sender.clone());

        let summary = dispatcher
            .dispatch(&message(vec![alert("A", &[]), alert("B", &[]), alert("C", &[])]))
            .await;

        assert_eq!(
            summary,
            DispatchSummary {
                received: 3,
                sent: 3,
                failed: 0,
                untagged: 0
            }
        );
        assert!(summary.is_success());

        let mut titles: Vec<String> = sender
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect();
        titles.sort();
        assert_eq!(titles, vec!["A", "B", "C"]);

        let stats = dispatcher.stats();
        assert_eq!(stats.webhooks, 1);
        assert_eq!(stats.alerts_received, 3);
        assert_eq!(stats.notifications_sent, 3);
    }

    #[tokio::test]
    async fn test_dispatch_counts_failures() {
        let sender = Arc::new(RecordingSender {
            fail_titles: vec!["B".to_string()],
            ..Default::default()
        });
        let dispatcher = dispatcher(TemplatesConfig::default(), sender.clone());

        let summary = dispatcher
            .dispatch(&message(vec![alert("A", &[]), alert("B", &[])]))
            .await;

        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_success());
        assert_eq!(dispatcher.stats().notifications_failed, 1);
    }

    #[test]
    fn test_dispatch_future_is_send() {
        fn assert_send<T: Send>(_: &T) {}

        let sender = Arc::new(RecordingSender::default());
        let dispatcher = dispatcher(TemplatesConfig::default(), sender);
        let message = message(vec![alert("A", &[])]);

        // Handlers spawn this future on the multi-threaded runtime
        assert_send(&dispatcher.dispatch(&message));
    }

    #[tokio::test]
    async fn test_dispatch_empty_message() {
        let sender = Arc::new(RecordingSender::default());
        let dispatcher = dispatcher(TemplatesConfig::default(), sender.clone());

        let summary = dispatcher.dispatch(&message(vec![])).await;
        assert_eq!(summary, DispatchSummary::default());
        assert!(sender.sent.lock().unwrap().is_empty());
    }
}
