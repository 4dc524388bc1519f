use serde::{Deserialize, Serialize};

/// Push notification ready to be published to ntfy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Topic the notification is published to
    pub topic: String,
    /// Notification title
    pub title: String,
    /// Notification body
    pub message: String,
    /// Short tags shown alongside the notification
    pub tags: Vec<String>,
    /// Delivery priority
    pub priority: Priority,
    /// URL opened when the notification is clicked (optional)
    pub click: Option<String>,
}

/// ntfy priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// No vibration or sound, folded away
    Min,
    /// No vibration or sound
    Low,
    /// Normal priority (default)
    #[default]
    #[serde(rename = "default", alias = "normal")]
    Normal,
    /// Long vibration burst
    High,
    /// Very long vibration bursts, pop-over notification
    #[serde(alias = "max")]
    Urgent,
}

impl Priority {
    /// Numeric level as understood by the ntfy publish API (1-5)
    pub fn as_level(&self) -> u8 {
        match self {
            Priority::Min => 1,
            Priority::Low => 2,
            Priority::Normal => 3,
            Priority::High => 4,
            Priority::Urgent => 5,
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_level().cmp(&other.as_level())
    }
}

/// Builder for creating notifications
#[derive(Debug, Clone)]
pub struct NotificationBuilder {
    topic: String,
    title: String,
    message: String,
    tags: Vec<String>,
    priority: Priority,
    click: Option<String>,
}

impl NotificationBuilder {
    /// Create a new notification builder
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            title: String::new(),
            message: String::new(),
            tags: Vec::new(),
            priority: Priority::default(),
            click: None,
        }
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the message body
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the tags
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the priority
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the click URL; empty URLs are ignored
    pub fn click(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if !url.is_empty() {
            self.click = Some(url);
        }
        self
    }

    /// Build the notification
    pub fn build(self) -> Notification {
        Notification {
            topic: self.topic,
            title: self.title,
            message: self.message,
            tags: self.tags,
            priority: self.priority,
            click: self.click,
        }
    }
}

impl Notification {
    /// Create a builder publishing to `topic`
    pub fn builder(topic: impl Into<String>) -> NotificationBuilder {
        NotificationBuilder::new(topic)
    }
}
