use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::notification::AlertDispatcher;
use crate::ntfy::NotificationSender;
use crate::template::NotificationTemplates;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub dispatcher: Arc<AlertDispatcher>,
    pub start_time: Instant,
}

impl AppState {
    /// Build the state from already compiled templates and a sender.
    ///
    /// Templates are compiled by the caller so that a malformed template stops
    /// startup before any request is served.
    pub fn new(
        settings: Settings,
        templates: NotificationTemplates,
        sender: Arc<dyn NotificationSender>,
    ) -> Self {
        let dispatcher = Arc::new(AlertDispatcher::new(templates, sender, &settings.ntfy));

        Self {
            settings: Arc::new(settings),
            dispatcher,
            start_time: Instant::now(),
        }
    }
}
