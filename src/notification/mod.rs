//! Notification types and alert dispatching.

mod dispatcher;
mod types;

pub use dispatcher::{AlertDispatcher, DispatchSummary, DispatcherStats, DispatcherStatsSnapshot};
pub use types::{Notification, NotificationBuilder, Priority};
