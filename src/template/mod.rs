//! Notification template system.
//!
//! This module provides:
//! - A fixed library of string functions callable from templates
//! - Compilation of template sources once, at configuration load
//! - Label tag rendering with a deterministic default when no template is set
//! - Title and description rendering for outgoing notifications
//!
//! Templates use Handlebars syntax. The data context of a labels template is
//! the alert's label set, iterated in key order; title and description
//! templates see the whole alert.
//!
//! # Example
//!
//! ```ignore
//! let template = CompiledTemplate::compile("labels", SHOW_LABELS_TEMPLATE)?;
//!
//! let labels: LabelSet = [
//!     ("severity", "critical"),
//!     ("service", "api"),
//!     ("internal", "debug"),
//!     ("show_labels", "severity,service"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let tags = render_label_tags(&labels, Some(&template))?;
//! assert_eq!(tags, vec!["severity=CRITICAL", "service=API"]);
//! ```

pub mod functions;
mod labels;
mod message;
mod types;

pub use functions::register_functions;
pub use labels::{default_tags, render_label_tags, segment_tags, SHOW_LABELS_TEMPLATE};
pub use message::{NotificationTemplates, DEFAULT_DESCRIPTION_TEMPLATE, DEFAULT_TITLE_TEMPLATE};
pub use types::{CompiledTemplate, TemplateError, TemplateResult};
