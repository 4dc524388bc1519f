//! Label tag rendering.
//!
//! Turns an alert's label set into the ordered list of tags attached to the
//! outgoing notification. Without a template every label becomes one
//! `"<key> = <value>"` tag. With a template, the template is evaluated once
//! against the whole label set and its output is cut into tags on commas and
//! whitespace.

use crate::alertmanager::LabelSet;

use super::types::{CompiledTemplate, TemplateResult};

/// Label template honouring the reserved `show_labels` label.
///
/// With `show_labels` set, only the listed keys are rendered, in the listed
/// order, as `key=VALUE`. Otherwise every other label is rendered as
/// `key=value`.
pub const SHOW_LABELS_TEMPLATE: &str = r#"
{{~#if show_labels~}}
  {{~#each (split show_labels ",")~}}
    {{~#unless @first}}, {{/unless~}}
    {{~#if (and (ne (trim this) "show_labels") (index (trim this)))~}}
      {{trim this}}={{upper (index (trim this))}}
    {{~/if~}}
  {{~/each~}}
{{~else~}}
  {{~#each this~}}
    {{~#if (ne @key "show_labels")}}{{@key}}={{this}} {{/if~}}
  {{~/each~}}
{{~/if~}}
"#;

/// Render the tags for one label set.
///
/// Never mutates its inputs and never logs; evaluation failures are returned
/// to the caller, which decides whether to send the notification untagged.
pub fn render_label_tags(
    labels: &LabelSet,
    template: Option<&CompiledTemplate>,
) -> TemplateResult<Vec<String>> {
    match template {
        None => Ok(default_tags(labels)),
        Some(template) => {
            let rendered = template.render(labels)?;
            Ok(segment_tags(&rendered))
        }
    }
}

/// One `"<key> = <value>"` tag per label, in key order
pub fn default_tags(labels: &LabelSet) -> Vec<String> {
    labels
        .iter()
        .map(|(key, value)| format!("{} = {}", key, value))
        .collect()
}

/// Cut evaluated template output into tags.
///
/// Commas and whitespace runs both separate tags; empty pieces are dropped.
pub fn segment_tags(rendered: &str) -> Vec<String> {
    rendered
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
