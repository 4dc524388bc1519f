//! Title, description, and label templates for outgoing notifications.

use crate::alertmanager::Alert;
use crate::config::TemplatesConfig;

use super::labels::render_label_tags;
use super::types::{CompiledTemplate, TemplateResult};

/// Title used when no title template is configured
pub const DEFAULT_TITLE_TEMPLATE: &str = r#"{{#if (eq status "resolved")}}Resolved: {{/if}}{{#if annotations.summary}}{{annotations.summary}}{{else}}{{labels.alertname}}{{/if}}"#;

/// Body used when no description template is configured
pub const DEFAULT_DESCRIPTION_TEMPLATE: &str = "{{annotations.description}}";

/// Every template a notification is rendered from
#[derive(Debug, Clone)]
pub struct NotificationTemplates {
    title: CompiledTemplate,
    description: CompiledTemplate,
    labels: Option<CompiledTemplate>,
}

impl NotificationTemplates {
    /// Compile the configured templates, falling back to the built-in ones.
    ///
    /// A blank labels template counts as unset.
    pub fn compile(config: &TemplatesConfig) -> TemplateResult<Self> {
        let title = CompiledTemplate::compile(
            "title",
            config.title.as_deref().unwrap_or(DEFAULT_TITLE_TEMPLATE),
        )?;
        let description = CompiledTemplate::compile(
            "description",
            config
                .description
                .as_deref()
                .unwrap_or(DEFAULT_DESCRIPTION_TEMPLATE),
        )?;
        let labels = config
            .labels
            .as_deref()
            .filter(|source| !source.trim().is_empty())
            .map(|source| CompiledTemplate::compile("labels", source))
            .transpose()?;

        Ok(Self {
            title,
            description,
            labels,
        })
    }

    /// Whether tags come from a user template rather than the default format
    pub fn has_labels_template(&self) -> bool {
        self.labels.is_some()
    }

    pub fn render_title(&self, alert: &Alert) -> TemplateResult<String> {
        Ok(self.title.render(alert)?.trim().to_string())
    }

    pub fn render_description(&self, alert: &Alert) -> TemplateResult<String> {
        Ok(self.description.render(alert)?.trim().to_string())
    }

    pub fn render_tags(&self, alert: &Alert) -> TemplateResult<Vec<String>> {
        render_label_tags(&alert.labels, self.labels.as_ref())
    }
}
