//! Compiled template handle and template error types.

use std::sync::Arc;

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

use super::functions::register_functions;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Malformed template syntax, detected when the configuration is loaded
    #[error("Template compile error: {0}")]
    Compile(#[from] handlebars::TemplateError),

    /// Failure while evaluating an already compiled template
    #[error("Template evaluation error: {0}")]
    Evaluation(#[from] handlebars::RenderError),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// A template program compiled once and shared by every render call.
///
/// The registry is never mutated after [`CompiledTemplate::compile`] returns,
/// so clones can be handed to concurrently running requests.
#[derive(Clone)]
pub struct CompiledTemplate {
    name: String,
    registry: Arc<Handlebars<'static>>,
}

impl CompiledTemplate {
    /// Compile `source` with the template function library registered
    pub fn compile(name: impl Into<String>, source: &str) -> TemplateResult<Self> {
        let name = name.into();
        let mut registry = Handlebars::new();

        // Output is notification text, not HTML
        registry.register_escape_fn(handlebars::no_escape);
        // Optional keys such as `show_labels` must be testable for presence
        registry.set_strict_mode(false);
        register_functions(&mut registry);

        registry.register_template_string(&name, source)?;

        Ok(Self {
            name,
            registry: Arc::new(registry),
        })
    }

    /// Template name, used in error messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the template against `data` as the root context
    pub fn render<T: Serialize>(&self, data: &T) -> TemplateResult<String> {
        Ok(self.registry.render(&self.name, data)?)
    }
}

impl std::fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compile_and_render() {
        let template = CompiledTemplate::compile("greeting", "Hello {{name}}").unwrap();
        assert_eq!(template.name(), "greeting");

        let rendered = template.render(&json!({"name": "World"})).unwrap();
        assert_eq!(rendered, "Hello World");
    }

    #[test]
    fn test_compile_error_on_unclosed_block() {
        let result = CompiledTemplate::compile("broken", "{{#if ready}}never closed");
        assert!(matches!(result, Err(TemplateError::Compile(_))));
    }

    #[test]
    fn test_output_is_not_html_escaped() {
        let template = CompiledTemplate::compile("raw", "{{value}}").unwrap();
        let rendered = template.render(&json!({"value": "a<b & c>\"d\""})).unwrap();
        assert_eq!(rendered, "a<b & c>\"d\"");
    }

    #[test]
    fn test_missing_key_renders_empty() {
        let template = CompiledTemplate::compile("optional", "[{{missing}}]").unwrap();
        assert_eq!(template.render(&json!({})).unwrap(), "[]");
    }

    #[test]
    fn test_clone_shares_registry() {
        let template = CompiledTemplate::compile("shared", "{{x}}").unwrap();
        let clone = template.clone();
        assert!(Arc::ptr_eq(&template.registry, &clone.registry));
    }
}
