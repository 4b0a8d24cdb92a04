//! Card template rendering using Handlebars.
//!
//! Templates use `{{ ... }}` placeholders resolved against the submission
//! context. Missing values render as empty strings and nothing is
//! HTML-escaped here; the description is sanitized separately.

use handlebars::{no_escape, Handlebars};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while compiling or rendering a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template has invalid syntax
    #[error("Invalid template: {0}")]
    Syntax(#[from] Box<handlebars::TemplateError>),

    /// Rendering failed (e.g. a helper error)
    #[error("Failed to render template: {0}")]
    Render(#[from] Box<handlebars::RenderError>),
}

/// Renders card templates.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a renderer with lenient settings.
    #[must_use]
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(no_escape);
        Self { handlebars }
    }

    /// Check a template compiles.
    pub fn validate(&self, template: &str) -> Result<(), TemplateError> {
        handlebars::Template::compile(template)
            .map(|_| ())
            .map_err(|e| TemplateError::Syntax(Box::new(e)))
    }

    /// Render a template against a context.
    pub fn render<C: Serialize>(&self, template: &str, context: &C) -> Result<String, TemplateError> {
        self.validate(template)?;
        self.handlebars
            .render_template(template, context)
            .map_err(|e| TemplateError::Render(Box::new(e)))
    }
}

/// Render a template against a context with the default renderer.
pub fn render<C: Serialize>(template: &str, context: &C) -> Result<String, TemplateError> {
    TemplateRenderer::new().render(template, context)
}
