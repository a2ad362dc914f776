//! Notification rendering error types.

/// Notification rendering error.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Handlebars rendering error, including template syntax errors.
    #[error("Template rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),
}
