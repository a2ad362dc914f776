//! Dispatch error types.

use crate::chat::ChatError;
use crate::render::TemplateError;
use thiserror::Error;

/// Errors that leave a repository's tracked state untouched.
///
/// The same diff is recomputed and retried on the next cycle.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Sending or editing failed for a reason other than a deleted message.
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    /// The notification could not be rendered.
    #[error(transparent)]
    Render(#[from] TemplateError),
}
