//! Notification rendering using Handlebars.
//!
//! Turns a [`RepositoryObservation`](crate::source::RepositoryObservation)
//! into a [`Notification`]: a Discord-style embed with a templated body, a
//! stats block and metadata fields.

mod error;
mod notification;
mod renderer;

pub use error::TemplateError;
pub use notification::{EmbedField, EmbedFooter, EmbedMedia, Notification};
pub use renderer::{create_handlebars_registry, NotificationRenderer, DEFAULT_DESCRIPTION_TEMPLATE};
