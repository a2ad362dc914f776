//! Notification renderer.

use super::{EmbedField, EmbedFooter, EmbedMedia, Notification, TemplateError};
use crate::config::Settings;
use crate::source::RepositoryObservation;
use handlebars::{no_escape, Context, Handlebars, Helper, HelperResult, Output, RenderContext};
use serde_json::{json, Value};

/// Default handlebars template for the notification body.
pub const DEFAULT_DESCRIPTION_TEMPLATE: &str = "**{{name}}**
{{description}}

━━━━━━━━━━━━━━━
📊 **Stats**
⭐ Stars: `{{stars}}`
🍴 Forks: `{{forks}}`
👀 Watchers: `{{watchers}}`

━━━━━━━━━━━━━━━
🔗 **Quick Links**
• [View Repository]({{html_url}})
• [Download ZIP]({{html_url}}/archive/refs/heads/main.zip)";

/// Creates a configured Handlebars registry with custom helpers.
///
/// The registry is configured with:
/// - No HTML escaping (chat messages are markdown)
/// - Strict mode (catches missing variables)
/// - `eq` helper for equality comparisons
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs.register_helper("eq", Box::new(eq_helper));
    hbs
}

/// Usage: `{{#if (eq visibility "Private")}}...{{/if}}`
fn eq_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param1 = h.param(0).and_then(|v| v.value().as_str());
    let param2 = h.param(1).and_then(|v| v.value().as_str());

    let result = match (param1, param2) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };

    out.write(if result { "true" } else { "" })?;
    Ok(())
}

/// Renders repository observations into chat notifications.
///
/// Output depends only on the observation, the update flag and the
/// settings; nothing reads the clock.
pub struct NotificationRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for NotificationRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationRenderer {
    /// Creates a new renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders a creation (`is_update == false`) or update notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the description template fails to render.
    pub fn render(
        &self,
        observation: &RepositoryObservation,
        is_update: bool,
        settings: &Settings,
    ) -> Result<Notification, TemplateError> {
        let embed = &settings.embed;
        let account = settings.account().unwrap_or_default();

        let template = embed
            .description_template
            .as_deref()
            .unwrap_or(DEFAULT_DESCRIPTION_TEMPLATE);
        let description = self
            .handlebars
            .render_template(template, &template_data(observation, is_update, account))?;

        let title = if is_update {
            embed.update_title.clone()
        } else {
            embed.title.clone()
        };

        let footer_text = if account.is_empty() {
            embed.footer_text.clone()
        } else {
            format!("{} • {}", embed.footer_text, account)
        };

        Ok(Notification {
            title,
            description,
            url: observation.html_url.clone(),
            color: embed.color_value(),
            image: Some(EmbedMedia {
                url: preview_url(observation, account),
            }),
            thumbnail: embed
                .thumbnail
                .clone()
                .map(|url| EmbedMedia { url }),
            fields: metadata_fields(observation),
            footer: Some(EmbedFooter {
                text: footer_text,
                icon_url: embed.thumbnail.clone(),
            }),
            timestamp: embed.show_timestamp.then_some(observation.updated_at),
        })
    }
}

fn template_data(observation: &RepositoryObservation, is_update: bool, account: &str) -> Value {
    json!({
        "id": observation.id.0,
        "name": observation.name,
        "account": account,
        "description": observation
            .description
            .as_deref()
            .unwrap_or("No description provided."),
        "html_url": observation.html_url,
        "stars": observation.star_count,
        "forks": observation.fork_count,
        "watchers": observation.watcher_count,
        "language": observation.language.as_deref().unwrap_or("Not specified"),
        "license": observation.license.as_deref().unwrap_or("No license"),
        "visibility": visibility_label(observation),
        "is_update": is_update
    })
}

/// GitHub's social preview image for the repository.
fn preview_url(observation: &RepositoryObservation, account: &str) -> String {
    format!(
        "https://opengraph.githubassets.com/{}/{}/{}",
        observation.id, account, observation.name
    )
}

fn metadata_fields(observation: &RepositoryObservation) -> Vec<EmbedField> {
    let field = |name: &str, value: String| EmbedField {
        name: name.to_string(),
        value: format!("`{value}`"),
        inline: true,
    };

    vec![
        field(
            "📝 Language",
            observation
                .language
                .clone()
                .unwrap_or_else(|| "Not specified".to_string()),
        ),
        field(
            "📜 License",
            observation
                .license
                .clone()
                .unwrap_or_else(|| "No license".to_string()),
        ),
        field("🔒 Visibility", visibility_label(observation)),
        field(
            "📅 Created",
            format!("{} UTC", observation.created_at.format("%Y-%m-%d %H:%M")),
        ),
    ]
}

fn visibility_label(observation: &RepositoryObservation) -> String {
    capitalize(observation.visibility.as_deref().unwrap_or("unknown"))
}

/// Uppercases the first character and lowercases the rest.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
