//! Settings deserialization and validation.

use crate::config::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Runtime settings read from `config.toml`.
///
/// The reconciliation loop takes a fresh snapshot of these at the start of
/// every cycle, so a reload takes effect on the next poll.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    /// Source account settings.
    pub github: GitHubSettings,

    /// Chat channel settings.
    pub discord: DiscordSettings,

    /// Notification appearance.
    pub embed: EmbedSettings,
}

/// Which account is watched and how often.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GitHubSettings {
    /// Account whose repositories are watched. Empty disables polling.
    pub username: String,

    /// Seconds to sleep between cycles.
    pub poll_interval_secs: u64,

    /// Consecutive successful polls a repository may be missing from
    /// before it is forgotten. `0` keeps entries forever.
    pub evict_after_missed_polls: u32,

    /// Upper bound for a single fetch or chat request.
    pub request_timeout_secs: u64,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            username: String::new(),
            poll_interval_secs: 60,
            evict_after_missed_polls: 5,
            request_timeout_secs: 30,
        }
    }
}

/// Where notifications are posted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DiscordSettings {
    /// Target channel. `0` means unset.
    pub channel_id: u64,
}

/// Notification appearance options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EmbedSettings {
    /// Title used when announcing a new repository.
    pub title: String,

    /// Title used when a tracked repository changed.
    pub update_title: String,

    /// Accent color, `#rrggbb`, `#rgb` or `0xrrggbb`.
    pub color: String,

    /// Thumbnail and footer icon URL.
    pub thumbnail: Option<String>,

    /// Footer text, followed by the account name.
    pub footer_text: String,

    /// Whether to stamp the notification with the repository's update time.
    pub show_timestamp: bool,

    /// Handlebars override for the notification body.
    pub description_template: Option<String>,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            title: "New Repository Created!".to_string(),
            update_title: "Repository Updated".to_string(),
            color: "#3498db".to_string(),
            thumbnail: Some(
                "https://github.githubassets.com/images/modules/logos_page/GitHub-Mark.png"
                    .to_string(),
            ),
            footer_text: "GitHub Repository Bot".to_string(),
            show_timestamp: true,
            description_template: None,
        }
    }
}

impl Settings {
    /// Parses settings from TOML text.
    ///
    /// `path` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the TOML is malformed or fails validation.
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings =
            toml::from_str(contents).map_err(|source| ConfigError::TomlError {
                path: path.display().to_string(),
                source,
            })?;
        settings.validate(path)?;
        Ok(settings)
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] on a zero poll interval or
    /// an unparseable color.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        if self.github.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                message: "poll-interval-secs must be greater than zero".to_string(),
            });
        }

        if parse_color(&self.embed.color).is_none() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                message: format!(
                    "invalid color '{}', expected #rrggbb, #rgb or 0xrrggbb",
                    self.embed.color
                ),
            });
        }

        Ok(())
    }

    /// Trimmed account name, or `None` when polling is disabled.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        let account = self.github.username.trim();
        (!account.is_empty()).then_some(account)
    }

    /// Target channel, or `None` when unset.
    #[must_use]
    pub fn channel(&self) -> Option<u64> {
        (self.discord.channel_id != 0).then_some(self.discord.channel_id)
    }

    /// Sleep between cycles.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.github.poll_interval_secs)
    }

    /// Timeout applied to each network call.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.github.request_timeout_secs.max(1))
    }
}

impl EmbedSettings {
    /// Numeric accent color. Falls back to the default blue if invalid.
    #[must_use]
    pub fn color_value(&self) -> u32 {
        parse_color(&self.color).unwrap_or(0x3498db)
    }
}

/// Parses `#rrggbb`, `#rgb`, `rrggbb` or `0xrrggbb` into an RGB integer.
///
/// Three-digit forms expand each digit (`#fff` becomes `0xffffff`).
#[must_use]
pub fn parse_color(value: &str) -> Option<u32> {
    let value = value.trim();
    let hex = value
        .strip_prefix('#')
        .or_else(|| value.strip_prefix("0x"))
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        6 => u32::from_str_radix(hex, 16).ok(),
        3 => {
            let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
            u32::from_str_radix(&expanded, 16).ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> &'static Path {
        Path::new("config.toml")
    }

    #[test]
    fn parses_full_settings() {
        let settings = Settings::from_toml(
            r##"
[github]
username = "octocat"
poll-interval-secs = 120
evict-after-missed-polls = 0

[discord]
channel-id = 1234

[embed]
title = "Fresh repo"
color = "0x112233"
show-timestamp = false
"##,
            path(),
        )
        .unwrap();

        assert_eq!(settings.account(), Some("octocat"));
        assert_eq!(settings.channel(), Some(1234));
        assert_eq!(settings.poll_interval(), Duration::from_secs(120));
        assert_eq!(settings.github.evict_after_missed_polls, 0);
        assert_eq!(settings.embed.title, "Fresh repo");
        assert_eq!(settings.embed.update_title, "Repository Updated");
        assert_eq!(settings.embed.color_value(), 0x112233);
        assert!(!settings.embed.show_timestamp);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let settings = Settings::from_toml("", path()).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.account(), None);
        assert_eq!(settings.channel(), None);
        assert_eq!(settings.poll_interval(), Duration::from_secs(60));
        assert_eq!(settings.github.evict_after_missed_polls, 5);
    }

    #[test]
    fn blank_username_disables_polling() {
        let settings = Settings::from_toml(
            r#"
[github]
username = "   "
"#,
            path(),
        )
        .unwrap();

        assert_eq!(settings.account(), None);
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let result = Settings::from_toml(
            r#"
[github]
poll-interval-secs = 0
"#,
            path(),
        );

        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn rejects_invalid_color() {
        let result = Settings::from_toml(
            r#"
[embed]
color = "blue"
"#,
            path(),
        );

        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn reports_invalid_toml() {
        let result = Settings::from_toml("[github\nusername = 1", path());
        assert!(matches!(result, Err(ConfigError::TomlError { .. })));
    }

    #[test]
    fn parses_color_formats() {
        assert_eq!(parse_color("#3498db"), Some(0x3498db));
        assert_eq!(parse_color("0x3498DB"), Some(0x3498db));
        assert_eq!(parse_color("3498db"), Some(0x3498db));
        assert_eq!(parse_color("#fff"), Some(0xffffff));
        assert_eq!(parse_color("#ff"), None);
        assert_eq!(parse_color("#gggggg"), None);
    }
}
