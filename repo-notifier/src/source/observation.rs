//! Point-in-time repository observations.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// Stable repository identifier assigned by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepositoryId(pub u64);

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One repository as seen by a single fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryObservation {
    /// Map key; never changes for a repository.
    pub id: RepositoryId,

    /// Repository name, without the owner.
    pub name: String,

    /// Repository description.
    pub description: Option<String>,

    /// Browser URL of the repository.
    pub html_url: String,

    /// Stargazer count.
    pub star_count: u64,

    /// Fork count.
    pub fork_count: u64,

    /// Watcher count.
    pub watcher_count: u64,

    /// Creation time, used to decide whether a repository is new.
    pub created_at: DateTime<Utc>,

    /// Last update time.
    pub updated_at: DateTime<Utc>,

    /// Primary language.
    pub language: Option<String>,

    /// License display name.
    pub license: Option<String>,

    /// `public`, `private` or `internal`.
    pub visibility: Option<String>,
}

/// Repository record as returned by `GET /users/{name}/repos`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRepository {
    id: u64,
    name: String,
    description: Option<String>,
    html_url: String,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    watchers_count: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    language: Option<String>,
    license: Option<RawLicense>,
    visibility: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLicense {
    name: Option<String>,
}

impl From<RawRepository> for RepositoryObservation {
    fn from(raw: RawRepository) -> Self {
        Self {
            id: RepositoryId(raw.id),
            name: raw.name,
            description: raw.description,
            html_url: raw.html_url,
            star_count: raw.stargazers_count,
            fork_count: raw.forks_count,
            watcher_count: raw.watchers_count,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            language: raw.language,
            license: raw.license.and_then(|l| l.name),
            visibility: raw.visibility,
        }
    }
}
