//! Fetching repositories from the watched account.
//!
//! The [`RepositorySource`] trait is the seam the reconciliation loop
//! depends on; [`GitHubSource`] is the production implementation.

mod error;
mod github;
mod observation;

pub use error::SourceError;
pub use github::GitHubSource;
pub use observation::{RepositoryId, RepositoryObservation};

use async_trait::async_trait;

/// Lists every repository of an account.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Fetches the current repositories of `account`.
    ///
    /// An account without repositories yields an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failures or non-success responses.
    async fn fetch_all(&self, account: &str) -> Result<Vec<RepositoryObservation>, SourceError>;
}
