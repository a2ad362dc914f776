//! Source client error types.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching repositories.
///
/// Every variant means the whole cycle is skipped; none is retried here.
#[derive(Debug, Error)]
pub enum SourceError {
    /// GitHub API error, including non-success responses.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The fetch did not complete in time.
    #[error("Fetching repositories for '{account}' timed out after {timeout:?}")]
    Timeout { account: String, timeout: Duration },
}
