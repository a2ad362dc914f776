//! Cycle summary types and helpers.

mod cycle_summary;
mod result;

pub use cycle_summary::{CycleSummary, SkipReason};
pub use result::RepoOutcome;
