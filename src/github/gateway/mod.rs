//! Collaborator that fetches pull requests and their changed files.
//!
//! The version check only talks to GitHub through [`PullRequestGateway`], so
//! tests can substitute a mock while [`OctocrabGateway`] performs the real
//! REST calls.

mod client;
mod error_mapping;
mod models;
mod rest;


pub use rest::OctocrabGateway;

use async_trait::async_trait;

use crate::github::error::GatewayError;
use crate::model::{PullRequestSnapshot, PullRequestState};
use crate::page::PageConfig;

/// Source of candidate pull requests for a version check.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// Lists pull requests in any of `states`, bounded and ordered by `page`.
    ///
    /// Each snapshot carries its tip commit, approved review count, and
    /// whether the configured status context is already reported.
    async fn list_pull_requests(
        &self,
        states: &[PullRequestState],
        page: &PageConfig,
    ) -> Result<Vec<PullRequestSnapshot>, GatewayError>;

    /// Lists the paths changed by pull request `number`.
    async fn list_changed_files(&self, number: u64) -> Result<Vec<String>, GatewayError>;
}
