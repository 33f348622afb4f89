//! GitHub access for the version check.
//!
//! Wraps Octocrab behind [`PullRequestGateway`] and maps transport and API
//! failures into [`GatewayError`] values.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod rate_limit;

pub use error::GatewayError;
pub use gateway::{OctocrabGateway, PullRequestGateway};
pub use locator::{DEFAULT_API_BASE, PersonalAccessToken, RepositoryLocator};
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use gateway::MockPullRequestGateway;
