//! Change detection for a pipeline resource watching GitHub pull requests.
//!
//! A check receives the resource's source configuration and the version it
//! emitted last time, lists candidate pull requests through a
//! [`PullRequestGateway`], filters them, and returns the versions the
//! pipeline should react to, oldest first. Nothing is ever written back to
//! GitHub.

pub mod check;
pub mod config;
pub mod error;
pub mod filter;
pub mod github;
pub mod model;
pub mod page;
pub mod paths;
pub mod resolve;
pub mod source;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use check::VersionCheck;
pub use config::PullwatchConfig;
pub use error::{CheckError, ConfigError};
pub use filter::{FilterChain, FilterConfig, SkipReason, Verbosity};
pub use github::{GatewayError, OctocrabGateway, PullRequestGateway};
pub use model::{PullRequestSnapshot, PullRequestState, Version};
pub use page::PageConfig;
pub use source::{CheckRequest, SourceConfig, ValidatedRequest};
