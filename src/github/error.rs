//! Failures reported by the GitHub gateway.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Why a call to GitHub did not produce data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The configured API base is not a usable URI.
    #[error("GitHub API URL is invalid: {0}")]
    InvalidUrl(String),

    /// GitHub answered 401 or 403 for the access token.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// Operation and GitHub's explanation.
        message: String,
    },

    /// Any other error status from GitHub.
    #[error("GitHub API error: {message}")]
    Api {
        /// Operation, status and GitHub's explanation.
        message: String,
    },

    /// The request never got a usable answer: transport failure or 5xx.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport or server failure detail.
        message: String,
    },

    /// GitHub refused the request because the rate limit is used up.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Window fetched from the rate limit endpoint, when reachable.
        rate_limit: Option<RateLimitInfo>,
        /// Operation and GitHub's explanation, plus the reset time if known.
        message: String,
    },
}

impl GatewayError {
    /// Returns true for failures that may succeed when the request is
    /// repeated.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::RateLimitExceeded { .. })
    }
}
