//! Error types surfaced by a version check.

use thiserror::Error;

use crate::github::GatewayError;

/// Invalid request or source configuration.
///
/// Configuration errors abort the check before any pull request is fetched
/// and are never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The source block did not include an access token.
    #[error("access_token must be set")]
    MissingAccessToken,

    /// The source block did not include a repository.
    #[error("repository must be set")]
    MissingRepository,

    /// The repository is not in `owner/name` form.
    #[error("repository '{value}' must be in the form owner/name")]
    InvalidRepository {
        /// The rejected repository value.
        value: String,
    },

    /// A v3 endpoint was configured without its v4 counterpart.
    #[error("v4_endpoint must be set together with v3_endpoint")]
    MissingV4Endpoint,

    /// A v4 endpoint was configured without its v3 counterpart.
    #[error("v3_endpoint must be set together with v4_endpoint")]
    MissingV3Endpoint,

    /// The v3 endpoint could not be parsed as a URL.
    #[error("v3_endpoint is not a valid URL: {message}")]
    InvalidEndpoint {
        /// Parser error detail.
        message: String,
    },

    /// A pull request state filter is not one of the known states.
    #[error("states value \"{value}\" must be one of: OPEN, MERGED, CLOSED")]
    InvalidState {
        /// The rejected state value.
        value: String,
    },

    /// The requested sort field is unknown.
    #[error(
        "sort_field '{value}' not valid, please choose one of 'UPDATED_AT', 'CREATED_AT' or 'COMMENTS'"
    )]
    InvalidSortField {
        /// The rejected sort field.
        value: String,
    },

    /// The requested sort direction is unknown.
    #[error("sort_dir '{value}' not valid, please choose one of 'ASC' or 'DESC'")]
    InvalidSortDirection {
        /// The rejected sort direction.
        value: String,
    },

    /// A `paths` or `ignore_paths` entry is not a valid glob.
    #[error("path pattern '{pattern}' is malformed: {message}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Glob compiler error detail.
        message: String,
    },

    /// The process-level options could not be loaded.
    #[error("invalid pullwatch options: {message}")]
    InvalidOptions {
        /// Loader error detail.
        message: String,
    },

    /// The check request could not be decoded.
    #[error("check request is malformed: {message}")]
    MalformedRequest {
        /// Decoder error detail.
        message: String,
    },
}

/// Errors that abort a version check.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckError {
    /// The request or source configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The GitHub client could not be constructed.
    #[error("failed to create GitHub client: {source}")]
    Client {
        /// Underlying gateway failure.
        source: GatewayError,
    },

    /// Listing candidate pull requests failed.
    #[error("failed to get last commits: {source}")]
    ListPullRequests {
        /// Underlying gateway failure.
        source: GatewayError,
    },

    /// Listing the files changed by a candidate failed.
    #[error("failed to list modified files: {source}")]
    ListModifiedFiles {
        /// Pull request whose files were requested.
        number: u64,
        /// Underlying gateway failure.
        source: GatewayError,
    },

    /// Reading the request or writing the response failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}
