//! Translation of Octocrab failures into [`GatewayError`] values.

use http::StatusCode;

use crate::github::error::GatewayError;

const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// A 403 or 429 whose message or documentation link mentions rate limiting.
pub(super) fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let limited_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );
    let mentions_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    limited_status && mentions_rate_limit
}

/// Maps every failure except rate limiting, which needs a follow-up request
/// and is handled by the gateway itself.
pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> GatewayError {
    match error {
        octocrab::Error::GitHub { source, .. } if is_auth_failure(source.status_code) => {
            GatewayError::Authentication {
                message: format!(
                    "{operation} failed: GitHub returned {status} {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        }
        octocrab::Error::GitHub { source, .. } if source.status_code.is_server_error() => {
            GatewayError::Network {
                message: format!(
                    "{operation} failed with status {status}: {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        }
        octocrab::Error::GitHub { source, .. } => GatewayError::Api {
            message: format!(
                "{operation} failed with status {status}: {message}",
                status = source.status_code,
                message = source.message
            ),
        },
        other if is_network_error(other) => GatewayError::Network {
            message: format!("{operation} failed: {other}"),
        },
        other => GatewayError::Api {
            message: format!("{operation} failed: {other}"),
        },
    }
}
