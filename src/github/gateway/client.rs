//! Octocrab client construction.

use http::Uri;
use octocrab::Octocrab;

use crate::github::error::GatewayError;
use crate::github::locator::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

/// Builds an authenticated Octocrab client rooted at `api_base`.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidUrl`] when the base cannot be parsed as a
/// URI and [`GatewayError::Api`] when Octocrab rejects the configuration.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, GatewayError> {
    let base_uri = api_base
        .trim_end_matches('/')
        .parse::<Uri>()
        .map_err(|error| GatewayError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.value())
        .base_uri(base_uri)
        .map_err(|error| GatewayError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
