//! The `source` block of a check request and its validation.
//!
//! [`CheckRequest`] mirrors the JSON the pipeline hands to the check step.
//! Validation turns the loosely typed block into a [`ValidatedSource`]:
//! credentials and repository are checked, states parsed, paging bounded,
//! and path patterns compiled, so nothing downstream can fail on
//! configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::filter::{FilterConfig, Verbosity};
use crate::github::{DEFAULT_API_BASE, PersonalAccessToken, RepositoryLocator};
use crate::model::{PullRequestState, Version};
use crate::page::{PageConfig, RawPageConfig, normalize};
use crate::paths::PathPattern;


/// The resource's `source` block as supplied by the pipeline.
///
/// Keys used only by other steps of the resource are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Repository in `owner/name` form.
    pub repository: String,
    /// GitHub access token.
    pub access_token: String,
    /// REST API base for GitHub Enterprise.
    pub v3_endpoint: String,
    /// GraphQL endpoint for GitHub Enterprise; must accompany `v3_endpoint`.
    pub v4_endpoint: String,
    /// Only report pull requests touching these paths.
    pub paths: Vec<String>,
    /// Do not report pull requests touching only these paths.
    pub ignore_paths: Vec<String>,
    /// Report pull requests even when they carry a CI skip marker.
    pub disable_ci_skip: bool,
    /// Do not report pull requests from forks.
    pub disable_forks: bool,
    /// Do not report draft pull requests.
    pub ignore_drafts: bool,
    /// Only report pull requests targeting this branch.
    pub base_branch: String,
    /// Minimum number of approving reviews.
    pub required_review_approvals: u32,
    /// Only report pull requests carrying one of these labels.
    pub labels: Vec<String>,
    /// Lifecycle states to report; defaults to `OPEN`.
    pub states: Vec<String>,
    /// Report tips lacking this status context instead of new commits.
    pub status_context: String,
    /// Paging and ordering options.
    pub page: RawPageConfig,
    /// Log filter decisions at info level.
    pub verbose: bool,
}

/// Source block after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSource {
    /// Watched repository and API base.
    pub repository: RepositoryLocator,
    /// Access token.
    pub access_token: PersonalAccessToken,
    /// Lifecycle states to list; never empty.
    pub states: Vec<PullRequestState>,
    /// Filter chain rules.
    pub filter: FilterConfig,
    /// Bounded paging options.
    pub page: PageConfig,
}

impl SourceConfig {
    /// Validates the block.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: missing token or repository,
    /// unpaired or malformed endpoints, unknown states, invalid ordering, or
    /// malformed path patterns.
    pub fn validate(&self) -> Result<ValidatedSource, ConfigError> {
        let access_token = PersonalAccessToken::new(&self.access_token)?;
        if self.repository.trim().is_empty() {
            return Err(ConfigError::MissingRepository);
        }
        let api_base = self.api_base()?;
        let repository = RepositoryLocator::new(api_base, &self.repository)?;
        let states = self.parse_states()?;
        let page = normalize(&self.page)?;

        let filter = FilterConfig {
            disable_ci_skip: self.disable_ci_skip,
            base_branch: non_blank(&self.base_branch),
            status_context: non_blank(&self.status_context),
            labels: self.labels.clone(),
            disable_forks: self.disable_forks,
            ignore_drafts: self.ignore_drafts,
            required_review_approvals: self.required_review_approvals,
            paths: compile(&self.paths)?,
            ignore_paths: compile(&self.ignore_paths)?,
            verbosity: Verbosity::from_flag(self.verbose),
        };

        Ok(ValidatedSource {
            repository,
            access_token,
            states,
            filter,
            page,
        })
    }

    fn api_base(&self) -> Result<Url, ConfigError> {
        let v3 = self.v3_endpoint.trim();
        let v4 = self.v4_endpoint.trim();
        let endpoint = match (v3.is_empty(), v4.is_empty()) {
            (true, true) => DEFAULT_API_BASE,
            (false, true) => return Err(ConfigError::MissingV4Endpoint),
            (true, false) => return Err(ConfigError::MissingV3Endpoint),
            (false, false) => v3,
        };
        Url::parse(endpoint).map_err(|error| ConfigError::InvalidEndpoint {
            message: error.to_string(),
        })
    }

    fn parse_states(&self) -> Result<Vec<PullRequestState>, ConfigError> {
        if self.states.is_empty() {
            return Ok(vec![PullRequestState::Open]);
        }
        let mut states = Vec::with_capacity(self.states.len());
        for raw in &self.states {
            let state = raw.parse::<PullRequestState>()?;
            if !states.contains(&state) {
                states.push(state);
            }
        }
        Ok(states)
    }
}

/// Blank means unset; anything else is kept verbatim.
fn non_blank(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_owned())
}

fn compile(patterns: &[String]) -> Result<Vec<PathPattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| PathPattern::parse(pattern))
        .collect()
}

/// Check request as received on stdin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckRequest {
    /// Resource configuration.
    pub source: SourceConfig,
    /// Version emitted by the previous check; `null` on the first run.
    pub version: Option<Version>,
}

/// Check request ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// Validated source block.
    pub source: ValidatedSource,
    /// Previous version, absent on the first run.
    pub previous: Option<Version>,
}

impl CheckRequest {
    /// Decodes a request from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedRequest`] when the payload is not a
    /// valid request document.
    pub fn from_json(payload: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(payload).map_err(|error| ConfigError::MalformedRequest {
            message: error.to_string(),
        })
    }

    /// Validates the source block and normalizes the previous version.
    ///
    /// A previous version without a pull request number counts as absent.
    ///
    /// # Errors
    ///
    /// Propagates [`SourceConfig::validate`] failures.
    pub fn validate(&self) -> Result<ValidatedRequest, ConfigError> {
        Ok(ValidatedRequest {
            source: self.source.validate()?,
            previous: self.version.clone().filter(|version| !version.is_empty()),
        })
    }
}
