//! Octocrab-backed [`PullRequestGateway`] over the REST v3 API.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::de::DeserializeOwned;

use crate::github::error::GatewayError;
use crate::github::locator::RepositoryLocator;
use crate::github::rate_limit::RateLimitInfo;
use crate::model::{PullRequestSnapshot, PullRequestState, TipCommit};
use crate::page::PageConfig;
use crate::source::ValidatedSource;

use super::PullRequestGateway;
use super::client::build_octocrab_client;
use super::error_mapping::{is_rate_limit_error, map_octocrab_error};
use super::models::{ApiChangedFile, ApiCommit, ApiPullRequest, ApiReview, ApiStatus};

const DETAIL_QUERY: [(&str, &str); 1] = [("per_page", "100")];

/// Longest wait for an exhausted rate limit window before retrying.
const MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
struct RetryPolicy {
    max_retries: u32,
    backoff: Duration,
}

impl RetryPolicy {
    /// Exhausted rate limits wait for the window to reset, up to
    /// [`MAX_RATE_LIMIT_WAIT`]; everything else backs off linearly.
    fn delay(&self, error: &GatewayError, attempt: u32) -> Duration {
        match error {
            GatewayError::RateLimitExceeded {
                rate_limit: Some(info),
                ..
            } if info.is_exhausted() => info.time_until_reset().min(MAX_RATE_LIMIT_WAIT),
            _ => self.backoff.saturating_mul(attempt),
        }
    }
}

/// Octocrab-backed gateway for one repository.
pub struct OctocrabGateway {
    client: Octocrab,
    locator: RepositoryLocator,
    status_context: Option<String>,
    retry: RetryPolicy,
}

impl OctocrabGateway {
    /// Creates a gateway from an existing client.
    ///
    /// Status lookups are only made when `status_context` is set. Failed
    /// requests are retried according to `page`.
    #[must_use]
    pub fn new(
        client: Octocrab,
        locator: RepositoryLocator,
        status_context: Option<String>,
        page: &PageConfig,
    ) -> Self {
        Self {
            client,
            locator,
            status_context,
            retry: RetryPolicy {
                max_retries: page.max_retries(),
                backoff: page.delay_between_pages(),
            },
        }
    }

    /// Builds a gateway from a validated source block.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidUrl`] when the API base cannot be used
    /// as a URI and [`GatewayError::Api`] when the client cannot be built.
    pub fn for_source(source: &ValidatedSource) -> Result<Self, GatewayError> {
        let client = build_octocrab_client(
            &source.access_token,
            source.repository.api_base().as_str(),
        )?;
        Ok(Self::new(
            client,
            source.repository.clone(),
            source.filter.status_context.clone(),
            &source.page,
        ))
    }

    async fn with_retries<T, Call, Fut>(&self, operation: &str, call: Call) -> Result<T, GatewayError>
    where
        Call: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = Result<T, octocrab::Error>> + Send,
        T: Send,
    {
        let mut attempt = 0_u32;
        loop {
            let error = match call().await {
                Ok(value) => return Ok(value),
                Err(error) => self.map_error(operation, &error).await,
            };
            if !error.is_transient() || attempt >= self.retry.max_retries {
                return Err(error);
            }
            attempt = attempt.saturating_add(1);
            tracing::warn!(
                operation,
                attempt,
                max_retries = self.retry.max_retries,
                %error,
                "retrying GitHub request"
            );
            tokio::time::sleep(self.retry.delay(&error, attempt)).await;
        }
    }

    async fn fetch_all<T>(&self, operation: &str, path: &str) -> Result<Vec<T>, GatewayError>
    where
        T: DeserializeOwned + Send,
    {
        let mut current: Page<T> = self
            .with_retries(operation, || self.client.get(path, Some(&DETAIL_QUERY)))
            .await?;
        let mut items = Vec::new();
        loop {
            let next = current.next.take();
            items.append(&mut current.items);
            if next.is_none() {
                return Ok(items);
            }
            match self
                .with_retries(operation, || self.client.get_page::<T>(&next))
                .await?
            {
                Some(following) => current = following,
                None => return Ok(items),
            }
        }
    }

    async fn list_candidates(
        &self,
        states: &[PullRequestState],
        page: &PageConfig,
    ) -> Result<Vec<ApiPullRequest>, GatewayError> {
        let path = self.locator.pulls_path();
        let per_page = page.page_size().to_string();
        let query = [
            ("state", listing_state(states)),
            ("sort", page.sort_field().api_value()),
            ("direction", page.sort_direction().api_value()),
            ("per_page", per_page.as_str()),
        ];
        let limit = usize::try_from(page.max_items()).unwrap_or(usize::MAX);

        let mut current: Page<ApiPullRequest> = self
            .with_retries("list pulls", || self.client.get(path.as_str(), Some(&query)))
            .await?;
        let mut candidates = Vec::new();
        loop {
            let next = current.next.take();
            candidates.extend(
                current
                    .items
                    .drain(..)
                    .filter(|pull| states.contains(&pull.lifecycle_state())),
            );
            if candidates.len() >= limit || next.is_none() {
                break;
            }
            tokio::time::sleep(page.delay_between_pages()).await;
            match self
                .with_retries("list pulls", || {
                    self.client.get_page::<ApiPullRequest>(&next)
                })
                .await?
            {
                Some(following) => current = following,
                None => break,
            }
        }
        candidates.truncate(limit);
        tracing::debug!(count = candidates.len(), "listed candidate pull requests");
        Ok(candidates)
    }

    async fn snapshot(&self, pull: ApiPullRequest) -> Result<PullRequestSnapshot, GatewayError> {
        let sha = pull.head.sha.as_str();
        let commit_path = self.locator.commit_path(sha);
        let commit: ApiCommit = self
            .with_retries("get commit", || {
                self.client.get(commit_path.as_str(), None::<&()>)
            })
            .await?;
        let committed_at = commit
            .commit
            .committed_at()
            .ok_or_else(|| GatewayError::Api {
                message: format!("commit {sha} has no commit date"),
            })?;

        let reviews: Vec<ApiReview> = self
            .fetch_all("list reviews", &self.locator.pull_reviews_path(pull.number))
            .await?;
        let approvals = reviews.iter().filter(|review| review.is_approval()).count();

        let has_status = match self.status_context.as_deref() {
            Some(context) => self.has_status(sha, context).await?,
            None => false,
        };

        let state = pull.lifecycle_state();
        let is_cross_repository = pull.is_cross_repository();
        Ok(PullRequestSnapshot {
            number: pull.number,
            title: pull.title.unwrap_or_default(),
            base_ref: pull.base.name,
            head_ref: pull.head.name,
            is_cross_repository,
            is_draft: pull.draft,
            state,
            approved_review_count: u32::try_from(approvals).unwrap_or(u32::MAX),
            labels: pull.labels.into_iter().map(|label| label.name).collect(),
            tip: TipCommit {
                oid: pull.head.sha,
                message: commit.commit.message,
                committed_at,
            },
            closed_at: pull.closed_at,
            merged_at: pull.merged_at,
            has_status,
        })
    }

    async fn has_status(&self, sha: &str, context: &str) -> Result<bool, GatewayError> {
        let statuses: Vec<ApiStatus> = self
            .fetch_all("list statuses", &self.locator.commit_statuses_path(sha))
            .await?;
        Ok(statuses
            .iter()
            .any(|status| status.context.as_deref() == Some(context)))
    }

    async fn map_error(&self, operation: &str, error: &octocrab::Error) -> GatewayError {
        match error {
            octocrab::Error::GitHub { source, .. } if is_rate_limit_error(source) => {
                let rate_limit = self.fetch_rate_limit_info().await;
                let base_message = format!("{operation} failed: {}", source.message);
                let message = match &rate_limit {
                    Some(info) => format!("{base_message} (resets at {})", info.reset_at()),
                    None => base_message,
                };
                GatewayError::RateLimitExceeded {
                    rate_limit,
                    message,
                }
            }
            _ => map_octocrab_error(operation, error),
        }
    }

    async fn fetch_rate_limit_info(&self) -> Option<RateLimitInfo> {
        let rate = self.client.ratelimit().get().await.ok()?.rate;
        let remaining = u32::try_from(rate.remaining).ok()?;
        Some(RateLimitInfo::new(remaining, rate.reset))
    }
}

#[async_trait]
impl PullRequestGateway for OctocrabGateway {
    async fn list_pull_requests(
        &self,
        states: &[PullRequestState],
        page: &PageConfig,
    ) -> Result<Vec<PullRequestSnapshot>, GatewayError> {
        let candidates = self.list_candidates(states, page).await?;
        let mut snapshots = Vec::with_capacity(candidates.len());
        for pull in candidates {
            snapshots.push(self.snapshot(pull).await?);
        }
        Ok(snapshots)
    }

    async fn list_changed_files(&self, number: u64) -> Result<Vec<String>, GatewayError> {
        let files: Vec<ApiChangedFile> = self
            .fetch_all("list files", &self.locator.pull_files_path(number))
            .await?;
        Ok(files.into_iter().map(|file| file.filename).collect())
    }
}

/// REST `state` filter covering every requested lifecycle state. Merged pull
/// requests are listed as closed.
fn listing_state(states: &[PullRequestState]) -> &'static str {
    let wants_open = states.contains(&PullRequestState::Open);
    let wants_closed = states
        .iter()
        .any(|state| matches!(state, PullRequestState::Closed | PullRequestState::Merged));
    match (wants_open, wants_closed) {
        (true, true) => "all",
        (false, true) => "closed",
        _ => "open",
    }
}
