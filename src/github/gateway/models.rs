//! REST response shapes decoded by the Octocrab gateway.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::PullRequestState;

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) title: Option<String>,
    pub(super) state: Option<String>,
    #[serde(default)]
    pub(super) draft: bool,
    pub(super) closed_at: Option<DateTime<Utc>>,
    pub(super) merged_at: Option<DateTime<Utc>>,
    pub(super) head: ApiBranch,
    pub(super) base: ApiBranch,
    #[serde(default)]
    pub(super) labels: Vec<ApiLabel>,
}

impl ApiPullRequest {
    /// Lifecycle state; a closed pull request with a merge time is merged.
    pub(super) fn lifecycle_state(&self) -> PullRequestState {
        match (self.state.as_deref(), self.merged_at) {
            (_, Some(_)) => PullRequestState::Merged,
            (Some("closed"), None) => PullRequestState::Closed,
            _ => PullRequestState::Open,
        }
    }

    /// True when the head lives in another repository. A deleted head
    /// repository counts as a fork.
    pub(super) fn is_cross_repository(&self) -> bool {
        match (&self.head.repo, &self.base.repo) {
            (Some(head), Some(base)) => head.full_name != base.full_name,
            (None, _) => true,
            (Some(_), None) => false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBranch {
    #[serde(rename = "ref")]
    pub(super) name: String,
    pub(super) sha: String,
    pub(super) repo: Option<ApiRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiLabel {
    pub(super) name: String,
}

/// Single commit response; only the commit body is read.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommit {
    pub(super) commit: ApiCommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommitDetail {
    #[serde(default)]
    pub(super) message: String,
    pub(super) author: Option<ApiSignature>,
    pub(super) committer: Option<ApiSignature>,
}

impl ApiCommitDetail {
    /// Committer date, falling back to the author date.
    pub(super) fn committed_at(&self) -> Option<DateTime<Utc>> {
        self.committer
            .as_ref()
            .and_then(|signature| signature.date)
            .or_else(|| self.author.as_ref().and_then(|signature| signature.date))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiSignature {
    pub(super) date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiReview {
    pub(super) state: Option<String>,
}

impl ApiReview {
    pub(super) fn is_approval(&self) -> bool {
        self.state.as_deref() == Some("APPROVED")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiStatus {
    pub(super) context: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiChangedFile {
    pub(super) filename: String,
}
