//! Pull request snapshots and the versions derived from them.
//!
//! A [`PullRequestSnapshot`] is the immutable view of one candidate as
//! reported by the gateway. A [`Version`] is what the pipeline tracks: the
//! pull request, its tip commit, and the date at which that state became
//! observable.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

mod wire;


/// Lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PullRequestState {
    /// The pull request is open.
    #[default]
    Open,
    /// The pull request was closed without merging.
    Closed,
    /// The pull request was merged.
    Merged,
}

impl PullRequestState {
    /// Returns the wire representation of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Merged => "MERGED",
        }
    }
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for PullRequestState {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "OPEN" => Ok(Self::Open),
            "CLOSED" => Ok(Self::Closed),
            "MERGED" => Ok(Self::Merged),
            _ => Err(ConfigError::InvalidState {
                value: value.to_owned(),
            }),
        }
    }
}

/// Head commit of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipCommit {
    /// Full commit SHA.
    pub oid: String,
    /// Commit message.
    pub message: String,
    /// Committer timestamp.
    pub committed_at: DateTime<Utc>,
}

/// Immutable snapshot of a candidate pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestSnapshot {
    /// Pull request number.
    pub number: u64,
    /// Pull request title.
    pub title: String,
    /// Name of the branch the pull request targets.
    pub base_ref: String,
    /// Name of the branch the pull request merges from.
    pub head_ref: String,
    /// Whether the head branch lives in a fork.
    pub is_cross_repository: bool,
    /// Whether the pull request is a draft.
    pub is_draft: bool,
    /// Lifecycle state.
    pub state: PullRequestState,
    /// Number of approving reviews.
    pub approved_review_count: u32,
    /// Label names attached to the pull request.
    pub labels: Vec<String>,
    /// Head commit.
    pub tip: TipCommit,
    /// When the pull request was closed, if it was.
    pub closed_at: Option<DateTime<Utc>>,
    /// When the pull request was merged, if it was.
    pub merged_at: Option<DateTime<Utc>>,
    /// Whether the configured status context is already reported on the tip.
    pub has_status: bool,
}

impl PullRequestSnapshot {
    /// Returns the timestamp at which the current state became observable.
    ///
    /// Open pull requests use the tip commit date. Closing or merging is a
    /// transition in its own right, so closed and merged pull requests use
    /// the corresponding timestamp, falling back to the commit date when the
    /// gateway did not report one.
    #[must_use]
    pub fn effective_date(&self) -> DateTime<Utc> {
        let transition = match self.state {
            PullRequestState::Open => None,
            PullRequestState::Closed => self.closed_at,
            PullRequestState::Merged => self.merged_at,
        };
        transition.unwrap_or(self.tip.committed_at)
    }

    /// Returns true when any label matches one of the wanted names exactly.
    #[must_use]
    pub fn has_any_label(&self, wanted: &[String]) -> bool {
        wanted
            .iter()
            .any(|wanted_label| self.labels.iter().any(|label| label == wanted_label))
    }
}

/// Version emitted to, and received back from, the pipeline.
///
/// The wire form is a flat map of strings. A version whose `pr` is zero is
/// treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Version {
    /// Pull request number.
    #[serde(with = "wire::number_string")]
    pub pr: u64,
    /// Tip commit SHA.
    pub commit: String,
    /// Effective date of the pull request state.
    pub committed: DateTime<Utc>,
    /// Number of approving reviews at the time of the check.
    #[serde(with = "wire::number_string")]
    pub approved_review_count: u32,
    /// Lifecycle state.
    pub state: PullRequestState,
}

impl Version {
    /// Returns true when the version does not identify a pull request.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pr == 0
    }
}

impl From<&PullRequestSnapshot> for Version {
    fn from(snapshot: &PullRequestSnapshot) -> Self {
        Self {
            pr: snapshot.number,
            commit: snapshot.tip.oid.clone(),
            committed: snapshot.effective_date(),
            approved_review_count: snapshot.approved_review_count,
            state: snapshot.state,
        }
    }
}
