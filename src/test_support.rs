//! Builders, reference data, and a scripted gateway shared by unit and
//! behavioural tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use crate::github::{GatewayError, PullRequestGateway};
use crate::model::{PullRequestSnapshot, PullRequestState, TipCommit, Version};
use crate::page::PageConfig;

/// Fixed instant that reference pull request dates are derived from.
#[must_use]
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Fluent builder for [`PullRequestSnapshot`] values.
///
/// Pull request `n` defaults to an open pull request against `master` whose
/// tip was committed `n` days before [`reference_time`], so lower numbers are
/// newer.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    snapshot: PullRequestSnapshot,
}

impl SnapshotBuilder {
    /// Starts a builder for pull request `number`.
    #[must_use]
    pub fn new(number: u64) -> Self {
        let age = TimeDelta::days(i64::try_from(number).unwrap_or_default());
        Self {
            snapshot: PullRequestSnapshot {
                number,
                title: format!("pr{number} title"),
                base_ref: "master".to_owned(),
                head_ref: format!("pr{number}"),
                is_cross_repository: false,
                is_draft: false,
                state: PullRequestState::Open,
                approved_review_count: 0,
                labels: Vec::new(),
                tip: TipCommit {
                    oid: format!("oid{number}"),
                    message: format!("commit message{number}"),
                    committed_at: reference_time() - age,
                },
                closed_at: None,
                merged_at: None,
                has_status: false,
            },
        }
    }

    /// Sets the base branch.
    #[must_use]
    pub fn base_ref(mut self, base_ref: &str) -> Self {
        base_ref.clone_into(&mut self.snapshot.base_ref);
        self
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        title.clone_into(&mut self.snapshot.title);
        self
    }

    /// Prefixes the tip commit message with a `[skip ci]` marker.
    #[must_use]
    pub fn skip_ci(mut self) -> Self {
        self.snapshot.tip.message = format!("[skip ci]{}", self.snapshot.tip.message);
        self
    }

    /// Marks the head branch as living in a fork.
    #[must_use]
    pub const fn cross_repository(mut self) -> Self {
        self.snapshot.is_cross_repository = true;
        self
    }

    /// Marks the pull request as a draft.
    #[must_use]
    pub const fn draft(mut self) -> Self {
        self.snapshot.is_draft = true;
        self
    }

    /// Sets the approving review count.
    #[must_use]
    pub const fn approved_reviews(mut self, count: u32) -> Self {
        self.snapshot.approved_review_count = count;
        self
    }

    /// Replaces the label names.
    #[must_use]
    pub fn labels(mut self, labels: &[&str]) -> Self {
        self.snapshot.labels = labels.iter().map(|label| (*label).to_owned()).collect();
        self
    }

    /// Marks the configured status context as present on the tip.
    #[must_use]
    pub const fn with_status(mut self) -> Self {
        self.snapshot.has_status = true;
        self
    }

    /// Sets the tip commit timestamp.
    #[must_use]
    pub const fn committed_at(mut self, committed_at: DateTime<Utc>) -> Self {
        self.snapshot.tip.committed_at = committed_at;
        self
    }

    /// Closes the pull request at the given instant.
    #[must_use]
    pub const fn closed_at(mut self, closed_at: DateTime<Utc>) -> Self {
        self.snapshot.state = PullRequestState::Closed;
        self.snapshot.closed_at = Some(closed_at);
        self
    }

    /// Merges the pull request at the given instant.
    #[must_use]
    pub const fn merged_at(mut self, merged_at: DateTime<Utc>) -> Self {
        self.snapshot.state = PullRequestState::Merged;
        self.snapshot.closed_at = Some(merged_at);
        self.snapshot.merged_at = Some(merged_at);
        self
    }

    /// Finishes the snapshot.
    #[must_use]
    pub fn build(self) -> PullRequestSnapshot {
        self.snapshot
    }
}

/// The twelve reference pull requests used by the check scenarios.
///
/// | # | notes |
/// |---|---|
/// | 1 | `[skip ci]` commit message |
/// | 2 | status present |
/// | 3 | draft |
/// | 4 | status present |
/// | 5 | from a fork |
/// | 7 | targets `develop`, labelled `enhancement`, status present |
/// | 8 | one approval, labelled `wontfix`, status present |
/// | 10 | closed at [`reference_time`] |
/// | 11 | merged one minute after [`reference_time`] |
///
/// Numbers 6, 9 and 12 are plain open pull requests.
#[must_use]
pub fn reference_pull_requests() -> Vec<PullRequestSnapshot> {
    vec![
        SnapshotBuilder::new(1).skip_ci().build(),
        SnapshotBuilder::new(2).with_status().build(),
        SnapshotBuilder::new(3).draft().build(),
        SnapshotBuilder::new(4).with_status().build(),
        SnapshotBuilder::new(5).cross_repository().build(),
        SnapshotBuilder::new(6).build(),
        SnapshotBuilder::new(7)
            .base_ref("develop")
            .labels(&["enhancement"])
            .with_status()
            .build(),
        SnapshotBuilder::new(8)
            .approved_reviews(1)
            .labels(&["wontfix"])
            .with_status()
            .build(),
        SnapshotBuilder::new(9).build(),
        SnapshotBuilder::new(10).closed_at(reference_time()).build(),
        SnapshotBuilder::new(11)
            .merged_at(reference_time() + TimeDelta::minutes(1))
            .build(),
        SnapshotBuilder::new(12).build(),
    ]
}

/// Returns the version of reference pull request `number`, if it exists.
#[must_use]
pub fn reference_version(number: u64) -> Option<Version> {
    reference_pull_requests()
        .iter()
        .find(|snapshot| snapshot.number == number)
        .map(Version::from)
}

/// Gateway that serves canned pull requests and changed file lists.
///
/// Listing filters the canned pull requests by the requested states. Changed
/// file lists are handed out in call order regardless of the pull request
/// number; once exhausted, an empty list is returned.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    pull_requests: Vec<PullRequestSnapshot>,
    changed_files: Mutex<VecDeque<Vec<String>>>,
    file_requests: Mutex<Vec<u64>>,
    list_calls: AtomicUsize,
    listing_failure: Option<GatewayError>,
    file_listing_failure: Option<GatewayError>,
}

impl ScriptedGateway {
    /// Creates a gateway serving the given pull requests.
    #[must_use]
    pub fn new(pull_requests: Vec<PullRequestSnapshot>) -> Self {
        Self {
            pull_requests,
            ..Self::default()
        }
    }

    /// Queues changed file lists, one per `list_changed_files` call.
    #[must_use]
    pub fn with_changed_files(self, changed_files: Vec<Vec<String>>) -> Self {
        Self {
            changed_files: Mutex::new(changed_files.into()),
            ..self
        }
    }

    /// Makes `list_pull_requests` fail with `error`.
    #[must_use]
    pub fn failing_listing(self, error: GatewayError) -> Self {
        Self {
            listing_failure: Some(error),
            ..self
        }
    }

    /// Makes `list_changed_files` fail with `error`.
    #[must_use]
    pub fn failing_file_listing(self, error: GatewayError) -> Self {
        Self {
            file_listing_failure: Some(error),
            ..self
        }
    }

    /// Number of `list_pull_requests` calls received.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Pull request numbers passed to `list_changed_files`, in call order.
    #[must_use]
    pub fn file_requests(&self) -> Vec<u64> {
        self.file_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl PullRequestGateway for ScriptedGateway {
    async fn list_pull_requests(
        &self,
        states: &[PullRequestState],
        _page: &PageConfig,
    ) -> Result<Vec<PullRequestSnapshot>, GatewayError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.listing_failure {
            return Err(error.clone());
        }
        Ok(self
            .pull_requests
            .iter()
            .filter(|snapshot| states.contains(&snapshot.state))
            .cloned()
            .collect())
    }

    async fn list_changed_files(&self, number: u64) -> Result<Vec<String>, GatewayError> {
        self.file_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(number);
        if let Some(error) = &self.file_listing_failure {
            return Err(error.clone());
        }
        Ok(self
            .changed_files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_default())
    }
}
