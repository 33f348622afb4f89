//! Ordered predicates deciding which candidate pull requests become
//! versions.
//!
//! The chain evaluates cheap, snapshot-only predicates first and only asks
//! the gateway for the changed files of candidates that survive them. The
//! first predicate that rejects a candidate wins and its [`SkipReason`] is
//! logged; a rejection is never an error.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::check::log::CheckLog;
use crate::error::CheckError;
use crate::github::PullRequestGateway;
use crate::model::{PullRequestSnapshot, Version};
use crate::paths::{PathPattern, select_matching, select_non_matching};


const CI_SKIP_MARKERS: [&str; 2] = ["[ci skip]", "[skip ci]"];

/// How loudly the check reports its decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Decisions are logged at debug level.
    #[default]
    Quiet,
    /// Decisions are logged at info level.
    Verbose,
}

impl Verbosity {
    /// Maps the `verbose` source flag onto a verbosity.
    #[must_use]
    pub const fn from_flag(verbose: bool) -> Self {
        if verbose { Self::Verbose } else { Self::Quiet }
    }
}

/// Rules applied to every candidate of one check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Ignore `[ci skip]` / `[skip ci]` markers.
    pub disable_ci_skip: bool,
    /// Only accept pull requests targeting this branch.
    pub base_branch: Option<String>,
    /// Commit status context; when set, replaces the staleness rule with a
    /// "status already reported" rule.
    pub status_context: Option<String>,
    /// Accept only pull requests carrying at least one of these labels.
    pub labels: Vec<String>,
    /// Reject pull requests opened from forks.
    pub disable_forks: bool,
    /// Reject draft pull requests.
    pub ignore_drafts: bool,
    /// Minimum number of approving reviews.
    pub required_review_approvals: u32,
    /// At least one changed file must match one of these.
    pub paths: Vec<PathPattern>,
    /// At least one changed file must escape all of these.
    pub ignore_paths: Vec<PathPattern>,
    /// Log level for filter decisions.
    pub verbosity: Verbosity,
}

/// Why a candidate was not turned into a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The title carries a CI skip marker.
    CiSkipInTitle,
    /// The tip commit message carries a CI skip marker.
    CiSkipInMessage,
    /// The pull request targets another branch.
    BaseBranchMismatch {
        /// Configured base branch.
        expected: String,
        /// Base branch of the pull request.
        actual: String,
    },
    /// Nothing happened since the previous version.
    Stale {
        /// Effective date of the candidate.
        effective: DateTime<Utc>,
        /// Effective date of the previous version.
        previous: DateTime<Utc>,
    },
    /// The status context is already reported on the tip commit.
    StatusReported,
    /// None of the wanted labels is present.
    MissingLabel,
    /// The pull request comes from a fork.
    Fork,
    /// The pull request is a draft.
    Draft,
    /// Not enough approving reviews.
    InsufficientApprovals {
        /// Approvals present.
        approved: u32,
        /// Approvals required.
        required: u32,
    },
    /// No changed file matches the `paths` patterns.
    NoMatchingPaths,
    /// Every changed file matches an `ignore_paths` pattern.
    AllPathsIgnored,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CiSkipInTitle => formatter.write_str("[ci skip]/[skip ci] in pull request title"),
            Self::CiSkipInMessage => formatter.write_str("[ci skip]/[skip ci] in commit message"),
            Self::BaseBranchMismatch { expected, actual } => {
                write!(formatter, "base branch {actual} does not match {expected}")
            }
            Self::Stale {
                effective,
                previous,
            } => write!(
                formatter,
                "effective date {effective} is not after previous version {previous}"
            ),
            Self::StatusReported => formatter.write_str("commit already has a build status"),
            Self::MissingLabel => formatter.write_str("none of the desired labels is present"),
            Self::Fork => formatter.write_str("pull request is from a fork"),
            Self::Draft => formatter.write_str("pull request is a draft"),
            Self::InsufficientApprovals { approved, required } => write!(
                formatter,
                "{approved} approved review(s), {required} required"
            ),
            Self::NoMatchingPaths => formatter.write_str("no files match the specified paths"),
            Self::AllPathsIgnored => formatter.write_str("all files are ignored"),
        }
    }
}

/// Returns true when `text` contains `[ci skip]` or `[skip ci]`, ignoring
/// case.
///
/// # Example
///
/// ```
/// use pullwatch::filter::contains_skip_ci;
///
/// assert!(contains_skip_ci("Bump docs [CI SKIP]"));
/// assert!(!contains_skip_ci("ci skip"));
/// ```
#[must_use]
pub fn contains_skip_ci(text: &str) -> bool {
    let lowered = text.to_lowercase();
    CI_SKIP_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

type Predicate = fn(&FilterChain<'_>, &PullRequestSnapshot) -> Option<SkipReason>;

const PREDICATES: [Predicate; 8] = [
    ci_skip,
    base_branch,
    staleness,
    status_reported,
    labels,
    forks,
    drafts,
    approvals,
];

/// Filter chain bound to one check's rules and previous version.
#[derive(Debug, Clone, Copy)]
pub struct FilterChain<'c> {
    config: &'c FilterConfig,
    previous: Option<&'c Version>,
    log: CheckLog,
}

impl<'c> FilterChain<'c> {
    /// Binds the rules to the previous version, if any.
    #[must_use]
    pub const fn new(config: &'c FilterConfig, previous: Option<&'c Version>) -> Self {
        Self {
            config,
            previous,
            log: CheckLog::new(config.verbosity),
        }
    }

    /// Returns the candidates that pass every predicate, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::ListModifiedFiles`] when the changed files of a
    /// candidate cannot be listed.
    pub async fn select<'p, G>(
        &self,
        candidates: &'p [PullRequestSnapshot],
        gateway: &G,
    ) -> Result<Vec<&'p PullRequestSnapshot>, CheckError>
    where
        G: PullRequestGateway + ?Sized,
    {
        let mut survivors = Vec::new();
        for candidate in candidates {
            self.log.candidate(candidate);
            match self.rejection(candidate, gateway).await? {
                Some(reason) => self.log.skipped(candidate.number, &reason),
                None => {
                    self.log.accepted(candidate.number);
                    survivors.push(candidate);
                }
            }
        }
        Ok(survivors)
    }

    /// Runs the predicates against one candidate and returns the first
    /// rejection.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::ListModifiedFiles`] when the path filters need
    /// the changed files and the gateway fails.
    pub async fn rejection<G>(
        &self,
        candidate: &PullRequestSnapshot,
        gateway: &G,
    ) -> Result<Option<SkipReason>, CheckError>
    where
        G: PullRequestGateway + ?Sized,
    {
        if let Some(reason) = PREDICATES
            .iter()
            .find_map(|predicate| predicate(self, candidate))
        {
            return Ok(Some(reason));
        }
        self.path_rejection(candidate, gateway).await
    }

    async fn path_rejection<G>(
        &self,
        candidate: &PullRequestSnapshot,
        gateway: &G,
    ) -> Result<Option<SkipReason>, CheckError>
    where
        G: PullRequestGateway + ?Sized,
    {
        if self.config.paths.is_empty() && self.config.ignore_paths.is_empty() {
            return Ok(None);
        }
        let files = gateway
            .list_changed_files(candidate.number)
            .await
            .map_err(|source| CheckError::ListModifiedFiles {
                number: candidate.number,
                source,
            })?;

        if !self.config.paths.is_empty() {
            let wanted: Vec<&str> = self
                .config
                .paths
                .iter()
                .flat_map(|pattern| select_matching(files.iter().map(String::as_str), pattern))
                .collect();
            if wanted.is_empty() {
                return Ok(Some(SkipReason::NoMatchingPaths));
            }
        }

        if !self.config.ignore_paths.is_empty() {
            let remaining = self.config.ignore_paths.iter().fold(
                files.iter().map(String::as_str).collect::<Vec<_>>(),
                |remaining, pattern| select_non_matching(remaining, pattern),
            );
            if remaining.is_empty() {
                return Ok(Some(SkipReason::AllPathsIgnored));
            }
        }

        Ok(None)
    }
}

fn ci_skip(chain: &FilterChain<'_>, candidate: &PullRequestSnapshot) -> Option<SkipReason> {
    if chain.config.disable_ci_skip {
        None
    } else if contains_skip_ci(&candidate.title) {
        Some(SkipReason::CiSkipInTitle)
    } else if contains_skip_ci(&candidate.tip.message) {
        Some(SkipReason::CiSkipInMessage)
    } else {
        None
    }
}

fn base_branch(chain: &FilterChain<'_>, candidate: &PullRequestSnapshot) -> Option<SkipReason> {
    let expected = chain.config.base_branch.as_deref()?;
    (candidate.base_ref != expected).then(|| SkipReason::BaseBranchMismatch {
        expected: expected.to_owned(),
        actual: candidate.base_ref.clone(),
    })
}

fn staleness(chain: &FilterChain<'_>, candidate: &PullRequestSnapshot) -> Option<SkipReason> {
    if chain.config.status_context.is_some() {
        return None;
    }
    let previous = chain.previous?.committed;
    let effective = candidate.effective_date();
    (effective <= previous).then_some(SkipReason::Stale {
        effective,
        previous,
    })
}

fn status_reported(
    chain: &FilterChain<'_>,
    candidate: &PullRequestSnapshot,
) -> Option<SkipReason> {
    (chain.config.status_context.is_some() && candidate.has_status)
        .then_some(SkipReason::StatusReported)
}

fn labels(chain: &FilterChain<'_>, candidate: &PullRequestSnapshot) -> Option<SkipReason> {
    let wanted = &chain.config.labels;
    (!wanted.is_empty() && !candidate.has_any_label(wanted)).then_some(SkipReason::MissingLabel)
}

fn forks(chain: &FilterChain<'_>, candidate: &PullRequestSnapshot) -> Option<SkipReason> {
    (chain.config.disable_forks && candidate.is_cross_repository).then_some(SkipReason::Fork)
}

fn drafts(chain: &FilterChain<'_>, candidate: &PullRequestSnapshot) -> Option<SkipReason> {
    (chain.config.ignore_drafts && candidate.is_draft).then_some(SkipReason::Draft)
}

fn approvals(chain: &FilterChain<'_>, candidate: &PullRequestSnapshot) -> Option<SkipReason> {
    let required = chain.config.required_review_approvals;
    let approved = candidate.approved_review_count;
    (approved < required).then_some(SkipReason::InsufficientApprovals { approved, required })
}
