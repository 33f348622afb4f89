//! Decision log for a single check.
//!
//! Every message goes through `tracing`; the configured [`Verbosity`] only
//! picks the level, so decisions stay visible under `RUST_LOG=debug` even
//! when the source block did not ask for verbose output.

use crate::filter::{SkipReason, Verbosity};
use crate::model::{PullRequestSnapshot, Version};

macro_rules! emit {
    ($verbosity:expr, $($arg:tt)+) => {
        match $verbosity {
            Verbosity::Verbose => tracing::info!($($arg)+),
            Verbosity::Quiet => tracing::debug!($($arg)+),
        }
    };
}

/// Level-aware logger for filter and resolver decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckLog {
    verbosity: Verbosity,
}

impl CheckLog {
    /// Creates a logger emitting at the level implied by `verbosity`.
    #[must_use]
    pub const fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Configured verbosity.
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub(crate) fn previous(&self, previous: Option<&Version>) {
        match previous {
            Some(version) => emit!(
                self.verbosity,
                pr = version.pr,
                commit = %version.commit,
                committed = %version.committed,
                "previous version"
            ),
            None => emit!(self.verbosity, "no previous version"),
        }
    }

    pub(crate) fn candidate(&self, snapshot: &PullRequestSnapshot) {
        emit!(
            self.verbosity,
            pr = snapshot.number,
            commit = %snapshot.tip.oid,
            "evaluating pull request"
        );
    }

    pub(crate) fn skipped(&self, number: u64, reason: &SkipReason) {
        emit!(self.verbosity, pr = number, %reason, "{number} skipped, reason: {reason}");
    }

    pub(crate) fn accepted(&self, number: u64) {
        emit!(self.verbosity, pr = number, "not skipped");
    }

    pub(crate) fn response_length(&self, stage: &'static str, length: usize) {
        emit!(self.verbosity, stage, length, "response length {stage} collapse: {length}");
    }
}
