//! Rate limit window reported by the GitHub API.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Rate limit window attached to a refused request.
///
/// # Example
///
/// ```
/// use pullwatch::github::RateLimitInfo;
///
/// let info = RateLimitInfo::new(0, 1_700_000_000);
/// assert!(info.is_exhausted());
/// assert_eq!(info.reset_at(), 1_700_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    remaining: u32,
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a window with `remaining` requests that resets at the
    /// `reset_at` Unix timestamp.
    #[must_use]
    pub const fn new(remaining: u32, reset_at: u64) -> Self {
        Self {
            remaining,
            reset_at,
        }
    }

    /// Requests left in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Unix timestamp at which the window resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Returns true when no requests are left in the window.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Time left until the window resets, zero once it has passed.
    #[must_use]
    pub fn time_until_reset(&self) -> Duration {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        Duration::from_secs(self.reset_at.saturating_sub(now))
    }
}
