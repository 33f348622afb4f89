//! Turns surviving candidates into the ordered version list.

use std::cmp::Ordering;

use crate::model::{PullRequestSnapshot, Version};

#[cfg(test)]
mod tests;

/// Orders snapshots by effective date, oldest first.
#[must_use]
pub fn by_effective_date(left: &PullRequestSnapshot, right: &PullRequestSnapshot) -> Ordering {
    left.effective_date().cmp(&right.effective_date())
}

/// Builds the version list for the surviving candidates.
///
/// Versions are sorted oldest first; candidates sharing an effective date
/// keep their input order. Two collapsing rules then apply:
///
/// - no survivors but a previous version: the previous version alone, so
///   the pipeline sees that nothing changed;
/// - survivors but no previous version: only the newest, so a first check
///   does not flood the pipeline with history.
///
/// # Example
///
/// ```
/// use pullwatch::model::Version;
/// use pullwatch::resolve::resolve;
///
/// let previous = Version { pr: 4, ..Version::default() };
/// assert_eq!(resolve([], Some(&previous)), vec![previous.clone()]);
/// assert!(resolve([], None).is_empty());
/// ```
#[must_use]
pub fn resolve<'s, I>(survivors: I, previous: Option<&Version>) -> Vec<Version>
where
    I: IntoIterator<Item = &'s PullRequestSnapshot>,
{
    let mut ordered: Vec<&PullRequestSnapshot> = survivors.into_iter().collect();
    ordered.sort_by(|left, right| by_effective_date(left, right));

    match (previous, ordered.last()) {
        (Some(previous_version), None) => vec![previous_version.clone()],
        (None, Some(newest)) => vec![Version::from(*newest)],
        _ => ordered.into_iter().map(Version::from).collect(),
    }
}
