//! Unit tests for version resolution.

use std::cmp::Ordering;

use chrono::TimeDelta;
use rstest::rstest;

use super::{by_effective_date, resolve};
use crate::model::{PullRequestSnapshot, Version};
use crate::test_support::{SnapshotBuilder, reference_time};

fn snapshots(numbers: &[u64]) -> Vec<PullRequestSnapshot> {
    numbers
        .iter()
        .map(|number| SnapshotBuilder::new(*number).build())
        .collect()
}

fn numbers(versions: &[Version]) -> Vec<u64> {
    versions.iter().map(|version| version.pr).collect()
}

#[rstest]
fn sorts_oldest_first_when_previous_exists() {
    let candidates = snapshots(&[1, 5, 3]);
    let previous = Version::from(&SnapshotBuilder::new(9).build());

    let versions = resolve(&candidates, Some(&previous));

    assert_eq!(numbers(&versions), vec![5, 3, 1]);
}

#[rstest]
fn first_check_keeps_only_the_newest() {
    let candidates = snapshots(&[4, 2, 6]);

    let versions = resolve(&candidates, None);

    assert_eq!(numbers(&versions), vec![2]);
}

#[rstest]
fn nothing_new_repeats_the_previous_version() {
    let previous = Version::from(&SnapshotBuilder::new(3).build());

    let versions = resolve(&[], Some(&previous));

    assert_eq!(versions, vec![previous]);
}

#[rstest]
fn nothing_at_all_is_empty() {
    assert!(resolve(&[], None).is_empty());
}

#[rstest]
fn equal_dates_keep_input_order() {
    let tied = reference_time() - TimeDelta::days(1);
    let candidates = vec![
        SnapshotBuilder::new(8).committed_at(tied).build(),
        SnapshotBuilder::new(2).committed_at(tied).build(),
        SnapshotBuilder::new(5).committed_at(tied).build(),
    ];
    let previous = Version::from(&SnapshotBuilder::new(20).build());

    let versions = resolve(&candidates, Some(&previous));

    assert_eq!(numbers(&versions), vec![8, 2, 5]);
}

#[rstest]
fn closed_and_merged_pull_requests_sort_by_transition_time() {
    let candidates = vec![
        SnapshotBuilder::new(1).build(),
        SnapshotBuilder::new(10)
            .merged_at(reference_time() + TimeDelta::minutes(5))
            .build(),
        SnapshotBuilder::new(11).closed_at(reference_time()).build(),
    ];
    let previous = Version::from(&SnapshotBuilder::new(12).build());

    let versions = resolve(&candidates, Some(&previous));

    assert_eq!(numbers(&versions), vec![1, 11, 10]);
}

#[rstest]
fn output_is_monotonic_and_idempotent() {
    let candidates = snapshots(&[7, 3, 9, 1, 4]);
    let previous = Version::from(&SnapshotBuilder::new(12).build());

    let first = resolve(&candidates, Some(&previous));
    let second = resolve(&candidates, Some(&previous));

    assert_eq!(first, second);
    assert!(
        first
            .windows(2)
            .all(|pair| matches!(pair, [earlier, later] if earlier.committed <= later.committed))
    );
}

#[rstest]
#[case::older(3, 1, Ordering::Less)]
#[case::newer(1, 3, Ordering::Greater)]
#[case::same(2, 2, Ordering::Equal)]
fn comparator_uses_effective_date(
    #[case] left: u64,
    #[case] right: u64,
    #[case] expected: Ordering,
) {
    let left_snapshot = SnapshotBuilder::new(left).build();
    let right_snapshot = SnapshotBuilder::new(right).build();

    assert_eq!(by_effective_date(&left_snapshot, &right_snapshot), expected);
}
