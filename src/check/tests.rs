//! Scenario tests for the version check over the reference pull requests.

use rstest::rstest;

use super::VersionCheck;
use crate::error::CheckError;
use crate::github::GatewayError;
use crate::model::{PullRequestSnapshot, Version};
use crate::source::{CheckRequest, SourceConfig, ValidatedRequest};
use crate::test_support::{ScriptedGateway, reference_pull_requests, reference_version};

fn base_source() -> SourceConfig {
    SourceConfig {
        repository: "itsdalmo/test-repository".to_owned(),
        access_token: "oauthtoken".to_owned(),
        ..SourceConfig::default()
    }
}

fn request(source: SourceConfig, previous: Option<u64>) -> ValidatedRequest {
    CheckRequest {
        source,
        version: previous.and_then(reference_version),
    }
    .validate()
    .expect("request should validate")
}

fn versions(numbers: &[u64]) -> Vec<Version> {
    numbers
        .iter()
        .map(|number| reference_version(*number).expect("reference pull request exists"))
        .collect()
}

fn files(lists: &[&[&str]]) -> Vec<Vec<String>> {
    lists
        .iter()
        .map(|list| list.iter().map(|file| (*file).to_owned()).collect())
        .collect()
}

fn numbered(first: u64, last: u64) -> Vec<PullRequestSnapshot> {
    reference_pull_requests()
        .into_iter()
        .filter(|snapshot| (first..=last).contains(&snapshot.number))
        .collect()
}

#[rstest]
#[case::latest_without_previous(base_source(), None, vec![], &[2])]
#[case::previous_still_latest(base_source(), Some(2), vec![], &[2])]
#[case::all_new_since_previous(base_source(), Some(4), vec![], &[3, 2])]
#[case::only_matching_paths(
    SourceConfig {
        paths: vec!["terraform/*/*.tf".to_owned(), "terraform/*/*/*.tf".to_owned()],
        ..base_source()
    },
    Some(4),
    files(&[
        &["README.md", "travis.yml"],
        &["terraform/modules/ecs/main.tf", "README.md"],
        &["terraform/modules/variables.tf", "travis.yml"],
    ]),
    &[3]
)]
#[case::skips_ignored_paths(
    SourceConfig {
        ignore_paths: vec!["*.md".to_owned(), "*.yml".to_owned()],
        ..base_source()
    },
    Some(4),
    files(&[
        &["README.md", "travis.yml"],
        &["terraform/modules/ecs/main.tf", "README.md"],
        &["terraform/modules/variables.tf", "travis.yml"],
    ]),
    &[3]
)]
#[case::ci_skip_disabled(
    SourceConfig { disable_ci_skip: true, ..base_source() },
    Some(2),
    vec![],
    &[1]
)]
#[case::drafts_ignored(
    SourceConfig { ignore_drafts: true, ..base_source() },
    Some(4),
    vec![],
    &[2]
)]
#[case::drafts_kept(
    SourceConfig { ignore_drafts: false, ..base_source() },
    Some(4),
    vec![],
    &[3, 2]
)]
#[case::forks_disabled(
    SourceConfig { disable_forks: true, ..base_source() },
    Some(6),
    vec![],
    &[4, 3, 2]
)]
#[case::base_branch(
    SourceConfig { base_branch: "develop".to_owned(), ..base_source() },
    None,
    vec![],
    &[7]
)]
#[case::required_approvals(
    SourceConfig { required_review_approvals: 1, ..base_source() },
    Some(9),
    vec![],
    &[8]
)]
#[case::labels(
    SourceConfig { labels: vec!["enhancement".to_owned()], ..base_source() },
    None,
    vec![],
    &[7]
)]
#[case::single_state(
    SourceConfig { states: vec!["CLOSED".to_owned()], ..base_source() },
    None,
    vec![],
    &[10]
)]
#[case::multiple_states(
    SourceConfig { states: vec!["CLOSED".to_owned(), "MERGED".to_owned()], ..base_source() },
    Some(12),
    vec![],
    &[10, 11]
)]
#[case::status_context(
    SourceConfig { status_context: "some-status".to_owned(), ..base_source() },
    Some(12),
    vec![],
    &[12, 9, 6, 5, 3]
)]
#[tokio::test]
async fn check_reports_expected_versions(
    #[case] source: SourceConfig,
    #[case] previous: Option<u64>,
    #[case] changed_files: Vec<Vec<String>>,
    #[case] expected: &[u64],
) {
    let gateway = ScriptedGateway::new(reference_pull_requests()).with_changed_files(changed_files);
    let validated = request(source, previous);

    let output = VersionCheck::new(&gateway)
        .run(&validated)
        .await
        .expect("check should succeed");

    assert_eq!(output, versions(expected));
    assert_eq!(gateway.list_calls(), 1);
}

#[rstest]
#[tokio::test]
async fn state_filter_can_leave_nothing() {
    let gateway = ScriptedGateway::new(numbered(10, 11));
    let source = SourceConfig {
        states: vec!["OPEN".to_owned()],
        ..base_source()
    };

    let output = VersionCheck::new(&gateway)
        .run(&request(source, None))
        .await
        .expect("check should succeed");

    assert!(output.is_empty());
    assert_eq!(gateway.list_calls(), 1);
}

#[rstest]
#[tokio::test]
async fn files_are_only_fetched_for_candidates_reaching_path_filters() {
    let gateway = ScriptedGateway::new(reference_pull_requests());
    let source = SourceConfig {
        paths: vec!["src".to_owned()],
        ..base_source()
    };

    let output = VersionCheck::new(&gateway)
        .run(&request(source, Some(4)))
        .await
        .expect("check should succeed");

    assert_eq!(output, versions(&[4]), "nothing new repeats the previous");
    assert_eq!(gateway.file_requests(), vec![2, 3]);
}

#[rstest]
#[tokio::test]
async fn listing_failure_is_wrapped() {
    let gateway = ScriptedGateway::new(reference_pull_requests()).failing_listing(
        GatewayError::Authentication {
            message: "bad credentials".to_owned(),
        },
    );

    let error = VersionCheck::new(&gateway)
        .run(&request(base_source(), None))
        .await
        .expect_err("check should fail");

    assert!(
        matches!(error, CheckError::ListPullRequests { .. }),
        "unexpected error: {error:?}"
    );
    assert_eq!(
        error.to_string(),
        "failed to get last commits: GitHub rejected the token: bad credentials"
    );
    assert!(gateway.file_requests().is_empty());
}

#[rstest]
#[tokio::test]
async fn file_listing_failure_aborts_the_check() {
    let gateway = ScriptedGateway::new(reference_pull_requests()).failing_file_listing(
        GatewayError::Api {
            message: "not found".to_owned(),
        },
    );
    let source = SourceConfig {
        ignore_paths: vec!["*.md".to_owned()],
        ..base_source()
    };

    let error = VersionCheck::new(&gateway)
        .run(&request(source, None))
        .await
        .expect_err("check should fail");

    assert_eq!(
        error,
        CheckError::ListModifiedFiles {
            number: 2,
            source: GatewayError::Api {
                message: "not found".to_owned(),
            },
        }
    );
}
