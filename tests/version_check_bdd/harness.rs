//! Mock GitHub responses for the version check BDD tests.
//!
//! Pull request `n` has head commit `sha{n}`, committed `n` days before the
//! 20th of May 2024, so lower numbers are newer.

use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PULLS_PATH: &str = "/api/v3/repos/owner/repo/pulls";

/// Tip commit date of pull request `number` in RFC 3339 form.
pub(crate) fn committed_at(number: u64) -> String {
    let day = 20_u64.saturating_sub(number);
    format!("2024-05-{day:02}T12:00:00Z")
}

fn pull_json(number: u64) -> Value {
    json!({
        "number": number,
        "title": format!("Change {number}"),
        "state": "open",
        "draft": false,
        "closed_at": null,
        "merged_at": null,
        "head": {
            "ref": format!("feature-{number}"),
            "sha": format!("sha{number}"),
            "repo": { "full_name": "owner/repo" }
        },
        "base": { "ref": "main", "sha": "base", "repo": { "full_name": "owner/repo" } },
        "labels": []
    })
}

/// Serves `count` open pull requests, newest first, with their commits and
/// an empty review list. Pull requests without scripted changed files
/// report none.
pub(crate) async fn mount_open_pull_requests(server: &MockServer, count: u64) {
    let pulls: Vec<Value> = (1..=count).map(pull_json).collect();
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(pulls))
        .mount(server)
        .await;

    for number in 1..=count {
        Mock::given(method("GET"))
            .and(path(format!("/api/v3/repos/owner/repo/commits/sha{number}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sha": format!("sha{number}"),
                "commit": {
                    "message": format!("Change {number}"),
                    "author": { "date": committed_at(number) },
                    "committer": { "date": committed_at(number) }
                }
            })))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v3/repos/owner/repo/pulls/\d+/reviews$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v3/repos/owner/repo/pulls/\d+/files$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(10)
        .mount(server)
        .await;
}

/// Serves `file` as the only change of pull request `number`.
pub(crate) async fn mount_changed_files(server: &MockServer, number: u64, file: &str) {
    Mock::given(method("GET"))
        .and(path(format!("{PULLS_PATH}/{number}/files")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "filename": file }])))
        .with_priority(1)
        .mount(server)
        .await;
}

/// Answers every listing with 401 Bad credentials.
pub(crate) async fn mount_rejected_token(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(PULLS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .with_priority(1)
        .mount(server)
        .await;
}

/// Parses a comma separated list of pull request numbers.
pub(crate) fn parse_numbers(raw: &str) -> Vec<u64> {
    raw.split(',')
        .map(|number| {
            number
                .trim()
                .parse()
                .unwrap_or_else(|error| panic!("invalid pull request number `{number}`: {error}"))
        })
        .collect()
}
