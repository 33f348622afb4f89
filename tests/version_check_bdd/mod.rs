//! Support modules for the version check BDD tests.

pub(crate) mod harness;
#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use harness::{
    mount_changed_files, mount_open_pull_requests, mount_rejected_token, parse_numbers,
};
pub(crate) use state::{CheckState, run_check, server_runtime, update_source};
