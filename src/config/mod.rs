//! Process-level options loaded from CLI, environment, and files.
//!
//! The check request itself always arrives as JSON. These options only say
//! where to read it from and how to adjust it before validation. Values are
//! merged with ortho-config's layered approach, lowest to highest:
//!
//! 1. **Defaults**
//! 2. **Configuration file**: `.pullwatch.toml` in the current, home, or XDG
//!    config directory
//! 3. **Environment variables**: `PULLWATCH_REQUEST`, `PULLWATCH_TOKEN`
//! 4. **Command-line arguments**: `--request`/`-r`, `--token`/`-t`,
//!    `--verbose`/`-v`
//!
//! ```toml
//! request = "check-request.json"
//! token = "ghp_example"
//! verbose = true
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::source::CheckRequest;

/// Options for the `pullwatch` binary.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use pullwatch::PullwatchConfig;
///
/// let config = PullwatchConfig::load().expect("failed to load configuration");
/// assert!(config.request.is_none() || config.request.is_some());
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PULLWATCH",
    discovery(
        dotfile_name = ".pullwatch.toml",
        config_file_name = "pullwatch.toml",
        app_name = "pullwatch"
    )
)]
pub struct PullwatchConfig {
    /// File holding the check request; stdin when unset.
    ///
    /// Can be provided via:
    /// - CLI: `--request <PATH>` or `-r <PATH>`
    /// - Environment: `PULLWATCH_REQUEST`
    /// - Config file: `request = "..."`
    #[ortho_config(cli_short = 'r')]
    pub request: Option<String>,

    /// Access token used when the source block does not carry one.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PULLWATCH_TOKEN` or `GITHUB_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Logs filter decisions at info level regardless of the source block.
    ///
    /// Can be provided via:
    /// - CLI: `--verbose` / `-v`
    /// - Config file: `verbose = true`
    #[ortho_config(cli_short = 'v')]
    pub verbose: bool,
}

impl PullwatchConfig {
    /// Resolves the fallback token, consulting `GITHUB_TOKEN` when no other
    /// layer provides one.
    #[must_use]
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .filter(|token| !token.trim().is_empty())
    }

    /// Applies the process-level overrides to a decoded request.
    ///
    /// The fallback token only fills a blank `access_token`; `verbose` can
    /// only switch verbose logging on.
    pub fn apply_to(&self, request: &mut CheckRequest) {
        if request.source.access_token.trim().is_empty()
            && let Some(token) = self.resolve_token()
        {
            request.source.access_token = token;
        }
        if self.verbose {
            request.source.verbose = true;
        }
    }
}
