//! Repository identity, API base, and access token wrappers.

use url::Url;

use crate::error::ConfigError;

/// Public GitHub REST API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAccessToken`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ConfigError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingAccessToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}

/// Watched repository and the API base used to reach it.
///
/// # Example
///
/// ```
/// use pullwatch::github::RepositoryLocator;
/// use url::Url;
///
/// let api_base = Url::parse("https://api.github.com").expect("valid URL");
/// let locator = RepositoryLocator::new(api_base, "octo/repo").expect("valid repository");
/// assert_eq!(locator.owner(), "octo");
/// assert_eq!(locator.name(), "repo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: String,
    name: String,
}

impl RepositoryLocator {
    /// Parses an `owner/name` repository reference.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRepository`] for a blank value and
    /// [`ConfigError::InvalidRepository`] when it is not exactly two
    /// non-empty segments.
    pub fn new(api_base: Url, repository: &str) -> Result<Self, ConfigError> {
        let trimmed = repository.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingRepository);
        }
        let invalid = || ConfigError::InvalidRepository {
            value: trimmed.to_owned(),
        };
        let (owner, name) = trimmed.split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            api_base,
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }

    /// API base URL requests are sent to.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    fn repository_path(&self) -> String {
        format!("/repos/{}/{}", self.owner, self.name)
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!("{}/pulls", self.repository_path())
    }

    pub(crate) fn pull_files_path(&self, number: u64) -> String {
        format!("{}/pulls/{number}/files", self.repository_path())
    }

    pub(crate) fn pull_reviews_path(&self, number: u64) -> String {
        format!("{}/pulls/{number}/reviews", self.repository_path())
    }

    pub(crate) fn commit_path(&self, sha: &str) -> String {
        format!("{}/commits/{sha}", self.repository_path())
    }

    pub(crate) fn commit_statuses_path(&self, sha: &str) -> String {
        format!("{}/commits/{sha}/statuses", self.repository_path())
    }
}
