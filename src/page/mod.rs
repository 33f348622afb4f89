//! Paging and ordering options for listing candidate pull requests.
//!
//! The `page` block of the source configuration is normalised into a
//! [`PageConfig`] whose fields always lie within fixed bounds. Out-of-range
//! numbers are clamped with a warning; unknown sort values are rejected.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;


/// Default number of pull requests fetched per check.
pub const DEFAULT_MAX_ITEMS: u32 = 100;
/// Upper bound for the number of pull requests fetched per check.
pub const MAX_ITEMS: u32 = 2000;
/// Default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Upper bound for the page size.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Default number of retries per request.
pub const DEFAULT_MAX_RETRIES: u32 = 4;
/// Upper bound for the number of retries per request.
pub const MAX_RETRIES: u32 = 10;
/// Default delay between pages, in milliseconds.
pub const DEFAULT_DELAY_MS: u32 = 500;
/// Upper bound for the delay between pages, in milliseconds.
pub const MAX_DELAY_MS: u32 = 10_000;

/// Field pull requests are ordered by when listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    /// Most recently updated.
    #[default]
    UpdatedAt,
    /// Creation time.
    CreatedAt,
    /// Number of comments.
    Comments,
}

impl SortField {
    /// Returns the configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpdatedAt => "UPDATED_AT",
            Self::CreatedAt => "CREATED_AT",
            Self::Comments => "COMMENTS",
        }
    }

    /// Returns the REST API `sort` parameter value.
    #[must_use]
    pub const fn api_value(self) -> &'static str {
        match self {
            Self::UpdatedAt => "updated",
            Self::CreatedAt => "created",
            Self::Comments => "popularity",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "" | "UPDATED_AT" => Ok(Self::UpdatedAt),
            "CREATED_AT" => Ok(Self::CreatedAt),
            "COMMENTS" => Ok(Self::Comments),
            _ => Err(ConfigError::InvalidSortField {
                value: value.to_owned(),
            }),
        }
    }
}

/// Listing order direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

impl SortDirection {
    /// Returns the configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Returns the REST API `direction` parameter value.
    #[must_use]
    pub const fn api_value(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ASC" => Ok(Self::Asc),
            "" | "DESC" => Ok(Self::Desc),
            _ => Err(ConfigError::InvalidSortDirection {
                value: value.to_owned(),
            }),
        }
    }
}

/// The `page` block as supplied by the user.
///
/// Zero, negative, and absent values select the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPageConfig {
    /// Items requested per page.
    pub page_size: i64,
    /// Maximum number of pull requests to consider.
    pub max_prs: i64,
    /// One of `UPDATED_AT`, `CREATED_AT`, `COMMENTS`.
    pub sort_field: String,
    /// One of `ASC`, `DESC`.
    pub sort_direction: String,
    /// Retries per request.
    pub max_retries: i64,
    /// Pause between pages, in milliseconds.
    pub delay_between_pages: i64,
}

/// Bounded paging configuration handed to the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConfig {
    max_items: u32,
    page_size: u32,
    max_retries: u32,
    delay_between_pages_ms: u32,
    sort_field: SortField,
    sort_direction: SortDirection,
}

impl PageConfig {
    /// Maximum number of pull requests to consider.
    #[must_use]
    pub const fn max_items(&self) -> u32 {
        self.max_items
    }

    /// Items requested per page; never above [`Self::max_items`].
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Retries per request.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Pause between pages, also used as the retry backoff unit.
    #[must_use]
    pub fn delay_between_pages(&self) -> Duration {
        Duration::from_millis(u64::from(self.delay_between_pages_ms))
    }

    /// Listing order field.
    #[must_use]
    pub const fn sort_field(&self) -> SortField {
        self.sort_field
    }

    /// Listing order direction.
    #[must_use]
    pub const fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            page_size: DEFAULT_PAGE_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            delay_between_pages_ms: DEFAULT_DELAY_MS,
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
        }
    }
}

/// Validates and bounds the user-supplied paging options.
///
/// Each numeric field is clamped independently; the page size is further
/// capped at the item limit. Every clamp is logged as a warning.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSortField`] or
/// [`ConfigError::InvalidSortDirection`] for unknown ordering values.
pub fn normalize(raw: &RawPageConfig) -> Result<PageConfig, ConfigError> {
    let sort_field = raw.sort_field.parse::<SortField>()?;
    let sort_direction = raw.sort_direction.parse::<SortDirection>()?;

    let max_items = bounded("max_prs", raw.max_prs, DEFAULT_MAX_ITEMS, MAX_ITEMS);
    let page_size = bounded("page_size", raw.page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let capped_page_size = if page_size > max_items {
        tracing::warn!(page_size, max_items, "page_size exceeds max_prs, using {max_items}");
        max_items
    } else {
        page_size
    };

    Ok(PageConfig {
        max_items,
        page_size: capped_page_size,
        max_retries: bounded(
            "max_retries",
            raw.max_retries,
            DEFAULT_MAX_RETRIES,
            MAX_RETRIES,
        ),
        delay_between_pages_ms: bounded(
            "delay_between_pages",
            raw.delay_between_pages,
            DEFAULT_DELAY_MS,
            MAX_DELAY_MS,
        ),
        sort_field,
        sort_direction,
    })
}

fn bounded(field: &'static str, value: i64, default: u32, max: u32) -> u32 {
    if value <= 0 {
        return default;
    }
    match u32::try_from(value) {
        Ok(within) if within <= max => within,
        _ => {
            tracing::warn!(field, value, max, "{field} exceeds maximum, using {max}");
            max
        }
    }
}
