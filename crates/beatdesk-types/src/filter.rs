//! Filter criteria for collection listings.

use serde::{Deserialize, Serialize};

use crate::{ContentState, ContentType, UserRole, UserStatus};

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum number of records per page.
pub const MAX_PAGE_SIZE: u32 = 100;

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Filters for the catalog listing.
///
/// Serializes to query parameters; empty fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFilters {
    /// Free-text search over title and artist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Restrict to one kind of content.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    /// Restrict to one effective state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ContentState>,
    /// Page number (0-indexed).
    #[serde(default)]
    pub page: u32,
    /// Page size.
    #[serde(default = "default_page_size")]
    pub size: u32,
}

impl Default for CatalogFilters {
    fn default() -> Self {
        Self {
            search: None,
            content_type: None,
            status: None,
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CatalogFilters {
    /// Filters matching a free-text search on the first page.
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Self::default()
        }
    }

    /// Returns a copy pointing at another page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Returns a copy with another page size, clamped to [`MAX_PAGE_SIZE`].
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Normalize parameters to valid ranges.
    ///
    /// Blank search text is dropped so it does not reach the query string.
    pub fn normalize(&mut self) {
        self.size = self.size.clamp(1, MAX_PAGE_SIZE);
        self.search = normalize_search(self.search.take());
    }
}

/// Filters for the user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    /// Free-text search over username, e-mail and display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Restrict to one role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// Restrict to one status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    /// Page number (0-indexed).
    #[serde(default)]
    pub page: u32,
    /// Page size.
    #[serde(default = "default_page_size")]
    pub size: u32,
}

impl Default for UserFilters {
    fn default() -> Self {
        Self {
            search: None,
            role: None,
            status: None,
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl UserFilters {
    /// Filters matching a free-text search on the first page.
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Self::default()
        }
    }

    /// Returns a copy pointing at another page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Returns a copy with another page size, clamped to [`MAX_PAGE_SIZE`].
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Normalize parameters to valid ranges.
    pub fn normalize(&mut self) {
        self.size = self.size.clamp(1, MAX_PAGE_SIZE);
        self.search = normalize_search(self.search.take());
    }
}

fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
