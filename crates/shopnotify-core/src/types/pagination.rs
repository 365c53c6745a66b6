//! Pagination types for list queries.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default page size.
const DEFAULT_PAGE_SIZE: u64 = 20;
/// Maximum page size.
const MAX_PAGE_SIZE: u64 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request, clamping out-of-range values.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Create a page request, rejecting a zero page or page size.
    pub fn try_new(page: u64, page_size: u64) -> Result<Self, AppError> {
        if page == 0 {
            return Err(AppError::validation("page must be at least 1"));
        }
        if page_size == 0 {
            return Err(AppError::validation("page_size must be at least 1"));
        }
        Ok(Self::new(page, page_size))
    }

    /// Calculate the SQL `OFFSET` value.
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) * self.page_size
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Whether a further page exists.
    pub has_more: bool,
}

impl<T> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: u64) -> Self {
        let seen = request.offset() + items.len() as u64;
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_items,
            has_more: seen < total_items,
        }
    }

    /// Total number of pages.
    pub fn total_pages(&self) -> u64 {
        if self.total_items == 0 {
            1
        } else {
            self.total_items.div_ceil(self.page_size)
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}
