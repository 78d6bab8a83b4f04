//! Page/limit pagination primitives shared by listing endpoints.
//!
//! Listing endpoints accept an optional one-based `page` and an optional
//! `limit`. [`PageRequest`] validates both, applies defaults, and exposes the
//! row offset the persistence layer needs. [`Paginated`] is the response
//! envelope carrying the page of rows alongside a [`PageMeta`] summary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page number used when the caller omits `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the caller omits `limit`.
pub const DEFAULT_LIMIT: u32 = 20;
/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Validation failures raised while building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are one-based; zero is rejected.
    #[error("page must be at least 1")]
    ZeroPage,
    /// The requested limit was zero or above [`MAX_LIMIT`].
    #[error("limit must be between 1 and {max}, got {value}")]
    LimitOutOfRange {
        /// Limit supplied by the caller.
        value: u32,
        /// Upper bound enforced by the endpoint.
        max: u32,
    },
}

/// A validated page/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a request from optional caller input, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `page` is zero or `limit` falls
    /// outside `1..=MAX_LIMIT`.
    pub const fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, PageRequestError> {
        let page = match page {
            Some(value) => value,
            None => DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(value) => value,
            None => DEFAULT_LIMIT,
        };
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PageRequestError::LimitOutOfRange {
                value: limit,
                max: MAX_LIMIT,
            });
        }
        Ok(Self { page, limit })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of rows on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before the first row of this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Summary metadata describing a returned page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// One-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// Total number of rows matching the query, across all pages.
    pub total: u64,
}

impl PageMeta {
    /// Describe a page served for `request` out of `total` matching rows.
    #[must_use]
    pub const fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
        }
    }
}

/// Response envelope for a page of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Rows on this page, in query order.
    pub data: Vec<T>,
    /// Page summary.
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Wrap `data` with metadata for `request` and `total`.
    #[must_use]
    pub const fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            data,
            meta: PageMeta::new(request, total),
        }
    }

    /// Transform every row while keeping the metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
