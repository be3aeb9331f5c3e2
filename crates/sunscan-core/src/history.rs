// crates/sunscan-core/src/history.rs
// ============================================================================
// Module: Sunscan History Model
// Description: Paged history listings and their consistency invariants.
// Purpose: Validate page requests before sending and received pages after parsing.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! History listings are paged, 1-based, and ordered most-recent-first. The
//! server defaults to ten entries per page and caps pages at fifty. Requests
//! are validated against those bounds before a network hop (fail closed
//! rather than trusting server-side clamping), and received pages are checked
//! for pagination arithmetic and ordering so a misbehaving server surfaces as
//! an explicit error instead of silent misdisplay.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::analysis::AnalysisRecord;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default page number for history requests.
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size for history requests.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Maximum page size accepted by the server.
pub const MAX_PER_PAGE: u32 = 50;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// History validation errors.
///
/// # Invariants
/// - Variants are stable for error mapping and tests.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A page number of zero was requested or reported.
    #[error("page numbers are 1-based; zero is invalid")]
    PageZero,
    /// A page size of zero was requested or reported.
    #[error("page size must be at least one")]
    PerPageZero,
    /// A page size above the server cap was requested or reported.
    #[error("page size {requested} exceeds the server cap of {limit}")]
    PerPageExceedsLimit {
        /// Requested page size.
        requested: u32,
        /// Maximum accepted page size.
        limit: u32,
    },
    /// The declared page count disagrees with `total` and `per_page`.
    #[error("declared page count {declared} disagrees with computed count {expected}")]
    PageCountMismatch {
        /// Page count declared by the server.
        declared: u32,
        /// Page count computed from `total` and `per_page`.
        expected: u64,
    },
    /// The `has_next` flag disagrees with the page arithmetic.
    #[error("has_next flag disagrees with page {page} of {pages}")]
    NextFlagMismatch {
        /// Reported page number.
        page: u32,
        /// Reported page count.
        pages: u32,
    },
    /// The `has_prev` flag disagrees with the page number.
    #[error("has_prev flag disagrees with page {page}")]
    PrevFlagMismatch {
        /// Reported page number.
        page: u32,
    },
    /// More records were returned than the page size allows.
    #[error("page holds {len} records but per_page is {per_page}")]
    OverfilledPage {
        /// Number of records returned.
        len: usize,
        /// Reported page size.
        per_page: u32,
    },
    /// Records were returned for a listing that declares a zero total.
    #[error("page holds records but the declared total is zero")]
    RecordsWithZeroTotal,
    /// Adjacent records are not in most-recent-first order.
    #[error("records are not in most-recent-first order at index {index}")]
    UnorderedRecords {
        /// Index of the first record older than its successor.
        index: usize,
    },
}

// ============================================================================
// SECTION: Page Request
// ============================================================================

/// Validated pagination parameters for a history request.
///
/// # Invariants
/// - `page` >= 1 and 1 <= `per_page` <= [`MAX_PER_PAGE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    /// 1-based page number.
    page: u32,
    /// Entries per page.
    per_page: u32,
}

impl PageRequest {
    /// Validates and builds pagination parameters.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] when either value is zero or the page size
    /// exceeds [`MAX_PER_PAGE`].
    pub const fn new(page: u32, per_page: u32) -> Result<Self, HistoryError> {
        if page == 0 {
            return Err(HistoryError::PageZero);
        }
        if per_page == 0 {
            return Err(HistoryError::PerPageZero);
        }
        if per_page > MAX_PER_PAGE {
            return Err(HistoryError::PerPageExceedsLimit {
                requested: per_page,
                limit: MAX_PER_PAGE,
            });
        }
        Ok(Self {
            page,
            per_page,
        })
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn per_page(self) -> u32 {
        self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

// ============================================================================
// SECTION: Page Metadata
// ============================================================================

/// Pagination metadata reported alongside a history page.
///
/// # Invariants
/// - Produced from untrusted server output; [`PageInfo::verify`] checks the
///   arithmetic before the page is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// 1-based page number this listing covers.
    pub page: u32,
    /// Entries per page used for this listing.
    pub per_page: u32,
    /// Total number of records across all pages.
    pub total: u64,
    /// Total number of pages.
    pub pages: u32,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl PageInfo {
    /// Checks internal pagination arithmetic.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] when bounds are violated or the declared
    /// counts and flags disagree with each other.
    pub fn verify(&self) -> Result<(), HistoryError> {
        if self.page == 0 {
            return Err(HistoryError::PageZero);
        }
        if self.per_page == 0 {
            return Err(HistoryError::PerPageZero);
        }
        if self.per_page > MAX_PER_PAGE {
            return Err(HistoryError::PerPageExceedsLimit {
                requested: self.per_page,
                limit: MAX_PER_PAGE,
            });
        }
        let expected = self.total.div_ceil(u64::from(self.per_page));
        if u64::from(self.pages) != expected {
            return Err(HistoryError::PageCountMismatch {
                declared: self.pages,
                expected,
            });
        }
        let next_expected = self.page < self.pages;
        if self.has_next != next_expected {
            return Err(HistoryError::NextFlagMismatch {
                page: self.page,
                pages: self.pages,
            });
        }
        let prev_expected = self.page > 1;
        if self.has_prev != prev_expected {
            return Err(HistoryError::PrevFlagMismatch {
                page: self.page,
            });
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: History Page
// ============================================================================

/// One page of a user's analysis history.
///
/// # Invariants
/// - [`HistoryPage::verify`] holds for pages accepted from the server.
/// - An empty page with `total == 0` is a valid, non-error outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPage {
    /// Records on this page, most recent first.
    pub records: Vec<AnalysisRecord>,
    /// Pagination metadata for the listing.
    pub page_info: PageInfo,
}

impl HistoryPage {
    /// Checks page-level invariants: metadata arithmetic, record count, and
    /// most-recent-first ordering.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] naming the first violated invariant.
    pub fn verify(&self) -> Result<(), HistoryError> {
        self.page_info.verify()?;
        let len = u64::try_from(self.records.len()).unwrap_or(u64::MAX);
        if len > u64::from(self.page_info.per_page) {
            return Err(HistoryError::OverfilledPage {
                len: self.records.len(),
                per_page: self.page_info.per_page,
            });
        }
        if self.page_info.total == 0 && !self.records.is_empty() {
            return Err(HistoryError::RecordsWithZeroTotal);
        }
        for (index, pair) in self.records.windows(2).enumerate() {
            if pair[0].created_at < pair[1].created_at {
                return Err(HistoryError::UnorderedRecords {
                    index,
                });
            }
        }
        Ok(())
    }

    /// Reports whether the page holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
