// crates/sunscan-core/tests/history_page_unit.rs
// ============================================================================
// Module: History Page Unit Tests
// Description: Tests for page-request bounds and listing consistency checks.
// Purpose: Pin pagination arithmetic, ordering, and the empty-page contract.
// Dependencies: sunscan-core
// ============================================================================

//! ## Overview
//! Covers request-side validation (1-based pages, the server's page-size
//! cap) and response-side verification: declared counts versus arithmetic,
//! next/prev flags, overfilled pages, and most-recent-first ordering. An
//! empty first page with a zero total is a valid non-error outcome and is
//! tested explicitly.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

mod common;

use sunscan_core::HistoryError;
use sunscan_core::HistoryPage;
use sunscan_core::PageRequest;
use sunscan_core::history::DEFAULT_PER_PAGE;
use sunscan_core::history::MAX_PER_PAGE;

use crate::common::sample_page_info;
use crate::common::sample_record;

// ============================================================================
// SECTION: Page Requests
// ============================================================================

#[test]
fn page_request_defaults_match_server_defaults() {
    let request = PageRequest::default();
    assert_eq!(request.page(), 1);
    assert_eq!(request.per_page(), DEFAULT_PER_PAGE);
}

#[test]
fn page_request_rejects_zero_page() {
    assert!(matches!(PageRequest::new(0, 10), Err(HistoryError::PageZero)));
}

#[test]
fn page_request_rejects_zero_per_page() {
    assert!(matches!(PageRequest::new(1, 0), Err(HistoryError::PerPageZero)));
}

#[test]
fn page_request_enforces_server_cap() {
    assert!(PageRequest::new(1, MAX_PER_PAGE).is_ok());
    assert!(matches!(
        PageRequest::new(1, MAX_PER_PAGE + 1),
        Err(HistoryError::PerPageExceedsLimit { .. })
    ));
}

// ============================================================================
// SECTION: Metadata Arithmetic
// ============================================================================

#[test]
fn empty_first_page_with_zero_total_is_valid() {
    let page = HistoryPage {
        records: Vec::new(),
        page_info: sample_page_info(1, 10, 0),
    };
    page.verify().unwrap();
    assert!(page.is_empty());
}

#[test]
fn verify_rejects_declared_page_count_disagreement() {
    let mut info = sample_page_info(1, 10, 25);
    info.pages = 2;
    let page = HistoryPage {
        records: vec![sample_record(1, "2024-01-15T10:30:00")],
        page_info: info,
    };
    assert!(matches!(page.verify(), Err(HistoryError::PageCountMismatch { .. })));
}

#[test]
fn verify_rejects_next_flag_disagreement() {
    let mut info = sample_page_info(1, 10, 25);
    info.has_next = false;
    let page = HistoryPage {
        records: vec![sample_record(1, "2024-01-15T10:30:00")],
        page_info: info,
    };
    assert!(matches!(page.verify(), Err(HistoryError::NextFlagMismatch { .. })));
}

#[test]
fn verify_rejects_prev_flag_disagreement() {
    let mut info = sample_page_info(2, 10, 25);
    info.has_prev = false;
    let page = HistoryPage {
        records: vec![sample_record(1, "2024-01-15T10:30:00")],
        page_info: info,
    };
    assert!(matches!(page.verify(), Err(HistoryError::PrevFlagMismatch { .. })));
}

#[test]
fn verify_rejects_overfilled_page() {
    let records =
        vec![sample_record(2, "2024-01-15T10:31:00"), sample_record(1, "2024-01-15T10:30:00")];
    let page = HistoryPage {
        records,
        page_info: sample_page_info(1, 1, 2),
    };
    assert!(matches!(page.verify(), Err(HistoryError::OverfilledPage { .. })));
}

#[test]
fn verify_rejects_records_alongside_zero_total() {
    let mut info = sample_page_info(1, 10, 0);
    info.total = 0;
    let page = HistoryPage {
        records: vec![sample_record(1, "2024-01-15T10:30:00")],
        page_info: info,
    };
    assert!(matches!(page.verify(), Err(HistoryError::RecordsWithZeroTotal)));
}

// ============================================================================
// SECTION: Ordering
// ============================================================================

#[test]
fn verify_accepts_most_recent_first_ordering() {
    let records = vec![
        sample_record(3, "2024-01-15T10:32:00"),
        sample_record(2, "2024-01-15T10:31:00"),
        sample_record(1, "2024-01-15T10:30:00"),
    ];
    let page = HistoryPage {
        records,
        page_info: sample_page_info(1, 10, 3),
    };
    page.verify().unwrap();
}

#[test]
fn verify_accepts_equal_adjacent_timestamps() {
    let records =
        vec![sample_record(2, "2024-01-15T10:30:00"), sample_record(1, "2024-01-15T10:30:00")];
    let page = HistoryPage {
        records,
        page_info: sample_page_info(1, 10, 2),
    };
    page.verify().unwrap();
}

#[test]
fn verify_rejects_oldest_first_ordering() {
    let records =
        vec![sample_record(1, "2024-01-15T10:30:00"), sample_record(2, "2024-01-15T10:31:00")];
    let page = HistoryPage {
        records,
        page_info: sample_page_info(1, 10, 2),
    };
    assert!(matches!(page.verify(), Err(HistoryError::UnorderedRecords { index: 0 })));
}
