// crates/sunscan-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Helpers
// Description: Shared builders for domain-model tests.
// Purpose: Keep record and page construction consistent across test files.
// Dependencies: sunscan-core
// ============================================================================

//! ## Overview
//! Builders for analysis records, details, and history pages used by the
//! domain invariant tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    dead_code,
    reason = "Test-only helpers; not every test file uses every builder."
)]

use sunscan_core::AnalysisDetail;
use sunscan_core::AnalysisId;
use sunscan_core::AnalysisRecord;
use sunscan_core::ClassLabel;
use sunscan_core::Confidence;
use sunscan_core::ImageInfo;
use sunscan_core::PageInfo;
use sunscan_core::PredictionBreakdown;
use sunscan_core::Timestamp;
use sunscan_core::UserId;

/// Builds a breakdown over the four bundled class labels that peaks at
/// `DownyMildew` with the given score.
pub fn sample_breakdown(peak: f64) -> PredictionBreakdown {
    let remainder = (1.0 - peak) / 3.0;
    PredictionBreakdown::new([
        (ClassLabel::parse("DownyMildew").unwrap(), Confidence::new(peak).unwrap()),
        (ClassLabel::parse("Fresh Leaf").unwrap(), Confidence::new(remainder).unwrap()),
        (ClassLabel::parse("GrayMold").unwrap(), Confidence::new(remainder).unwrap()),
        (ClassLabel::parse("Leaf scars").unwrap(), Confidence::new(remainder).unwrap()),
    ])
    .unwrap()
}

/// Builds a listing record with the given id and creation time.
pub fn sample_record(id: u64, created_at: &str) -> AnalysisRecord {
    AnalysisRecord {
        id: AnalysisId::from_raw(id).unwrap(),
        user: UserId::from_raw(7).unwrap(),
        predicted_class: ClassLabel::parse("DownyMildew").unwrap(),
        confidence: Confidence::new(0.91).unwrap(),
        image: ImageInfo::new(Some("leaf.jpg".to_string()), Some("512x512".to_string()), Some(0.42))
            .unwrap(),
        original_image_url: Some("https://images.example/leaf.jpg".to_string()),
        created_at: Timestamp::parse(created_at).unwrap(),
        breakdown: None,
    }
}

/// Builds the detail counterpart of [`sample_record`] with a full breakdown.
pub fn sample_detail(id: u64, created_at: &str) -> AnalysisDetail {
    let record = sample_record(id, created_at);
    AnalysisDetail {
        id: record.id,
        user: record.user,
        predicted_class: record.predicted_class,
        confidence: record.confidence,
        image: record.image,
        original_image_url: record.original_image_url,
        created_at: record.created_at,
        all_predictions: sample_breakdown(0.91),
    }
}

/// Builds self-consistent pagination metadata for the given shape.
pub fn sample_page_info(page: u32, per_page: u32, total: u64) -> PageInfo {
    let pages = u32::try_from(total.div_ceil(u64::from(per_page))).unwrap();
    PageInfo {
        page,
        per_page,
        total,
        pages,
        has_next: page < pages,
        has_prev: page > 1,
    }
}
