// crates/sunscan-core/tests/analysis_unit.rs
// ============================================================================
// Module: Analysis Model Unit Tests
// Description: Tests for confidence bounds, breakdowns, and the detail superset rule.
// Purpose: Pin the invariants that bind listing entries to single-record details.
// Dependencies: sunscan-core
// ============================================================================

//! ## Overview
//! Covers the scalar validation boundaries (class labels, confidence), the
//! probability-distribution check on breakdowns, and both directions of the
//! detail consistency checks: internal (`verify`) and against a listing
//! entry (`extends`).

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    reason = "Test-only panic-based assertions are permitted."
)]

mod common;

use sunscan_core::AnalysisError;
use sunscan_core::ClassLabel;
use sunscan_core::Confidence;
use sunscan_core::ImageInfo;
use sunscan_core::PredictionBreakdown;

use crate::common::sample_breakdown;
use crate::common::sample_detail;
use crate::common::sample_record;

// ============================================================================
// SECTION: Scalar Bounds
// ============================================================================

#[test]
fn confidence_accepts_unit_interval_endpoints() {
    assert_eq!(Confidence::new(0.0).unwrap().get(), 0.0);
    assert_eq!(Confidence::new(1.0).unwrap().get(), 1.0);
}

#[test]
fn confidence_rejects_out_of_range_values() {
    assert!(matches!(
        Confidence::new(1.0001),
        Err(AnalysisError::ConfidenceOutOfRange { .. })
    ));
    assert!(matches!(
        Confidence::new(-0.0001),
        Err(AnalysisError::ConfidenceOutOfRange { .. })
    ));
}

#[test]
fn confidence_rejects_non_finite_values() {
    assert!(matches!(Confidence::new(f64::NAN), Err(AnalysisError::NonFiniteConfidence)));
    assert!(matches!(Confidence::new(f64::INFINITY), Err(AnalysisError::NonFiniteConfidence)));
}

#[test]
fn class_label_rejects_empty_and_oversized_values() {
    assert!(matches!(ClassLabel::parse(""), Err(AnalysisError::EmptyClassLabel)));
    let oversized = "x".repeat(51);
    assert!(matches!(
        ClassLabel::parse(&oversized),
        Err(AnalysisError::ClassLabelTooLong { .. })
    ));
}

#[test]
fn class_label_set_is_open() {
    let known = ClassLabel::parse("Fresh Leaf").unwrap();
    let unknown = ClassLabel::parse("RustSpot").unwrap();
    assert!(known.is_known());
    assert!(!unknown.is_known());
}

#[test]
fn image_info_rejects_negative_processing_time() {
    let result = ImageInfo::new(None, None, Some(-0.5));
    assert!(matches!(result, Err(AnalysisError::InvalidProcessingTime { .. })));
}

// ============================================================================
// SECTION: Breakdown Properties
// ============================================================================

#[test]
fn breakdown_rejects_empty_input() {
    assert!(matches!(PredictionBreakdown::new([]), Err(AnalysisError::EmptyBreakdown)));
}

#[test]
fn breakdown_distribution_sums_to_unity() {
    let breakdown = sample_breakdown(0.91);
    assert!(breakdown.is_probability_distribution());
    assert!((breakdown.score_sum() - 1.0).abs() < 1e-9);
}

#[test]
fn breakdown_detects_non_distribution_scores() {
    let breakdown = PredictionBreakdown::new([
        (ClassLabel::parse("DownyMildew").unwrap(), Confidence::new(0.9).unwrap()),
        (ClassLabel::parse("GrayMold").unwrap(), Confidence::new(0.9).unwrap()),
    ])
    .unwrap();
    assert!(!breakdown.is_probability_distribution());
}

#[test]
fn breakdown_top_returns_highest_score() {
    let breakdown = sample_breakdown(0.91);
    let (label, score) = breakdown.top().unwrap();
    assert_eq!(label.as_str(), "DownyMildew");
    assert_eq!(score.get(), 0.91);
}

// ============================================================================
// SECTION: Detail Consistency
// ============================================================================

#[test]
fn detail_verify_accepts_consistent_breakdown() {
    let detail = sample_detail(1, "2024-01-15T10:30:00");
    detail.verify().unwrap();
}

#[test]
fn detail_verify_rejects_missing_predicted_class() {
    let mut detail = sample_detail(1, "2024-01-15T10:30:00");
    detail.predicted_class = ClassLabel::parse("RustSpot").unwrap();
    assert!(matches!(detail.verify(), Err(AnalysisError::MissingPredictedClass { .. })));
}

#[test]
fn detail_verify_rejects_confidence_disagreement() {
    let mut detail = sample_detail(1, "2024-01-15T10:30:00");
    detail.confidence = Confidence::new(0.5).unwrap();
    assert!(matches!(detail.verify(), Err(AnalysisError::ConfidenceMismatch { .. })));
}

#[test]
fn detail_verify_rejects_outscored_predicted_class() {
    let mut detail = sample_detail(1, "2024-01-15T10:30:00");
    detail.predicted_class = ClassLabel::parse("GrayMold").unwrap();
    detail.confidence = Confidence::new(0.03).unwrap();
    assert!(matches!(detail.verify(), Err(AnalysisError::PredictedNotTop { .. })));
}

#[test]
fn detail_extends_matching_record() {
    let record = sample_record(3, "2024-01-15T10:30:00");
    let detail = sample_detail(3, "2024-01-15T10:30:00");
    detail.extends(&record).unwrap();
}

#[test]
fn detail_extends_rejects_identifier_mismatch() {
    let record = sample_record(3, "2024-01-15T10:30:00");
    let detail = sample_detail(4, "2024-01-15T10:30:00");
    assert!(matches!(
        detail.extends(&record),
        Err(AnalysisError::DetailMismatch { field: "id" })
    ));
}

#[test]
fn detail_extends_rejects_changed_creation_time() {
    let record = sample_record(3, "2024-01-15T10:30:00");
    let detail = sample_detail(3, "2024-01-15T10:31:00");
    assert!(matches!(
        detail.extends(&record),
        Err(AnalysisError::DetailMismatch { field: "created_at" })
    ));
}

#[test]
fn detail_extends_rejects_breakdown_disagreement_with_listing() {
    let mut record = sample_record(3, "2024-01-15T10:30:00");
    record.breakdown = Some(sample_breakdown(0.55));
    let detail = sample_detail(3, "2024-01-15T10:30:00");
    assert!(matches!(
        detail.extends(&record),
        Err(AnalysisError::DetailMismatch { field: "all_predictions" })
    ));
}
