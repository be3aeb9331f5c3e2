// crates/sunscan-core/src/analysis.rs
// ============================================================================
// Module: Sunscan Analysis Model
// Description: Domain types for stored image-analysis results.
// Purpose: Enforce confidence bounds, breakdown consistency, and the detail superset invariant.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! An analysis record is one stored prediction result tied to one uploaded
//! image. History listings return summaries; the single-record path returns
//! a superset of the same fields, adding the full per-class prediction
//! breakdown. This module defines both shapes and the checks that bind them:
//! confidence values lie in `[0, 1]`, the predicted class carries the top
//! breakdown score, and a detail must agree with the listing entry it
//! extends field by field.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::identifiers::AnalysisId;
use crate::identifiers::UserId;
use crate::time::Timestamp;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted class label length (matches the server's column width).
pub const MAX_CLASS_LABEL_LENGTH: usize = 50;
/// Maximum accepted image filename length (matches the server's column width).
pub const MAX_FILENAME_LENGTH: usize = 255;
/// Maximum accepted image dimension string length.
pub const MAX_DIMENSIONS_LENGTH: usize = 50;
/// Tolerance when comparing two confidence values for equality.
pub const CONFIDENCE_EPSILON: f64 = 1e-6;
/// Tolerance when checking that a breakdown sums to a probability of one.
pub const DISTRIBUTION_EPSILON: f64 = 1e-3;

/// Class labels the bundled model is known to emit.
///
/// # Invariants
/// - Informational only: the label set is open and unknown labels are valid.
pub const KNOWN_CLASS_LABELS: &[&str] = &["DownyMildew", "Fresh Leaf", "GrayMold", "Leaf scars"];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Analysis validation errors.
///
/// # Invariants
/// - Variants are stable for error mapping and tests.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A class label was empty.
    #[error("class label is empty")]
    EmptyClassLabel,
    /// A class label exceeds the accepted length.
    #[error("class label exceeds {limit} characters")]
    ClassLabelTooLong {
        /// Maximum accepted length.
        limit: usize,
    },
    /// A confidence value was NaN or infinite.
    #[error("confidence is not a finite number")]
    NonFiniteConfidence,
    /// A confidence value fell outside `[0, 1]`.
    #[error("confidence {value} is outside [0, 1]")]
    ConfidenceOutOfRange {
        /// Rejected value.
        value: f64,
    },
    /// An image filename exceeds the accepted length.
    #[error("image filename exceeds {limit} characters")]
    FilenameTooLong {
        /// Maximum accepted length.
        limit: usize,
    },
    /// An image dimension string exceeds the accepted length.
    #[error("image dimensions exceed {limit} characters")]
    DimensionsTooLong {
        /// Maximum accepted length.
        limit: usize,
    },
    /// A processing time was negative or not finite.
    #[error("processing time {value} is not a non-negative finite number")]
    InvalidProcessingTime {
        /// Rejected value.
        value: f64,
    },
    /// A prediction breakdown contained no entries.
    #[error("prediction breakdown is empty")]
    EmptyBreakdown,
    /// The predicted class is missing from the breakdown.
    #[error("predicted class {label} is missing from the breakdown")]
    MissingPredictedClass {
        /// Predicted class label.
        label: String,
    },
    /// The breakdown score for the predicted class disagrees with the
    /// record confidence.
    #[error("breakdown score for {label} disagrees with the record confidence")]
    ConfidenceMismatch {
        /// Predicted class label.
        label: String,
    },
    /// Another class outscores the predicted class in the breakdown.
    #[error("predicted class {label} does not carry the top breakdown score")]
    PredictedNotTop {
        /// Predicted class label.
        label: String,
    },
    /// A detail field disagrees with the listing entry it extends.
    #[error("detail field {field} disagrees with the listed record")]
    DetailMismatch {
        /// Name of the mismatched field.
        field: &'static str,
    },
}

// ============================================================================
// SECTION: Scalar Types
// ============================================================================

/// Predicted class label.
///
/// # Invariants
/// - Non-empty, at most [`MAX_CLASS_LABEL_LENGTH`] characters.
/// - The label set is open; values outside [`KNOWN_CLASS_LABELS`] are valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassLabel(String);

impl ClassLabel {
    /// Parses a class label.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when the label is empty or oversized.
    pub fn parse(value: &str) -> Result<Self, AnalysisError> {
        if value.is_empty() {
            return Err(AnalysisError::EmptyClassLabel);
        }
        if value.len() > MAX_CLASS_LABEL_LENGTH {
            return Err(AnalysisError::ClassLabelTooLong {
                limit: MAX_CLASS_LABEL_LENGTH,
            });
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reports whether the label is one the bundled model is known to emit.
    #[must_use]
    pub fn is_known(&self) -> bool {
        KNOWN_CLASS_LABELS.contains(&self.0.as_str())
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prediction confidence score.
///
/// # Invariants
/// - Finite and within `[0, 1]` when produced by [`Confidence::new`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Validates and wraps a confidence value.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when the value is not finite or falls
    /// outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, AnalysisError> {
        if !value.is_finite() {
            return Err(AnalysisError::NonFiniteConfidence);
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(AnalysisError::ConfidenceOutOfRange {
                value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the raw score (within `[0, 1]`).
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Compares two scores within [`CONFIDENCE_EPSILON`].
    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        (self.0 - other.0).abs() <= CONFIDENCE_EPSILON
    }
}

// ============================================================================
// SECTION: Prediction Breakdown
// ============================================================================

/// Per-class prediction scores for one analysis.
///
/// # Invariants
/// - Entries are keyed by class label in deterministic order.
/// - Every score is a validated [`Confidence`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionBreakdown(BTreeMap<ClassLabel, Confidence>);

impl PredictionBreakdown {
    /// Builds a breakdown from label/score pairs.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyBreakdown`] when no entries are given.
    /// Duplicate labels keep the last score seen.
    pub fn new(
        entries: impl IntoIterator<Item = (ClassLabel, Confidence)>,
    ) -> Result<Self, AnalysisError> {
        let map: BTreeMap<ClassLabel, Confidence> = entries.into_iter().collect();
        if map.is_empty() {
            return Err(AnalysisError::EmptyBreakdown);
        }
        Ok(Self(map))
    }

    /// Returns the score for a label when present.
    #[must_use]
    pub fn score(&self, label: &ClassLabel) -> Option<Confidence> {
        self.0.get(label).copied()
    }

    /// Returns the entry with the highest score.
    #[must_use]
    pub fn top(&self) -> Option<(&ClassLabel, Confidence)> {
        self.0
            .iter()
            .max_by(|left, right| left.1.get().total_cmp(&right.1.get()))
            .map(|(label, score)| (label, *score))
    }

    /// Returns the sum of all scores.
    #[must_use]
    pub fn score_sum(&self) -> f64 {
        self.0.values().map(|score| score.get()).sum()
    }

    /// Reports whether the scores form a probability distribution
    /// (sum within [`DISTRIBUTION_EPSILON`] of one).
    #[must_use]
    pub fn is_probability_distribution(&self) -> bool {
        (self.score_sum() - 1.0).abs() <= DISTRIBUTION_EPSILON
    }

    /// Returns the number of classes in the breakdown.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Reports whether the breakdown has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&ClassLabel, Confidence)> {
        self.0.iter().map(|(label, score)| (label, *score))
    }
}

// ============================================================================
// SECTION: Image Metadata
// ============================================================================

/// Metadata describing the image an analysis originated from.
///
/// # Invariants
/// - All fields are optional; older records may lack any of them.
/// - `processing_time` is non-negative and finite when present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Original upload filename.
    pub filename: Option<String>,
    /// Image dimensions as reported by the server (for example, `512x512`).
    pub dimensions: Option<String>,
    /// Server-side processing time in seconds.
    pub processing_time: Option<f64>,
}

impl ImageInfo {
    /// Validates and builds image metadata.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when a present field is oversized or the
    /// processing time is negative or not finite.
    pub fn new(
        filename: Option<String>,
        dimensions: Option<String>,
        processing_time: Option<f64>,
    ) -> Result<Self, AnalysisError> {
        if let Some(name) = &filename {
            if name.len() > MAX_FILENAME_LENGTH {
                return Err(AnalysisError::FilenameTooLong {
                    limit: MAX_FILENAME_LENGTH,
                });
            }
        }
        if let Some(dims) = &dimensions {
            if dims.len() > MAX_DIMENSIONS_LENGTH {
                return Err(AnalysisError::DimensionsTooLong {
                    limit: MAX_DIMENSIONS_LENGTH,
                });
            }
        }
        if let Some(seconds) = processing_time {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(AnalysisError::InvalidProcessingTime {
                    value: seconds,
                });
            }
        }
        Ok(Self {
            filename,
            dimensions,
            processing_time,
        })
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// One analysis entry as it appears in a history listing.
///
/// # Invariants
/// - `breakdown` is optional: servers may trim it from listings, and the
///   single-record path is the authoritative source for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRecord {
    /// Server-assigned record identifier.
    pub id: AnalysisId,
    /// Owning user identifier.
    pub user: UserId,
    /// Predicted class label.
    pub predicted_class: ClassLabel,
    /// Confidence for the predicted class.
    pub confidence: Confidence,
    /// Metadata about the originating image.
    pub image: ImageInfo,
    /// Hosted URL of the original image when available.
    pub original_image_url: Option<String>,
    /// Server-assigned creation time.
    pub created_at: Timestamp,
    /// Per-class scores when the listing includes them.
    pub breakdown: Option<PredictionBreakdown>,
}

/// Full analysis detail returned by the single-record path.
///
/// # Invariants
/// - Carries every [`AnalysisRecord`] field plus the complete breakdown.
/// - [`AnalysisDetail::verify`] holds for values accepted from the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisDetail {
    /// Server-assigned record identifier.
    pub id: AnalysisId,
    /// Owning user identifier.
    pub user: UserId,
    /// Predicted class label.
    pub predicted_class: ClassLabel,
    /// Confidence for the predicted class.
    pub confidence: Confidence,
    /// Metadata about the originating image.
    pub image: ImageInfo,
    /// Hosted URL of the original image when available.
    pub original_image_url: Option<String>,
    /// Server-assigned creation time.
    pub created_at: Timestamp,
    /// Complete per-class prediction scores.
    pub all_predictions: PredictionBreakdown,
}

impl AnalysisDetail {
    /// Checks internal consistency of the detail.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when the breakdown is missing the predicted
    /// class, disagrees with the record confidence, or scores another class
    /// above the predicted one.
    pub fn verify(&self) -> Result<(), AnalysisError> {
        let Some(score) = self.all_predictions.score(&self.predicted_class) else {
            return Err(AnalysisError::MissingPredictedClass {
                label: self.predicted_class.as_str().to_string(),
            });
        };
        if !score.approx_eq(self.confidence) {
            return Err(AnalysisError::ConfidenceMismatch {
                label: self.predicted_class.as_str().to_string(),
            });
        }
        if let Some((_, top_score)) = self.all_predictions.top() {
            if top_score.get() > score.get() + CONFIDENCE_EPSILON {
                return Err(AnalysisError::PredictedNotTop {
                    label: self.predicted_class.as_str().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Checks that this detail is a field superset of a listed record.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::DetailMismatch`] naming the first field that
    /// disagrees with the listing entry.
    pub fn extends(&self, record: &AnalysisRecord) -> Result<(), AnalysisError> {
        if self.id != record.id {
            return Err(AnalysisError::DetailMismatch {
                field: "id",
            });
        }
        if self.user != record.user {
            return Err(AnalysisError::DetailMismatch {
                field: "user",
            });
        }
        if self.predicted_class != record.predicted_class {
            return Err(AnalysisError::DetailMismatch {
                field: "predicted_class",
            });
        }
        if !self.confidence.approx_eq(record.confidence) {
            return Err(AnalysisError::DetailMismatch {
                field: "confidence",
            });
        }
        if self.image != record.image {
            return Err(AnalysisError::DetailMismatch {
                field: "image",
            });
        }
        if self.original_image_url != record.original_image_url {
            return Err(AnalysisError::DetailMismatch {
                field: "original_image_url",
            });
        }
        if self.created_at != record.created_at {
            return Err(AnalysisError::DetailMismatch {
                field: "created_at",
            });
        }
        if let Some(listed) = &record.breakdown {
            if listed != &self.all_predictions {
                return Err(AnalysisError::DetailMismatch {
                    field: "all_predictions",
                });
            }
        }
        Ok(())
    }
}
