// crates/sunscan-contract/src/convert.rs
// ============================================================================
// Module: Wire Conversion
// Description: Fallible lifting of wire payloads into domain types.
// Purpose: Concentrate all trust-boundary validation in one place.
// Dependencies: sunscan-contract::types, sunscan-core
// ============================================================================

//! ## Overview
//! Wire payloads deserialize permissively; this module is where their values
//! earn domain invariants. Every conversion is fallible and fails closed:
//! a zero identifier, an out-of-range confidence, or an unparsable timestamp
//! rejects the whole payload rather than degrading it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sunscan_core::AccountAge;
use sunscan_core::AccountError;
use sunscan_core::AnalysisDetail;
use sunscan_core::AnalysisError;
use sunscan_core::AnalysisId;
use sunscan_core::AnalysisRecord;
use sunscan_core::ClassLabel;
use sunscan_core::Confidence;
use sunscan_core::CredentialError;
use sunscan_core::EmailAddress;
use sunscan_core::HistoryPage;
use sunscan_core::ImageInfo;
use sunscan_core::PageInfo;
use sunscan_core::PredictionBreakdown;
use sunscan_core::Timestamp;
use sunscan_core::TimestampError;
use sunscan_core::UserAccount;
use sunscan_core::UserId;
use sunscan_core::Username;
use thiserror::Error;

use crate::types::AnalysisPayload;
use crate::types::HistoryEnvelope;
use crate::types::PaginationPayload;
use crate::types::UserPayload;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Wire-to-domain conversion errors.
///
/// # Invariants
/// - Variants are stable for error mapping and tests.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A user identifier of zero arrived on the wire.
    #[error("user id {value} is not a valid 1-based identifier")]
    InvalidUserId {
        /// Rejected raw value.
        value: u64,
    },
    /// An analysis identifier of zero arrived on the wire.
    #[error("analysis id {value} is not a valid 1-based identifier")]
    InvalidAnalysisId {
        /// Rejected raw value.
        value: u64,
    },
    /// The single-record path returned no prediction breakdown.
    #[error("analysis detail is missing the prediction breakdown")]
    MissingBreakdown,
    /// A credential field failed domain validation.
    #[error(transparent)]
    Credential(#[from] CredentialError),
    /// An account field failed domain validation.
    #[error(transparent)]
    Account(#[from] AccountError),
    /// A timestamp failed to parse.
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
    /// An analysis field failed domain validation.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

// ============================================================================
// SECTION: Account Conversion
// ============================================================================

impl TryFrom<UserPayload> for UserAccount {
    type Error = ConvertError;

    fn try_from(payload: UserPayload) -> Result<Self, Self::Error> {
        let id = UserId::from_raw(payload.id).ok_or(ConvertError::InvalidUserId {
            value: payload.id,
        })?;
        let username = Username::parse(&payload.username)?;
        let email = EmailAddress::parse(&payload.email)?;
        let age = AccountAge::new(payload.age)?;
        let created_at = payload.created_at.as_deref().map(Timestamp::parse).transpose()?;
        let updated_at = payload.updated_at.as_deref().map(Timestamp::parse).transpose()?;
        Ok(Self {
            id,
            username,
            email,
            age,
            created_at,
            updated_at,
        })
    }
}

// ============================================================================
// SECTION: Analysis Conversion
// ============================================================================

impl TryFrom<AnalysisPayload> for AnalysisRecord {
    type Error = ConvertError;

    fn try_from(payload: AnalysisPayload) -> Result<Self, Self::Error> {
        let id = AnalysisId::from_raw(payload.id).ok_or(ConvertError::InvalidAnalysisId {
            value: payload.id,
        })?;
        let user = UserId::from_raw(payload.user_id).ok_or(ConvertError::InvalidUserId {
            value: payload.user_id,
        })?;
        let predicted_class = ClassLabel::parse(&payload.predicted_class)?;
        let confidence = Confidence::new(payload.confidence)?;
        let image = ImageInfo::new(
            payload.image_info.filename,
            payload.image_info.size,
            payload.image_info.processing_time,
        )?;
        let created_at = Timestamp::parse(&payload.created_at)?;
        let breakdown = if payload.all_predictions.is_empty() {
            None
        } else {
            let entries = payload
                .all_predictions
                .into_iter()
                .map(|(label, score)| Ok((ClassLabel::parse(&label)?, Confidence::new(score)?)))
                .collect::<Result<Vec<_>, ConvertError>>()?;
            Some(PredictionBreakdown::new(entries)?)
        };
        Ok(Self {
            id,
            user,
            predicted_class,
            confidence,
            image,
            original_image_url: payload.images.original_image_url,
            created_at,
            breakdown,
        })
    }
}

impl TryFrom<AnalysisPayload> for AnalysisDetail {
    type Error = ConvertError;

    fn try_from(payload: AnalysisPayload) -> Result<Self, Self::Error> {
        let record = AnalysisRecord::try_from(payload)?;
        let all_predictions = record.breakdown.ok_or(ConvertError::MissingBreakdown)?;
        Ok(Self {
            id: record.id,
            user: record.user,
            predicted_class: record.predicted_class,
            confidence: record.confidence,
            image: record.image,
            original_image_url: record.original_image_url,
            created_at: record.created_at,
            all_predictions,
        })
    }
}

// ============================================================================
// SECTION: History Conversion
// ============================================================================

impl From<PaginationPayload> for PageInfo {
    fn from(payload: PaginationPayload) -> Self {
        Self {
            page: payload.page,
            per_page: payload.per_page,
            total: payload.total,
            pages: payload.pages,
            has_next: payload.has_next,
            has_prev: payload.has_prev,
        }
    }
}

impl TryFrom<HistoryEnvelope> for HistoryPage {
    type Error = ConvertError;

    fn try_from(envelope: HistoryEnvelope) -> Result<Self, Self::Error> {
        let records = envelope
            .history
            .into_iter()
            .map(AnalysisRecord::try_from)
            .collect::<Result<Vec<_>, ConvertError>>()?;
        Ok(Self {
            records,
            page_info: envelope.pagination.into(),
        })
    }
}
