// crates/sunscan-core/src/lib.rs
// ============================================================================
// Module: Sunscan Core Library
// Description: Public API surface for the Sunscan domain model.
// Purpose: Expose validated domain types shared by the contract, client, and CLI crates.
// Dependencies: crate::{account, analysis, credentials, history, identifiers, time}
// ============================================================================

//! ## Overview
//! Sunscan core holds the validated domain model for the analysis-history
//! service: identifiers, credentials, analysis records, and paged history
//! listings. Wire parsing lives in `sunscan-contract`; this crate only sees
//! values after they cross that boundary and enforces the invariants that
//! bind them (confidence bounds, ordering, and the detail superset rule).

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod account;
pub mod analysis;
pub mod credentials;
pub mod history;
pub mod identifiers;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use account::AccountAge;
pub use account::AccountError;
pub use account::UserAccount;
pub use analysis::AnalysisDetail;
pub use analysis::AnalysisError;
pub use analysis::AnalysisRecord;
pub use analysis::ClassLabel;
pub use analysis::Confidence;
pub use analysis::ImageInfo;
pub use analysis::KNOWN_CLASS_LABELS;
pub use analysis::PredictionBreakdown;
pub use credentials::CredentialError;
pub use credentials::EmailAddress;
pub use credentials::Password;
pub use credentials::SessionToken;
pub use credentials::Username;
pub use history::HistoryError;
pub use history::HistoryPage;
pub use history::PageInfo;
pub use history::PageRequest;
pub use identifiers::AnalysisId;
pub use identifiers::UserId;
pub use time::Timestamp;
pub use time::TimestampError;
