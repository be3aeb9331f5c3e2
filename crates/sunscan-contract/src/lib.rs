// crates/sunscan-contract/src/lib.rs
// ============================================================================
// Module: Sunscan Contract Library
// Description: Public API surface for the analysis-history wire contract.
// Purpose: Expose typed request/response shapes and their domain conversions.
// Dependencies: crate::{convert, types}
// ============================================================================

//! ## Overview
//! This crate pins the JSON contract between Sunscan and the analysis
//! server: one serde type per payload, nullable fields as `Option`, and
//! fallible conversions into `sunscan-core` domain types. The client crate
//! is the only intended consumer, but the shapes are public so tests and
//! tooling can build fixtures from the same source of truth.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod convert;
pub mod types;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use convert::ConvertError;
pub use types::AnalysisEnvelope;
pub use types::AnalysisPayload;
pub use types::ErrorBody;
pub use types::HistoryEnvelope;
pub use types::ImageInfoPayload;
pub use types::ImageLinksPayload;
pub use types::LoginEnvelope;
pub use types::LoginRequest;
pub use types::MessageEnvelope;
pub use types::ModelHealthPayload;
pub use types::ModelInfoPayload;
pub use types::PaginationPayload;
pub use types::ProfileEnvelope;
pub use types::ProfileUpdateEnvelope;
pub use types::ProfileUpdateRequest;
pub use types::RegisterEnvelope;
pub use types::RegisterRequest;
pub use types::UserPayload;
pub use types::UsersEnvelope;
