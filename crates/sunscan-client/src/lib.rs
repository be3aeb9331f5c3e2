// crates/sunscan-client/src/lib.rs
// ============================================================================
// Module: Sunscan Client Library
// Description: Public API surface for the analysis-history HTTP client.
// Purpose: Expose the typed client, its configuration, and the error taxonomy.
// Dependencies: crate::client
// ============================================================================

//! ## Overview
//! This crate implements the authenticated history-retrieval contract as an
//! async HTTP client: login for a bearer token, paged history listings, and
//! single-record detail fetches, plus the account and model endpoints the
//! same server exposes. All responses are validated against the domain
//! invariants in `sunscan-core` before they reach callers.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::ApiClient;
pub use client::ApiClientConfig;
pub use client::ApiError;
pub use client::DEFAULT_BASE_URL;
pub use client::DEFAULT_MAX_RESPONSE_BYTES;
pub use client::DEFAULT_TIMEOUT_MS;
pub use client::Session;
