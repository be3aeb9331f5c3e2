// crates/sunscan-contract/src/types.rs
// ============================================================================
// Module: Contract Types
// Description: Exact serde shapes for every analysis-history API payload.
// Purpose: Replace dynamic JSON field access with typed request and response records.
// Dependencies: serde, sunscan-core
// ============================================================================

//! ## Overview
//! This module mirrors the server's JSON payloads field for field. Response
//! shapes are untrusted input: numeric identifiers arrive as raw integers,
//! timestamps as strings, and nullable fields as `Option`. Validation happens
//! in [`crate::convert`], which lifts these shapes into `sunscan-core`
//! domain types. Request shapes are constructed from already-validated
//! domain values, so their fields hold plain strings ready to serialize.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use sunscan_core::AccountAge;
use sunscan_core::EmailAddress;
use sunscan_core::Password;
use sunscan_core::Username;

// ============================================================================
// SECTION: Error Body
// ============================================================================

/// Error payload returned with non-success statuses.
///
/// # Invariants
/// - `error` is untrusted server text and may be shown to users verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message from the server.
    pub error: String,
}

// ============================================================================
// SECTION: Request Shapes
// ============================================================================

/// Request body for the login endpoint.
///
/// # Invariants
/// - Built from validated domain credentials; `Debug` redacts the password.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    /// Normalized account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl LoginRequest {
    /// Builds a login request from validated credentials.
    #[must_use]
    pub fn new(email: &EmailAddress, password: &Password) -> Self {
        Self {
            email: email.as_str().to_string(),
            password: password.expose().to_string(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Request body for the registration endpoint.
///
/// # Invariants
/// - Built from validated domain values; `Debug` redacts the password.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    /// Requested username.
    pub username: String,
    /// Normalized account email.
    pub email: String,
    /// Account password meeting the registration policy.
    pub password: String,
    /// Account age in years.
    pub age: u32,
}

impl RegisterRequest {
    /// Builds a registration request from validated values.
    #[must_use]
    pub fn new(
        username: &Username,
        email: &EmailAddress,
        password: &Password,
        age: AccountAge,
    ) -> Self {
        Self {
            username: username.as_str().to_string(),
            email: email.as_str().to_string(),
            password: password.expose().to_string(),
            age: age.get(),
        }
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("age", &self.age)
            .finish()
    }
}

/// Request body for the profile update endpoint.
///
/// # Invariants
/// - Absent fields are omitted from the body, leaving them unchanged.
/// - `Debug` redacts the password when present.
#[derive(Clone, Default, Serialize)]
pub struct ProfileUpdateRequest {
    /// New username, when changing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New age, when changing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// New password, when changing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProfileUpdateRequest {
    /// Reports whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none() && self.age.is_none() && self.password.is_none()
    }
}

impl fmt::Debug for ProfileUpdateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileUpdateRequest")
            .field("username", &self.username)
            .field("age", &self.age)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ============================================================================
// SECTION: Account Payloads
// ============================================================================

/// User account payload shared by registration, login, and profile responses.
///
/// # Invariants
/// - Values are untrusted until lifted through [`crate::convert`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    /// Server-assigned user identifier.
    pub id: u64,
    /// Account username.
    pub username: String,
    /// Account email.
    pub email: String,
    /// Account age in years.
    pub age: u32,
    /// Account creation time (ISO-8601, may be null).
    pub created_at: Option<String>,
    /// Last account update time (ISO-8601, may be null).
    pub updated_at: Option<String>,
}

/// Response body for the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginEnvelope {
    /// Status message from the server.
    pub message: String,
    /// Bearer token for subsequent authenticated calls.
    pub access_token: String,
    /// Account record for the authenticated user.
    pub user: UserPayload,
}

/// Response body for the registration endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterEnvelope {
    /// Status message from the server.
    pub message: String,
    /// Account record for the newly created user.
    pub user: UserPayload,
}

/// Response body for the profile fetch endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEnvelope {
    /// Status marker (`success` on this path).
    pub status: String,
    /// Requested account record.
    pub user: UserPayload,
}

/// Response body for the profile update endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdateEnvelope {
    /// Status message from the server.
    pub message: String,
    /// Account record after the update.
    pub user: UserPayload,
}

/// Response body for endpoints that return only a status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// Status message from the server.
    pub message: String,
}

/// Response body for the user listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsersEnvelope {
    /// Status marker (`success` on this path).
    pub status: String,
    /// All account records known to the server.
    pub users: Vec<UserPayload>,
    /// Number of accounts in `users`.
    pub total: u64,
}

// ============================================================================
// SECTION: Analysis Payloads
// ============================================================================

/// Image metadata nested inside an analysis payload.
///
/// # Invariants
/// - Every field is nullable; older records may lack any of them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageInfoPayload {
    /// Original upload filename.
    #[serde(default)]
    pub filename: Option<String>,
    /// Image dimensions string (for example, `512x512`).
    #[serde(default)]
    pub size: Option<String>,
    /// Server-side processing time in seconds.
    #[serde(default)]
    pub processing_time: Option<f64>,
}

/// Hosted image links nested inside an analysis payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageLinksPayload {
    /// Hosted URL of the original image.
    #[serde(default)]
    pub original_image_url: Option<String>,
}

/// Analysis payload shared by history listings and the single-record path.
///
/// # Invariants
/// - `all_predictions` may be empty on listing entries; the single-record
///   path is required to populate it.
/// - Values are untrusted until lifted through [`crate::convert`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPayload {
    /// Server-assigned record identifier.
    pub id: u64,
    /// Owning user identifier.
    pub user_id: u64,
    /// Predicted class label.
    pub predicted_class: String,
    /// Confidence for the predicted class.
    pub confidence: f64,
    /// Per-class prediction scores; empty when the server trims them.
    #[serde(default)]
    pub all_predictions: BTreeMap<String, f64>,
    /// Metadata about the originating image.
    #[serde(default)]
    pub image_info: ImageInfoPayload,
    /// Hosted image links.
    #[serde(default)]
    pub images: ImageLinksPayload,
    /// Server-assigned creation time (ISO-8601).
    pub created_at: String,
}

/// Pagination metadata reported alongside a history listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationPayload {
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

/// Response body for the history listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEnvelope {
    /// Status marker (`success` on this path).
    pub status: String,
    /// Records on this page, most recent first.
    pub history: Vec<AnalysisPayload>,
    /// Pagination metadata for the listing.
    pub pagination: PaginationPayload,
}

/// Response body for the single-record endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisEnvelope {
    /// Status marker (`success` on this path).
    pub status: String,
    /// Full analysis record including the prediction breakdown.
    pub analysis: AnalysisPayload,
}

// ============================================================================
// SECTION: Model Payloads
// ============================================================================

/// Response body for the model metadata endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfoPayload {
    /// Model display name.
    pub model_name: String,
    /// Model artifact filename.
    pub model_file: String,
    /// Class labels the model emits.
    pub classes: Vec<String>,
    /// Expected input dimensions (for example, `512x512`).
    pub input_size: String,
    /// Model description for clients.
    pub description: String,
}

/// Response body for the model health endpoint.
///
/// # Invariants
/// - `status` is `healthy` or `error`; the optional fields differ per status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelHealthPayload {
    /// Health status marker.
    pub status: String,
    /// Whether the model artifact is loaded.
    pub model_loaded: bool,
    /// Human-readable status message on the healthy path.
    #[serde(default)]
    pub message: Option<String>,
    /// Authenticated user the check ran as.
    #[serde(default)]
    pub user: Option<String>,
    /// Class labels the model emits.
    #[serde(default)]
    pub classes: Option<Vec<String>>,
    /// Server-side model artifact path.
    #[serde(default)]
    pub model_path: Option<String>,
    /// Error description on the unhealthy path.
    #[serde(default)]
    pub error: Option<String>,
}

impl ModelHealthPayload {
    /// Reports whether the server declared itself healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.model_loaded
    }
}
