// crates/sunscan-core/src/account.rs
// ============================================================================
// Module: Sunscan Accounts
// Description: Domain shape for server-managed user accounts.
// Purpose: Provide the validated account record shared by auth and profile flows.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The server returns the same account payload from registration, login, and
//! the profile endpoints. This module holds the validated domain form of that
//! payload plus the age bounds checked before a registration request leaves
//! the client.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::credentials::EmailAddress;
use crate::credentials::Username;
use crate::identifiers::UserId;
use crate::time::Timestamp;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Minimum accepted account age.
pub const MIN_ACCOUNT_AGE: u32 = 1;
/// Maximum accepted account age.
pub const MAX_ACCOUNT_AGE: u32 = 150;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Account validation errors.
///
/// # Invariants
/// - Variants are stable for error mapping and tests.
#[derive(Debug, Error)]
pub enum AccountError {
    /// The age fell outside the accepted range.
    #[error("age {value} is outside {minimum}..={maximum}")]
    AgeOutOfRange {
        /// Rejected value.
        value: u32,
        /// Minimum accepted age.
        minimum: u32,
        /// Maximum accepted age.
        maximum: u32,
    },
}

// ============================================================================
// SECTION: Account Types
// ============================================================================

/// Account age in years.
///
/// # Invariants
/// - Within [`MIN_ACCOUNT_AGE`]..=[`MAX_ACCOUNT_AGE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AccountAge(u32);

impl AccountAge {
    /// Validates and wraps an age value.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::AgeOutOfRange`] when the value falls outside
    /// the accepted range.
    pub const fn new(value: u32) -> Result<Self, AccountError> {
        if value < MIN_ACCOUNT_AGE || value > MAX_ACCOUNT_AGE {
            return Err(AccountError::AgeOutOfRange {
                value,
                minimum: MIN_ACCOUNT_AGE,
                maximum: MAX_ACCOUNT_AGE,
            });
        }
        Ok(Self(value))
    }

    /// Returns the raw age value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Server-managed user account record.
///
/// # Invariants
/// - Field bounds were validated during wire conversion.
/// - `updated_at` is absent only for payloads from servers that omit it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserAccount {
    /// Server-assigned user identifier.
    pub id: UserId,
    /// Account username.
    pub username: Username,
    /// Normalized account email.
    pub email: EmailAddress,
    /// Account age in years.
    pub age: AccountAge,
    /// Account creation time.
    pub created_at: Option<Timestamp>,
    /// Last account update time.
    pub updated_at: Option<Timestamp>,
}
