// crates/sunscan-core/src/credentials.rs
// ============================================================================
// Module: Sunscan Credentials
// Description: Validated account and session credential types.
// Purpose: Keep secrets out of debug output and enforce field bounds client-side.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Credential values cross the trust boundary in both directions: emails and
//! usernames are sent to the server, tokens come back from it. Construction
//! validates the bounds the server's storage enforces so malformed input
//! fails before a network hop. Secret-bearing types redact their `Debug`
//! output; they must never appear in logs or error strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted email length (matches the server's column width).
pub const MAX_EMAIL_LENGTH: usize = 120;
/// Maximum accepted username length (matches the server's column width).
pub const MAX_USERNAME_LENGTH: usize = 80;
/// Minimum password length enforced at registration.
pub const MIN_REGISTER_PASSWORD_LENGTH: usize = 6;
/// Maximum accepted password length.
pub const MAX_PASSWORD_LENGTH: usize = 255;
/// Maximum accepted bearer token length.
pub const MAX_TOKEN_LENGTH: usize = 8 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Credential validation errors.
///
/// # Invariants
/// - Variants are stable for error mapping and tests.
/// - Messages never include password or token material.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The email was empty after trimming.
    #[error("email is empty")]
    EmptyEmail,
    /// The email exceeds the accepted length.
    #[error("email exceeds {limit} characters")]
    EmailTooLong {
        /// Maximum accepted length.
        limit: usize,
    },
    /// The email lacks a local part or domain around `@`.
    #[error("email is not a plausible address")]
    MalformedEmail,
    /// The username was empty after trimming.
    #[error("username is empty")]
    EmptyUsername,
    /// The username exceeds the accepted length.
    #[error("username exceeds {limit} characters")]
    UsernameTooLong {
        /// Maximum accepted length.
        limit: usize,
    },
    /// The password was empty.
    #[error("password is empty")]
    EmptyPassword,
    /// The password is shorter than the registration policy allows.
    #[error("password must be at least {minimum} characters")]
    PasswordTooShort {
        /// Minimum accepted length.
        minimum: usize,
    },
    /// The password exceeds the accepted length.
    #[error("password exceeds {limit} characters")]
    PasswordTooLong {
        /// Maximum accepted length.
        limit: usize,
    },
    /// The session token was empty.
    #[error("session token is empty")]
    EmptyToken,
    /// The session token exceeds the accepted length.
    #[error("session token exceeds {limit} characters")]
    TokenTooLong {
        /// Maximum accepted length.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Account Fields
// ============================================================================

/// Validated, lowercase-normalized email address.
///
/// # Invariants
/// - Non-empty, at most [`MAX_EMAIL_LENGTH`] characters.
/// - Contains `@` with non-empty text on both sides.
/// - Stored lowercase; the server compares emails case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and normalizes an email address.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] when the input is empty, oversized, or
    /// lacks a plausible `local@domain` shape.
    pub fn parse(value: &str) -> Result<Self, CredentialError> {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(CredentialError::EmptyEmail);
        }
        if normalized.len() > MAX_EMAIL_LENGTH {
            return Err(CredentialError::EmailTooLong {
                limit: MAX_EMAIL_LENGTH,
            });
        }
        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(CredentialError::MalformedEmail);
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(CredentialError::MalformedEmail);
        }
        Ok(Self(normalized))
    }

    /// Returns the normalized address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated account username.
///
/// # Invariants
/// - Non-empty after trimming, at most [`MAX_USERNAME_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Parses a username, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] when the input is empty or oversized.
    pub fn parse(value: &str) -> Result<Self, CredentialError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CredentialError::EmptyUsername);
        }
        if trimmed.len() > MAX_USERNAME_LENGTH {
            return Err(CredentialError::UsernameTooLong {
                limit: MAX_USERNAME_LENGTH,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Secrets
// ============================================================================

/// Account password held in memory for a single request.
///
/// # Invariants
/// - Non-empty, at most [`MAX_PASSWORD_LENGTH`] characters.
/// - `Debug` output never reveals the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Wraps a password value.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] when the input is empty or oversized.
    /// Login accepts any non-empty password; registration additionally
    /// requires [`Password::meets_register_policy`].
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialError> {
        let value = value.into();
        if value.is_empty() {
            return Err(CredentialError::EmptyPassword);
        }
        if value.len() > MAX_PASSWORD_LENGTH {
            return Err(CredentialError::PasswordTooLong {
                limit: MAX_PASSWORD_LENGTH,
            });
        }
        Ok(Self(value))
    }

    /// Checks the registration-time length policy.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::PasswordTooShort`] when the password is
    /// shorter than [`MIN_REGISTER_PASSWORD_LENGTH`].
    pub fn meets_register_policy(&self) -> Result<(), CredentialError> {
        if self.0.len() < MIN_REGISTER_PASSWORD_LENGTH {
            return Err(CredentialError::PasswordTooShort {
                minimum: MIN_REGISTER_PASSWORD_LENGTH,
            });
        }
        Ok(())
    }

    /// Exposes the password for request serialization.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Bearer session token issued by the login endpoint.
///
/// # Invariants
/// - Non-empty, at most [`MAX_TOKEN_LENGTH`] characters.
/// - Opaque: no structure is assumed beyond presentation as a bearer header.
/// - `Debug` output never reveals the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a token received from the server.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] when the token is empty or oversized.
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialError> {
        let value = value.into();
        if value.is_empty() {
            return Err(CredentialError::EmptyToken);
        }
        if value.len() > MAX_TOKEN_LENGTH {
            return Err(CredentialError::TokenTooLong {
                limit: MAX_TOKEN_LENGTH,
            });
        }
        Ok(Self(value))
    }

    /// Exposes the token for header construction.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}
