// crates/sunscan-core/src/time.rs
// ============================================================================
// Module: Sunscan Time Model
// Description: ISO-8601 timestamp wrapper for server-assigned record times.
// Purpose: Provide comparable timestamps that preserve the raw wire string.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! The server emits creation times as ISO-8601 strings without a UTC offset
//! (`2024-01-15T10:30:00.123456`). This module wraps those strings in a type
//! that parses once at the trust boundary and stays comparable afterwards,
//! while serialization round-trips the exact string received from the server.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use thiserror::Error;
use time::PrimitiveDateTime;
use time::format_description::well_known::Iso8601;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted length for a timestamp string.
pub const MAX_TIMESTAMP_LENGTH: usize = 64;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Timestamp parsing errors.
///
/// # Invariants
/// - Variants are stable for error mapping and tests.
#[derive(Debug, Error)]
pub enum TimestampError {
    /// The input string was empty.
    #[error("timestamp is empty")]
    Empty,
    /// The input string exceeds the accepted length.
    #[error("timestamp exceeds {limit} characters")]
    TooLong {
        /// Maximum accepted length.
        limit: usize,
    },
    /// The input string is not valid ISO-8601.
    #[error("timestamp is not valid iso-8601: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Server-assigned creation timestamp.
///
/// # Invariants
/// - `raw` is the exact string received on the wire and parses as ISO-8601.
/// - Equality and ordering compare the parsed instant, not the raw string.
#[derive(Debug, Clone)]
pub struct Timestamp {
    /// Raw wire string as received from the server.
    raw: String,
    /// Parsed local date-time used for comparisons.
    instant: PrimitiveDateTime,
}

impl Timestamp {
    /// Parses a timestamp from its wire string.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError`] when the input is empty, oversized, or not
    /// valid ISO-8601.
    pub fn parse(raw: &str) -> Result<Self, TimestampError> {
        if raw.is_empty() {
            return Err(TimestampError::Empty);
        }
        if raw.len() > MAX_TIMESTAMP_LENGTH {
            return Err(TimestampError::TooLong {
                limit: MAX_TIMESTAMP_LENGTH,
            });
        }
        let instant = PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT)
            .map_err(|err| TimestampError::Invalid(err.to_string()))?;
        Ok(Self {
            raw: raw.to_string(),
            instant,
        })
    }

    /// Returns the raw wire string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed instant.
    #[must_use]
    pub const fn instant(&self) -> PrimitiveDateTime {
        self.instant
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
