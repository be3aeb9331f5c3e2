// crates/sunscan-core/tests/timestamp_unit.rs
// ============================================================================
// Module: Timestamp Unit Tests
// Description: Tests for ISO-8601 parsing, ordering, and wire round-trips.
// Purpose: Pin the offset-less timestamp format the server emits.
// Dependencies: sunscan-core, serde_json
// ============================================================================

//! ## Overview
//! The server serializes creation times with Python's `isoformat()`, which
//! omits the UTC offset and may or may not carry fractional seconds. These
//! tests pin both shapes, the comparison semantics, and the guarantee that
//! serialization re-emits the exact wire string.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

use sunscan_core::Timestamp;
use sunscan_core::TimestampError;

#[test]
fn parses_offsetless_timestamp() {
    let ts = Timestamp::parse("2024-01-15T10:30:00").unwrap();
    assert_eq!(ts.as_str(), "2024-01-15T10:30:00");
}

#[test]
fn parses_fractional_seconds() {
    let ts = Timestamp::parse("2024-01-15T10:30:00.123456").unwrap();
    assert_eq!(ts.instant().microsecond(), 123_456);
}

#[test]
fn rejects_empty_input() {
    assert!(matches!(Timestamp::parse(""), Err(TimestampError::Empty)));
}

#[test]
fn rejects_oversized_input() {
    let oversized = "2".repeat(65);
    assert!(matches!(Timestamp::parse(&oversized), Err(TimestampError::TooLong { .. })));
}

#[test]
fn rejects_non_timestamp_text() {
    assert!(matches!(Timestamp::parse("not-a-time"), Err(TimestampError::Invalid(_))));
}

#[test]
fn ordering_follows_the_parsed_instant() {
    let earlier = Timestamp::parse("2024-01-15T10:30:00").unwrap();
    let later = Timestamp::parse("2024-01-15T10:30:01").unwrap();
    assert!(earlier < later);
}

#[test]
fn equality_ignores_formatting_differences() {
    let plain = Timestamp::parse("2024-01-15T10:30:00").unwrap();
    let fractional = Timestamp::parse("2024-01-15T10:30:00.000000").unwrap();
    assert_eq!(plain, fractional);
}

#[test]
fn serialization_round_trips_the_wire_string() {
    let raw = "\"2024-01-15T10:30:00.123456\"";
    let ts: Timestamp = serde_json::from_str(raw).unwrap();
    assert_eq!(serde_json::to_string(&ts).unwrap(), raw);
}

#[test]
fn deserialization_rejects_invalid_strings() {
    let result: Result<Timestamp, _> = serde_json::from_str("\"yesterday\"");
    assert!(result.is_err());
}
