// crates/sunscan-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Unit Tests
// Description: Tests for CLI argument parsing and resolution helpers.
// Purpose: Pin locale resolution, token sourcing, and display formatting.
// Dependencies: clap, sunscan-core, tempfile
// ============================================================================

//! ## Overview
//! Unit coverage for the pure helpers in the CLI binary: locale resolution
//! precedence, bearer-token sourcing from flags and files, identifier
//! parsing, confidence formatting, and the clap command tree itself.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::io::Write;

use clap::Parser;
use sunscan_core::Confidence;

use crate::Cli;
use crate::Commands;
use crate::LangArg;
use crate::TokenArgs;
use crate::format_confidence;
use crate::parse_analysis_id;
use crate::parse_user_id;
use crate::read_token_file;
use crate::resolve_locale;
use crate::resolve_token;
use sunscan_cli::i18n::Locale;

// ============================================================================
// SECTION: Locale Resolution
// ============================================================================

#[test]
fn locale_flag_overrides_environment() {
    let locale = resolve_locale(Some(LangArg::Ca), Some("en")).unwrap();
    assert_eq!(locale, Locale::Ca);
}

#[test]
fn locale_defaults_to_english_without_inputs() {
    let locale = resolve_locale(None, None).unwrap();
    assert_eq!(locale, Locale::En);
}

#[test]
fn locale_env_values_parse_with_region_tags() {
    let locale = resolve_locale(None, Some("ca_ES")).unwrap();
    assert_eq!(locale, Locale::Ca);
}

#[test]
fn invalid_locale_env_is_an_error() {
    assert!(resolve_locale(None, Some("klingon")).is_err());
}

// ============================================================================
// SECTION: Token Sources
// ============================================================================

#[test]
fn token_flag_wins_over_file() {
    let args = TokenArgs {
        token: Some("flag-token".to_string()),
        token_file: None,
    };
    let token = resolve_token(&args).unwrap();
    assert_eq!(token.expose(), "flag-token");
}

#[test]
fn token_file_contents_are_trimmed() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"  file-token\n").unwrap();
    let token = read_token_file(file.path()).unwrap();
    assert_eq!(token.expose(), "file-token");
}

#[test]
fn empty_token_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"\n").unwrap();
    assert!(read_token_file(file.path()).is_err());
}

#[test]
fn missing_token_file_is_an_error() {
    let args = TokenArgs {
        token: None,
        token_file: Some("/nonexistent/token".into()),
    };
    assert!(resolve_token(&args).is_err());
}

#[test]
fn oversized_token_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let oversized = vec![b'a'; 64 * 1024 + 1];
    file.write_all(&oversized).unwrap();
    assert!(read_token_file(file.path()).is_err());
}

// ============================================================================
// SECTION: Identifier Parsing
// ============================================================================

#[test]
fn zero_identifiers_are_rejected() {
    assert!(parse_user_id(0).is_err());
    assert!(parse_analysis_id(0).is_err());
}

#[test]
fn positive_identifiers_parse() {
    assert_eq!(parse_user_id(7).unwrap().get(), 7);
    assert_eq!(parse_analysis_id(12).unwrap().get(), 12);
}

// ============================================================================
// SECTION: Formatting
// ============================================================================

#[test]
fn confidence_formats_as_percentage() {
    let confidence = Confidence::new(0.9153).unwrap();
    assert_eq!(format_confidence(confidence), "91.53%");
}

#[test]
fn full_confidence_formats_as_hundred_percent() {
    let confidence = Confidence::new(1.0).unwrap();
    assert_eq!(format_confidence(confidence), "100.00%");
}

// ============================================================================
// SECTION: Command Tree
// ============================================================================

#[test]
fn history_list_parses_page_arguments() {
    let cli = Cli::try_parse_from([
        "sunscan",
        "history",
        "list",
        "--token",
        "abc",
        "--page",
        "2",
        "--per-page",
        "25",
    ])
    .unwrap();
    let Some(Commands::History {
        command: crate::HistoryCommand::List(list),
    }) = cli.command
    else {
        panic!("expected history list command");
    };
    assert_eq!(list.page, 2);
    assert_eq!(list.per_page, 25);
}

#[test]
fn token_flag_conflicts_with_token_file() {
    let result = Cli::try_parse_from([
        "sunscan",
        "history",
        "list",
        "--token",
        "abc",
        "--token-file",
        "/tmp/token",
    ]);
    assert!(result.is_err());
}

#[test]
fn smoke_accepts_email_override() {
    let cli = Cli::try_parse_from(["sunscan", "smoke", "--email", "grower@example.com"]).unwrap();
    let Some(Commands::Smoke(smoke)) = cli.command else {
        panic!("expected smoke command");
    };
    assert_eq!(smoke.email.as_deref(), Some("grower@example.com"));
}

#[test]
fn version_flag_parses_without_subcommand() {
    let cli = Cli::try_parse_from(["sunscan", "--version"]).unwrap();
    assert!(cli.show_version);
    assert!(cli.command.is_none());
}
