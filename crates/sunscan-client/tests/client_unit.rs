// crates/sunscan-client/tests/client_unit.rs
// ============================================================================
// Module: API Client Unit Tests
// Description: Behavior tests for the typed client against local HTTP servers.
// Purpose: Pin error classification, invariant enforcement, and wire behavior.
// Dependencies: sunscan-client, sunscan-core, tiny_http, tokio
// ============================================================================

//! ## Overview
//! Each test stands up a scripted `tiny_http` server on a loopback port and
//! drives one client flow against it. Coverage follows the testable
//! properties of the contract: valid login yields a non-empty token, an
//! empty history page is a non-error outcome, foreign record ids map to
//! not-found without leaking fields, unreachable servers classify as
//! connection errors distinct from authentication failures, and malformed,
//! inconsistent, or oversized responses fail closed.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use sunscan_client::ApiClient;
use sunscan_client::ApiClientConfig;
use sunscan_client::ApiError;
use sunscan_core::AnalysisId;
use sunscan_core::EmailAddress;
use sunscan_core::PageRequest;
use sunscan_core::Password;
use sunscan_core::SessionToken;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Request fields captured by the scripted server.
struct RecordedRequest {
    /// HTTP method as text.
    method: String,
    /// Request URL including the query string.
    url: String,
    /// Authorization header value when present.
    authorization: Option<String>,
}

/// Serves the given `(status, json_body)` responses in order on a loopback
/// port, recording each incoming request.
fn serve_script(
    responses: Vec<(u16, String)>,
) -> (String, mpsc::Receiver<RecordedRequest>, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let base_url = format!("http://{addr}");
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        for (status, body) in responses {
            let Ok(request) = server.recv() else {
                return;
            };
            let recorded = RecordedRequest {
                method: request.method().to_string(),
                url: request.url().to_string(),
                authorization: request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("Authorization"))
                    .map(|header| header.value.as_str().to_string()),
            };
            let _ = tx.send(recorded);
            let content_type =
                Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
            let response =
                Response::from_string(body).with_status_code(status).with_header(content_type);
            let _ = request.respond(response);
        }
    });
    (base_url, rx, handle)
}

/// Builds a client against the given base URL with test-friendly limits.
fn test_client(base_url: &str) -> ApiClient {
    ApiClient::new(ApiClientConfig {
        base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        max_response_bytes: 64 * 1024,
    })
    .unwrap()
}

/// Returns a validated bearer token for authenticated calls.
fn test_token() -> SessionToken {
    SessionToken::new("test-token-abc123").unwrap()
}

/// Login envelope body the server under test returns.
fn login_body() -> String {
    r#"{
        "message": "Login successful",
        "access_token": "eyJhbGciOiJIUzI1NiJ9.claims.sig",
        "user": {
            "id": 7,
            "username": "grower",
            "email": "grower@example.com",
            "age": 34,
            "created_at": "2024-01-10T08:00:00",
            "updated_at": null
        }
    }"#
    .to_string()
}

/// History entry JSON with the given id and creation time.
fn history_entry(id: u64, created_at: &str) -> String {
    format!(
        r#"{{
            "id": {id},
            "user_id": 7,
            "predicted_class": "DownyMildew",
            "confidence": 0.91,
            "all_predictions": {{
                "DownyMildew": 0.91,
                "Fresh Leaf": 0.05,
                "GrayMold": 0.03,
                "Leaf scars": 0.01
            }},
            "image_info": {{"filename": "leaf.jpg", "size": "512x512", "processing_time": 0.42}},
            "images": {{"original_image_url": "https://images.example/leaf.jpg"}},
            "created_at": "{created_at}"
        }}"#
    )
}

/// History envelope JSON for the given entries and pagination shape.
fn history_body(entries: &[String], page: u32, per_page: u32, total: u64) -> String {
    let pages = total.div_ceil(u64::from(per_page));
    format!(
        r#"{{
            "status": "success",
            "history": [{entries}],
            "pagination": {{
                "page": {page},
                "per_page": {per_page},
                "total": {total},
                "pages": {pages},
                "has_next": {has_next},
                "has_prev": {has_prev}
            }}
        }}"#,
        entries = entries.join(","),
        has_next = u64::from(page) < pages,
        has_prev = page > 1,
    )
}

// ============================================================================
// SECTION: Authentication
// ============================================================================

#[tokio::test]
async fn login_returns_token_and_account() {
    let (base_url, rx, handle) = serve_script(vec![(200, login_body())]);
    let client = test_client(&base_url);
    let email = EmailAddress::parse("grower@example.com").unwrap();
    let password = Password::new("password123").unwrap();

    let session = client.login(&email, &password).await.unwrap();
    assert!(!session.token.expose().is_empty());
    assert_eq!(session.account.id.get(), 7);

    let recorded = rx.recv().unwrap();
    assert_eq!(recorded.method, "POST");
    assert_eq!(recorded.url, "/login");
    handle.join().unwrap();
}

#[tokio::test]
async fn rejected_credentials_classify_as_auth_error() {
    let body = r#"{"error": "Invalid email or password"}"#.to_string();
    let (base_url, _rx, handle) = serve_script(vec![(401, body)]);
    let client = test_client(&base_url);
    let email = EmailAddress::parse("grower@example.com").unwrap();
    let password = Password::new("wrong").unwrap();

    let error = client.login(&email, &password).await.unwrap_err();
    assert!(error.is_auth());
    assert!(error.to_string().contains("Invalid email or password"));
    handle.join().unwrap();
}

#[tokio::test]
async fn unreachable_server_classifies_as_connection_error() {
    // Bind and immediately drop a listener so the port is closed.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = test_client(&format!("http://{addr}"));
    let email = EmailAddress::parse("grower@example.com").unwrap();
    let password = Password::new("password123").unwrap();

    let error = client.login(&email, &password).await.unwrap_err();
    assert!(error.is_connection());
    assert!(!error.is_auth());
}

#[tokio::test]
async fn empty_access_token_classifies_as_protocol_error() {
    let body = login_body().replace("eyJhbGciOiJIUzI1NiJ9.claims.sig", "");
    let (base_url, _rx, handle) = serve_script(vec![(200, body)]);
    let client = test_client(&base_url);
    let email = EmailAddress::parse("grower@example.com").unwrap();
    let password = Password::new("password123").unwrap();

    let error = client.login(&email, &password).await.unwrap_err();
    assert!(matches!(error, ApiError::Protocol(_)));
    handle.join().unwrap();
}

// ============================================================================
// SECTION: History Listings
// ============================================================================

#[tokio::test]
async fn empty_history_page_is_a_valid_outcome() {
    let body = history_body(&[], 1, 10, 0);
    let (base_url, rx, handle) = serve_script(vec![(200, body)]);
    let client = test_client(&base_url);

    let page = client.list_history(&test_token(), PageRequest::default()).await.unwrap();
    assert!(page.is_empty());
    assert_eq!(page.page_info.total, 0);

    let recorded = rx.recv().unwrap();
    assert_eq!(recorded.url, "/history?page=1&per_page=10");
    assert_eq!(recorded.authorization.as_deref(), Some("Bearer test-token-abc123"));
    handle.join().unwrap();
}

#[tokio::test]
async fn history_page_parses_and_verifies_ordering() {
    let entries =
        vec![history_entry(12, "2024-01-15T10:31:00"), history_entry(11, "2024-01-15T10:30:00")];
    let body = history_body(&entries, 1, 10, 2);
    let (base_url, _rx, handle) = serve_script(vec![(200, body)]);
    let client = test_client(&base_url);

    let page = client.list_history(&test_token(), PageRequest::default()).await.unwrap();
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.records[0].id.get(), 12);
    assert!(page.records[0].created_at >= page.records[1].created_at);
    handle.join().unwrap();
}

#[tokio::test]
async fn page_request_parameters_reach_the_query_string() {
    let body = history_body(&[], 2, 5, 0);
    let (base_url, rx, handle) = serve_script(vec![(200, body)]);
    let client = test_client(&base_url);
    let request = PageRequest::new(2, 5).unwrap();

    let page = client.list_history(&test_token(), request).await.unwrap();
    assert!(page.is_empty());
    let recorded = rx.recv().unwrap();
    assert_eq!(recorded.url, "/history?page=2&per_page=5");
    handle.join().unwrap();
}

#[tokio::test]
async fn expired_token_classifies_as_auth_error() {
    let body = r#"{"error": "Token has expired"}"#.to_string();
    let (base_url, _rx, handle) = serve_script(vec![(401, body)]);
    let client = test_client(&base_url);

    let error = client.list_history(&test_token(), PageRequest::default()).await.unwrap_err();
    assert!(error.is_auth());
    handle.join().unwrap();
}

#[tokio::test]
async fn inconsistent_pagination_classifies_as_protocol_error() {
    let body = history_body(&[], 1, 10, 0).replace("\"has_next\": false", "\"has_next\": true");
    let (base_url, _rx, handle) = serve_script(vec![(200, body)]);
    let client = test_client(&base_url);

    let error = client.list_history(&test_token(), PageRequest::default()).await.unwrap_err();
    assert!(matches!(error, ApiError::Protocol(_)));
    handle.join().unwrap();
}

#[tokio::test]
async fn malformed_body_classifies_as_json_error() {
    let (base_url, _rx, handle) = serve_script(vec![(200, "not json".to_string())]);
    let client = test_client(&base_url);

    let error = client.list_history(&test_token(), PageRequest::default()).await.unwrap_err();
    assert!(matches!(error, ApiError::Json(_)));
    handle.join().unwrap();
}

#[tokio::test]
async fn oversized_body_classifies_as_response_too_large() {
    let padding = "x".repeat(128 * 1024);
    let body = format!(r#"{{"status": "success", "padding": "{padding}"}}"#);
    let (base_url, _rx, handle) = serve_script(vec![(200, body)]);
    let client = test_client(&base_url);

    let error = client.list_history(&test_token(), PageRequest::default()).await.unwrap_err();
    assert!(matches!(error, ApiError::ResponseTooLarge { .. }));
    handle.join().unwrap();
}

// ============================================================================
// SECTION: Single-Record Detail
// ============================================================================

#[tokio::test]
async fn detail_extends_its_listing_entry() {
    let entry = history_entry(12, "2024-01-15T10:31:00");
    let listing = history_body(&[entry.clone()], 1, 10, 1);
    let detail_body = format!(r#"{{"status": "success", "analysis": {entry}}}"#);
    let (base_url, _rx, handle) = serve_script(vec![(200, listing), (200, detail_body)]);
    let client = test_client(&base_url);
    let token = test_token();

    let page = client.list_history(&token, PageRequest::default()).await.unwrap();
    let listed = &page.records[0];
    let detail = client.get_analysis(&token, listed.id).await.unwrap();

    detail.extends(listed).unwrap();
    assert!(detail.all_predictions.is_probability_distribution());
    handle.join().unwrap();
}

#[tokio::test]
async fn foreign_record_classifies_as_not_found_without_leaking() {
    let body = r#"{"error": "Analysis not found or access denied"}"#.to_string();
    let (base_url, _rx, handle) = serve_script(vec![(404, body)]);
    let client = test_client(&base_url);
    let id = AnalysisId::from_raw(999).unwrap();

    let error = client.get_analysis(&test_token(), id).await.unwrap_err();
    assert!(error.is_not_found());
    let rendered = error.to_string();
    assert!(!rendered.contains("predicted_class"));
    assert!(!rendered.contains("confidence"));
    handle.join().unwrap();
}

#[tokio::test]
async fn detail_without_breakdown_classifies_as_protocol_error() {
    let body = r#"{
        "status": "success",
        "analysis": {
            "id": 12,
            "user_id": 7,
            "predicted_class": "DownyMildew",
            "confidence": 0.91,
            "all_predictions": {},
            "image_info": {"filename": null, "size": null, "processing_time": null},
            "images": {"original_image_url": null},
            "created_at": "2024-01-15T10:31:00"
        }
    }"#
    .to_string();
    let (base_url, _rx, handle) = serve_script(vec![(200, body)]);
    let client = test_client(&base_url);

    let error =
        client.get_analysis(&test_token(), AnalysisId::from_raw(12).unwrap()).await.unwrap_err();
    assert!(matches!(error, ApiError::Protocol(_)));
    handle.join().unwrap();
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

#[test]
fn client_rejects_base_url_with_path() {
    let result = ApiClient::new(ApiClientConfig {
        base_url: "http://localhost:5000/api".to_string(),
        ..ApiClientConfig::default()
    });
    assert!(matches!(result, Err(ApiError::Config(_))));
}

#[test]
fn client_rejects_non_http_scheme() {
    let result = ApiClient::new(ApiClientConfig {
        base_url: "ftp://localhost:5000".to_string(),
        ..ApiClientConfig::default()
    });
    assert!(matches!(result, Err(ApiError::Config(_))));
}
