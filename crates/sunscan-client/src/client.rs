// crates/sunscan-client/src/client.rs
// ============================================================================
// Module: API Client
// Description: Typed async client for the analysis-history HTTP API.
// Purpose: Implement every endpoint with a strict error taxonomy and hard body limits.
// Dependencies: reqwest, serde_json, sunscan-contract, sunscan-core, url
// ============================================================================

//! ## Overview
//! One [`ApiClient`] instance wraps a reqwest client configured fail-closed:
//! redirects disabled, a single per-request deadline, and a streaming
//! response-size limit. Each call performs exactly one attempt; there is no
//! retry or backoff. Server responses are untrusted: bodies parse into
//! `sunscan-contract` shapes, lift into domain types, and pass the domain
//! invariant checks before a value is returned. Failures classify into the
//! taxonomy the callers depend on - authentication, connection, not-found,
//! and protocol errors are distinct variants.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use sunscan_contract::AnalysisEnvelope;
use sunscan_contract::ErrorBody;
use sunscan_contract::HistoryEnvelope;
use sunscan_contract::LoginEnvelope;
use sunscan_contract::LoginRequest;
use sunscan_contract::MessageEnvelope;
use sunscan_contract::ModelHealthPayload;
use sunscan_contract::ModelInfoPayload;
use sunscan_contract::ProfileEnvelope;
use sunscan_contract::ProfileUpdateEnvelope;
use sunscan_contract::ProfileUpdateRequest;
use sunscan_contract::RegisterEnvelope;
use sunscan_contract::RegisterRequest;
use sunscan_contract::UsersEnvelope;
use sunscan_core::AccountAge;
use sunscan_core::AnalysisDetail;
use sunscan_core::AnalysisId;
use sunscan_core::EmailAddress;
use sunscan_core::HistoryPage;
use sunscan_core::PageRequest;
use sunscan_core::Password;
use sunscan_core::SessionToken;
use sunscan_core::UserAccount;
use sunscan_core::UserId;
use sunscan_core::Username;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default base URL for a locally hosted server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
/// Default per-request deadline in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Default maximum response body size in bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Status marker the server sets on successful envelopes.
const STATUS_SUCCESS: &str = "success";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// API client configuration.
///
/// # Invariants
/// - `base_url` must parse as an http/https URL with no path, query, or
///   fragment; [`ApiClient::new`] rejects anything else.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Server base URL.
    pub base_url: String,
    /// Per-request deadline.
    pub timeout: Duration,
    /// Maximum accepted response body size in bytes.
    pub max_response_bytes: usize,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// API client errors.
///
/// # Invariants
/// - Variants are stable for CLI error mapping and tests.
/// - Authentication, connection, and not-found failures are distinct
///   variants; callers must be able to tell them apart.
/// - String payloads are user-facing and may include untrusted server text.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client configuration error.
    #[error("api client config error: {0}")]
    Config(String),
    /// Request rejected before sending by client-side validation.
    #[error("request validation error: {0}")]
    Validation(String),
    /// Server unreachable or the connection failed mid-request.
    #[error("connection error: {0}")]
    Connection(String),
    /// Credentials or bearer token rejected by the server.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// Requested record does not exist or belongs to another user.
    #[error("not found: {0}")]
    NotFound(String),
    /// Any other non-success status from the server.
    #[error("server returned status {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },
    /// Response body was not valid JSON for the expected shape.
    #[error("response parse error: {0}")]
    Json(String),
    /// Response parsed but violated the documented contract.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// Response body exceeds the configured size limit.
    #[error("response exceeds size limit ({actual} > {limit})")]
    ResponseTooLarge {
        /// Bytes received before the limit tripped.
        actual: usize,
        /// Maximum accepted size in bytes.
        limit: usize,
    },
}

impl ApiError {
    /// Reports whether this is an authentication failure.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Reports whether this is a connection-class failure.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Reports whether this is a not-found failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    /// Bearer token for subsequent authenticated calls.
    pub token: SessionToken,
    /// Account record for the authenticated user.
    pub account: UserAccount,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Typed client for the analysis-history API.
///
/// # Invariants
/// - `base_url` is an absolute http/https URL with no path component.
/// - Every call performs exactly one request attempt.
pub struct ApiClient {
    /// Reqwest client instance.
    client: Client,
    /// Validated server base URL.
    base_url: Url,
    /// Maximum accepted response body size in bytes.
    max_response_bytes: usize,
}

impl ApiClient {
    /// Creates a new client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] when the base URL is invalid or the
    /// HTTP client cannot be constructed.
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|err| ApiError::Config(format!("invalid base url: {err}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "base url scheme {} is not http or https",
                base_url.scheme()
            )));
        }
        if base_url.path() != "/" || base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(ApiError::Config(
                "base url must not carry a path, query, or fragment".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|err| ApiError::Config(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            max_response_bytes: config.max_response_bytes,
        })
    }

    // ------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------

    /// Authenticates with email and password, returning the session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Auth`] on rejected credentials,
    /// [`ApiError::Connection`] when the server is unreachable, and
    /// [`ApiError::Protocol`] when the response violates the contract.
    pub async fn login(
        &self,
        email: &EmailAddress,
        password: &Password,
    ) -> Result<Session, ApiError> {
        let body = LoginRequest::new(email, password);
        let request = self.client.post(self.endpoint("login")?).json(&body);
        let envelope: LoginEnvelope = self.execute(request).await?;
        let token = SessionToken::new(envelope.access_token)
            .map_err(|err| ApiError::Protocol(format!("invalid access token: {err}")))?;
        let account = UserAccount::try_from(envelope.user)
            .map_err(|err| ApiError::Protocol(format!("invalid login user payload: {err}")))?;
        Ok(Session {
            token,
            account,
        })
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when the password fails the
    /// registration policy before sending, and the usual taxonomy for
    /// server-side failures.
    pub async fn register(
        &self,
        username: &Username,
        email: &EmailAddress,
        password: &Password,
        age: AccountAge,
    ) -> Result<UserAccount, ApiError> {
        password.meets_register_policy().map_err(|err| ApiError::Validation(err.to_string()))?;
        let body = RegisterRequest::new(username, email, password, age);
        let request = self.client.post(self.endpoint("register")?).json(&body);
        let envelope: RegisterEnvelope = self.execute(request).await?;
        UserAccount::try_from(envelope.user)
            .map_err(|err| ApiError::Protocol(format!("invalid register user payload: {err}")))
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    /// Fetches a user profile by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no such user exists, and the
    /// usual taxonomy for other failures.
    pub async fn profile(&self, user: UserId) -> Result<UserAccount, ApiError> {
        let request = self.client.get(self.endpoint(&format!("profile/{user}"))?);
        let envelope: ProfileEnvelope = self.execute(request).await?;
        expect_success_marker(&envelope.status)?;
        UserAccount::try_from(envelope.user)
            .map_err(|err| ApiError::Protocol(format!("invalid profile payload: {err}")))
    }

    /// Applies a profile update and returns the updated account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when the update changes nothing or
    /// a new password fails the registration policy, and the usual taxonomy
    /// for server-side failures.
    pub async fn update_profile(
        &self,
        user: UserId,
        username: Option<&Username>,
        age: Option<AccountAge>,
        password: Option<&Password>,
    ) -> Result<UserAccount, ApiError> {
        if let Some(new_password) = password {
            new_password
                .meets_register_policy()
                .map_err(|err| ApiError::Validation(err.to_string()))?;
        }
        let body = ProfileUpdateRequest {
            username: username.map(|name| name.as_str().to_string()),
            age: age.map(AccountAge::get),
            password: password.map(|secret| secret.expose().to_string()),
        };
        if body.is_empty() {
            return Err(ApiError::Validation("profile update changes nothing".to_string()));
        }
        let request = self.client.put(self.endpoint(&format!("profile/{user}"))?).json(&body);
        let envelope: ProfileUpdateEnvelope = self.execute(request).await?;
        UserAccount::try_from(envelope.user)
            .map_err(|err| ApiError::Protocol(format!("invalid profile payload: {err}")))
    }

    /// Deletes a user account, returning the server's status message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when no such user exists, and the
    /// usual taxonomy for other failures.
    pub async fn delete_user(&self, user: UserId) -> Result<String, ApiError> {
        let request = self.client.delete(self.endpoint(&format!("profile/{user}"))?);
        let envelope: MessageEnvelope = self.execute(request).await?;
        Ok(envelope.message)
    }

    /// Lists all accounts with the server-reported total.
    ///
    /// # Errors
    ///
    /// Returns the usual taxonomy; [`ApiError::Protocol`] when the reported
    /// total disagrees with the returned list.
    pub async fn list_users(&self) -> Result<(Vec<UserAccount>, u64), ApiError> {
        let request = self.client.get(self.endpoint("users")?);
        let envelope: UsersEnvelope = self.execute(request).await?;
        expect_success_marker(&envelope.status)?;
        let returned = u64::try_from(envelope.users.len()).unwrap_or(u64::MAX);
        if envelope.total != returned {
            return Err(ApiError::Protocol(format!(
                "user listing total {} disagrees with {} returned users",
                envelope.total,
                envelope.users.len()
            )));
        }
        let users = envelope
            .users
            .into_iter()
            .map(UserAccount::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| ApiError::Protocol(format!("invalid user payload: {err}")))?;
        let total = envelope.total;
        Ok((users, total))
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Lists one page of the authenticated user's analysis history.
    ///
    /// An empty page with a zero total is a valid, non-error outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Auth`] on a rejected token,
    /// [`ApiError::Connection`] when the server is unreachable, and
    /// [`ApiError::Protocol`] when the page violates pagination or
    /// ordering invariants.
    pub async fn list_history(
        &self,
        token: &SessionToken,
        page: PageRequest,
    ) -> Result<HistoryPage, ApiError> {
        let request = self
            .client
            .get(self.endpoint("history")?)
            .headers(self.bearer_headers(token)?)
            .query(&[("page", page.page()), ("per_page", page.per_page())]);
        let envelope: HistoryEnvelope = self.execute(request).await?;
        expect_success_marker(&envelope.status)?;
        let history = HistoryPage::try_from(envelope)
            .map_err(|err| ApiError::Protocol(format!("invalid history payload: {err}")))?;
        history
            .verify()
            .map_err(|err| ApiError::Protocol(format!("inconsistent history page: {err}")))?;
        Ok(history)
    }

    /// Fetches the full detail for one analysis record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the record does not exist or
    /// belongs to another user, and [`ApiError::Protocol`] when the detail
    /// violates its consistency invariants.
    pub async fn get_analysis(
        &self,
        token: &SessionToken,
        id: AnalysisId,
    ) -> Result<AnalysisDetail, ApiError> {
        let request = self
            .client
            .get(self.endpoint(&format!("history/{id}"))?)
            .headers(self.bearer_headers(token)?);
        let envelope: AnalysisEnvelope = self.execute(request).await?;
        expect_success_marker(&envelope.status)?;
        let detail = AnalysisDetail::try_from(envelope.analysis)
            .map_err(|err| ApiError::Protocol(format!("invalid analysis payload: {err}")))?;
        detail
            .verify()
            .map_err(|err| ApiError::Protocol(format!("inconsistent analysis detail: {err}")))?;
        Ok(detail)
    }

    // ------------------------------------------------------------------
    // Model
    // ------------------------------------------------------------------

    /// Fetches model metadata.
    ///
    /// # Errors
    ///
    /// Returns the usual taxonomy for transport and server failures.
    pub async fn model_info(&self, token: &SessionToken) -> Result<ModelInfoPayload, ApiError> {
        let request = self.client.get(self.endpoint("info")?).headers(self.bearer_headers(token)?);
        self.execute(request).await
    }

    /// Fetches the model health report.
    ///
    /// # Errors
    ///
    /// Returns the usual taxonomy for transport and server failures.
    pub async fn model_health(&self, token: &SessionToken) -> Result<ModelHealthPayload, ApiError> {
        let request =
            self.client.get(self.endpoint("health")?).headers(self.bearer_headers(token)?);
        self.execute(request).await
    }

    // ------------------------------------------------------------------
    // Transport helpers
    // ------------------------------------------------------------------

    /// Joins an endpoint path onto the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::Config(format!("invalid endpoint path {path}: {err}")))
    }

    /// Builds the bearer authorization headers for a token.
    fn bearer_headers(&self, token: &SessionToken) -> Result<reqwest::header::HeaderMap, ApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let value = format!("Bearer {}", token.expose());
        let header = HeaderValue::from_str(&value)
            .map_err(|_| ApiError::Config("bearer token is not a valid header value".to_string()))?;
        headers.insert(AUTHORIZATION, header);
        Ok(headers)
    }

    /// Sends a request and parses the success body into the expected shape.
    ///
    /// # Errors
    ///
    /// Classifies transport failures as [`ApiError::Connection`], maps
    /// non-success statuses through [`classify_status`], and reports parse
    /// failures as [`ApiError::Json`].
    async fn execute<T>(&self, request: RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response =
            request.send().await.map_err(|err| ApiError::Connection(err.to_string()))?;
        let status = response.status();
        let body = read_body_with_limit(response, self.max_response_bytes).await?;
        if !status.is_success() {
            return Err(classify_status(status, &body));
        }
        serde_json::from_slice(&body).map_err(|err| ApiError::Json(err.to_string()))
    }

}

/// Checks the `status` marker carried inside success envelopes.
fn expect_success_marker(marker: &str) -> Result<(), ApiError> {
    if marker == STATUS_SUCCESS {
        Ok(())
    } else {
        Err(ApiError::Protocol(format!("unexpected status marker {marker}")))
    }
}

// ============================================================================
// SECTION: Response Helpers
// ============================================================================

/// Reads a response body while enforcing a hard byte limit.
async fn read_body_with_limit(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, ApiError> {
    let mut body = Vec::new();
    let mut total: usize = 0;
    while let Some(chunk) =
        response.chunk().await.map_err(|err| ApiError::Connection(err.to_string()))?
    {
        let next_total = total.checked_add(chunk.len()).ok_or(ApiError::ResponseTooLarge {
            actual: usize::MAX,
            limit,
        })?;
        if next_total > limit {
            return Err(ApiError::ResponseTooLarge {
                actual: next_total,
                limit,
            });
        }
        body.extend_from_slice(&chunk);
        total = next_total;
    }
    Ok(body)
}

/// Maps a non-success HTTP status and body to the error taxonomy.
///
/// The server reports errors as `{"error": "<message>"}`; when the body is
/// not that shape, a trimmed text preview is used instead.
fn classify_status(status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body).map_or_else(
        |_| String::from_utf8_lossy(body).trim().to_string(),
        |parsed| parsed.error,
    );
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::UNPROCESSABLE_ENTITY => {
            ApiError::Auth(message)
        }
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        other => ApiError::Api {
            status: other.as_u16(),
            message,
        },
    }
}
