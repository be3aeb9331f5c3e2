// crates/sunscan-config/src/config.rs
// ============================================================================
// Module: Sunscan Configuration
// Description: Configuration loading and validation for the Sunscan client.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, sunscan-core, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path
//! limits. Every tunable carries explicit bounds and validation rejects
//! out-of-range values instead of clamping them. The file never holds
//! secrets: passwords come from the environment at invocation time, and an
//! unknown key (including a stray `password`) fails the parse.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use sunscan_core::EmailAddress;
use sunscan_core::history::MAX_PER_PAGE;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "sunscan.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SUNSCAN_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default server base URL.
pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:5000";
/// Default request timeout in milliseconds.
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 10_000;
/// Minimum allowed request timeout in milliseconds.
pub(crate) const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum allowed request timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 60_000;
/// Default maximum response body size in bytes.
pub(crate) const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Minimum allowed response body size in bytes.
pub(crate) const MIN_MAX_RESPONSE_BYTES: usize = 1024;
/// Maximum allowed response body size in bytes.
pub(crate) const MAX_MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;
/// Default page size for the smoke flow.
pub(crate) const DEFAULT_SMOKE_PER_PAGE: u32 = 10;
/// Default number of history entries the smoke flow prints.
pub(crate) const DEFAULT_SMOKE_SHOW_ENTRIES: u32 = 3;
/// Maximum number of history entries the smoke flow prints.
pub(crate) const MAX_SMOKE_SHOW_ENTRIES: u32 = 10;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for CLI error mapping and tests.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Sunscan client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SunscanConfig {
    /// Server connection configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Default account configuration.
    #[serde(default)]
    pub account: AccountConfig,
    /// Smoke flow configuration.
    #[serde(default)]
    pub smoke: SmokeConfig,
}

/// Server connection configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Server base URL (http/https, no path).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request deadline in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum accepted response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

/// Default account configuration.
///
/// # Invariants
/// - Holds no secrets; passwords are read from the environment at
///   invocation time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountConfig {
    /// Default email used when a command does not pass one explicitly.
    #[serde(default)]
    pub email: Option<String>,
}

/// Smoke flow configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmokeConfig {
    /// Page size requested by the smoke flow.
    #[serde(default = "default_smoke_per_page")]
    pub per_page: u32,
    /// Number of history entries the smoke flow prints.
    #[serde(default = "default_smoke_show_entries")]
    pub show_entries: u32,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_SMOKE_PER_PAGE,
            show_entries: DEFAULT_SMOKE_SHOW_ENTRIES,
        }
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl SunscanConfig {
    /// Loads configuration from the given path, the `SUNSCAN_CONFIG`
    /// environment override, or `sunscan.toml` in the working directory.
    ///
    /// A missing file at the default location yields the built-in defaults;
    /// an explicitly named file must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, exceeds size
    /// limits, fails to parse, or fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.is_some() || env::var(CONFIG_ENV_VAR).is_ok();
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.account.validate()?;
        self.smoke.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    /// Validates the server connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the base URL or a tunable is out of
    /// bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|err| ConfigError::Invalid(format!("base_url: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_url scheme {} is not http or https",
                url.scheme()
            )));
        }
        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::Invalid(
                "base_url must not carry a path, query, or fragment".to_string(),
            ));
        }
        if self.timeout_ms < MIN_TIMEOUT_MS || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "timeout_ms {} outside {MIN_TIMEOUT_MS}..={MAX_TIMEOUT_MS}",
                self.timeout_ms
            )));
        }
        if self.max_response_bytes < MIN_MAX_RESPONSE_BYTES
            || self.max_response_bytes > MAX_MAX_RESPONSE_BYTES
        {
            return Err(ConfigError::Invalid(format!(
                "max_response_bytes {} outside {MIN_MAX_RESPONSE_BYTES}..={MAX_MAX_RESPONSE_BYTES}",
                self.max_response_bytes
            )));
        }
        Ok(())
    }
}

impl AccountConfig {
    /// Validates the default account settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configured email fails domain
    /// validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(email) = &self.email {
            EmailAddress::parse(email)
                .map_err(|err| ConfigError::Invalid(format!("account.email: {err}")))?;
        }
        Ok(())
    }
}

impl SmokeConfig {
    /// Validates the smoke flow settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a tunable is out of bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(ConfigError::Invalid(format!(
                "smoke.per_page {} outside 1..={MAX_PER_PAGE}",
                self.per_page
            )));
        }
        if self.show_entries == 0 || self.show_entries > MAX_SMOKE_SHOW_ENTRIES {
            return Err(ConfigError::Invalid(format!(
                "smoke.show_entries {} outside 1..={MAX_SMOKE_SHOW_ENTRIES}",
                self.show_entries
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Returns the default base URL for serde.
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Returns the default timeout for serde.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Returns the default response size limit for serde.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Returns the default smoke page size for serde.
const fn default_smoke_per_page() -> u32 {
    DEFAULT_SMOKE_PER_PAGE
}

/// Returns the default smoke display count for serde.
const fn default_smoke_show_entries() -> u32 {
    DEFAULT_SMOKE_SHOW_ENTRIES
}
