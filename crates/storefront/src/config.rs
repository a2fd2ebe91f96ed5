//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COSMETICA_API_URL` - Base URL of the REST backend (http or https)
//!
//! ## Optional
//! - `COSMETICA_API_TOKEN` - Bearer token sent with backend requests
//! - `COSMETICA_DATA_DIR` - Directory for persisted client state (default: .cosmetica)
//! - `COSMETICA_CURRENCY` - ISO currency code for displayed prices (default: USD)
//! - `COSMETICA_PROBE_TIMEOUT_SECS` - Backend health probe timeout (default: 5)
//! - `COSMETICA_BANK_NAME` - Bank shown in payment instructions
//! - `COSMETICA_BANK_ACCOUNT_NAME` - Account holder shown in payment instructions
//! - `COSMETICA_BANK_ACCOUNT_NUMBER` - Account number shown in payment instructions
//! - `COSMETICA_BANK_BRANCH` - Branch shown in payment instructions
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::path::PathBuf;
use std::time::Duration;

use cosmetica_core::CurrencyCode;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::checkout::BankTransferDetails;

const DEFAULT_DATA_DIR: &str = ".cosmetica";
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// REST backend connection settings
    pub backend: BackendConfig,
    /// Directory the cart snapshot and other client state live in
    pub data_dir: PathBuf,
    /// Currency used when displaying prices
    pub currency: CurrencyCode,
    /// Account details shown on the payment step
    pub bank: BankTransferDetails,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// REST backend connection settings.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL, always ending in `/` so relative joins keep its path
    pub base_url: Url,
    /// Bearer token for authenticated calls
    pub api_token: Option<SecretString>,
    /// How long the health probe waits before reporting a timeout
    pub probe_timeout: Duration,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("probe_timeout", &self.probe_timeout)
            .finish()
    }
}

impl BackendConfig {
    /// Build backend settings from a base URL string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse or is
    /// not http/https.
    pub fn new(
        base_url: &str,
        api_token: Option<SecretString>,
        probe_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            api_token,
            probe_timeout,
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_required_env("COSMETICA_API_URL")?;
        let api_token = get_optional_env("COSMETICA_API_TOKEN").map(SecretString::from);
        let probe_secs = get_env_or_default(
            "COSMETICA_PROBE_TIMEOUT_SECS",
            &DEFAULT_PROBE_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("COSMETICA_PROBE_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Self::new(&base_url, api_token, Duration::from_secs(probe_secs))
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend = BackendConfig::from_env()?;
        let data_dir = PathBuf::from(get_env_or_default("COSMETICA_DATA_DIR", DEFAULT_DATA_DIR));
        let currency = get_env_or_default("COSMETICA_CURRENCY", "USD")
            .parse::<CurrencyCode>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("COSMETICA_CURRENCY".to_string(), e.to_string())
            })?;

        Ok(Self {
            backend,
            data_dir,
            currency,
            bank: bank_from_env(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

fn bank_from_env() -> BankTransferDetails {
    let defaults = BankTransferDetails::default();
    BankTransferDetails {
        bank_name: get_optional_env("COSMETICA_BANK_NAME").unwrap_or(defaults.bank_name),
        account_name: get_optional_env("COSMETICA_BANK_ACCOUNT_NAME")
            .unwrap_or(defaults.account_name),
        account_number: get_optional_env("COSMETICA_BANK_ACCOUNT_NUMBER")
            .unwrap_or(defaults.account_number),
        branch: get_optional_env("COSMETICA_BANK_BRANCH").unwrap_or(defaults.branch),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and normalize the backend base URL.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("COSMETICA_API_URL".to_string(), reason);

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
