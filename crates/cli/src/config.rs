//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `BAKEHOUSE_API_URL` - Order backend base URL (default: `http://localhost:5000`)
//! - `BAKEHOUSE_API_TOKEN` - Bearer token of the signed-in customer
//! - `BAKEHOUSE_DATA_DIR` - Directory holding the persisted cart (default: `.bakehouse`)
//! - `BAKEHOUSE_UPI_ID` - UPI VPA receiving payments (default: `merchant@upi`)
//! - `BAKEHOUSE_MERCHANT_NAME` - Payee name shown in UPI apps (default: `FoodHub`)

use std::path::PathBuf;

use bakehouse_cart::UpiPayee;
use bakehouse_cart::payment::{DEFAULT_PAYEE_NAME, DEFAULT_VPA};
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_DATA_DIR: &str = ".bakehouse";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CLI configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct CliConfig {
    /// Order backend base URL
    pub api_url: Url,
    /// Customer bearer token (absent when signed out)
    pub api_token: Option<SecretString>,
    /// Directory for the durable cart store
    pub data_dir: PathBuf,
    /// UPI payee for the payment step
    pub upi: UpiPayee,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("api_url", &self.api_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("data_dir", &self.data_dir)
            .field("upi", &self.upi)
            .finish()
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or_default =
            |key: &str, default: &str| get_optional(key).unwrap_or_else(|| default.to_string());

        let raw_url = get_or_default("BAKEHOUSE_API_URL", DEFAULT_API_URL);
        let api_url = Url::parse(&raw_url).map_err(|e| {
            ConfigError::InvalidEnvVar("BAKEHOUSE_API_URL".to_string(), e.to_string())
        })?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "BAKEHOUSE_API_URL".to_string(),
                format!("unsupported scheme '{}'", api_url.scheme()),
            ));
        }

        Ok(Self {
            api_url,
            api_token: get_optional("BAKEHOUSE_API_TOKEN").map(SecretString::from),
            data_dir: PathBuf::from(get_or_default("BAKEHOUSE_DATA_DIR", DEFAULT_DATA_DIR)),
            upi: UpiPayee::new(
                get_or_default("BAKEHOUSE_UPI_ID", DEFAULT_VPA),
                get_or_default("BAKEHOUSE_MERCHANT_NAME", DEFAULT_PAYEE_NAME),
            ),
        })
    }
}
