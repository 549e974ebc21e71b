//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `BOUTIQUE_STORAGE_DIR` - Directory for persisted cart/wishlist state (default: `.boutique`)
//! - `BOUTIQUE_API_URL` - Base URL of the catalog API (default: `http://127.0.0.1:3000/`)
//! - `BOUTIQUE_TOAST_TTL_MS` - Default toast lifetime in milliseconds, 0 disables expiry (default: 5000)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::toast::DEFAULT_TTL;

const DEFAULT_STORAGE_DIR: &str = ".boutique";
const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client-side configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Directory backing the durable key-value store
    pub storage_dir: PathBuf,
    /// Base URL of the catalog read API
    pub api_url: Url,
    /// Lifetime for toasts posted without an explicit one
    pub toast_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            api_url: default_api_url(),
            toast_ttl: DEFAULT_TTL,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_dir = lookup("BOUTIQUE_STORAGE_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR), PathBuf::from);

        let api_url = match lookup("BOUTIQUE_API_URL") {
            Some(raw) => parse_base_url(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("BOUTIQUE_API_URL".to_string(), e.to_string())
            })?,
            None => default_api_url(),
        };

        let toast_ttl = match lookup("BOUTIQUE_TOAST_TTL_MS") {
            Some(raw) => raw.trim().parse::<u64>().map(Duration::from_millis).map_err(|e| {
                ConfigError::InvalidEnvVar("BOUTIQUE_TOAST_TTL_MS".to_string(), e.to_string())
            })?,
            None => DEFAULT_TTL,
        };

        Ok(Self {
            storage_dir,
            api_url,
            toast_ttl,
        })
    }
}

/// Parse a base URL, making sure relative joins keep its path.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[allow(clippy::expect_used)]
fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default API URL is a valid absolute URL")
}
