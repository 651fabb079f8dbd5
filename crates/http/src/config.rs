//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::client::error::ClientError;

/// API root used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Request-level deadline in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variables naming the API root, in priority order
pub const BASE_URL_ENV_VARS: [&str; 2] = ["NUMEN_API_URL", "NEXT_PUBLIC_API_URL"];

/// Session client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.example.com/api/v1`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Custom user agent
    pub user_agent: Option<String>,

    /// Serialize refresh exchanges across concurrent requests
    pub coalesce_refresh: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            coalesce_refresh: false,
        }
    }
}

impl ClientConfig {
    /// Load configuration from defaults, an optional file and the environment
    ///
    /// `NUMEN__*` variables override file values; `NUMEN_API_URL` or
    /// `NEXT_PUBLIC_API_URL` override the base URL last.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value fails to parse
    pub fn load(path: Option<&Path>) -> Result<Self, ClientError> {
        Self::load_with(path, base_url_from_env())
    }

    /// Load configuration from defaults and the environment only
    ///
    /// # Errors
    ///
    /// Returns an error if an environment value fails to parse
    pub fn from_env() -> Result<Self, ClientError> {
        Self::load(None)
    }

    fn load_with(path: Option<&Path>, base_url: Option<String>) -> Result<Self, ClientError> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .set_default("coalesce_refresh", defaults.coalesce_refresh)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("NUMEN")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(base_url) = base_url {
            builder = builder.set_override("base_url", base_url)?;
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}

fn base_url_from_env() -> Option<String> {
    BASE_URL_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
