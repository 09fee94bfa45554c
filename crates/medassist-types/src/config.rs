//! Client configuration types.
//!
//! `ClientConfig` represents the `config.toml` in the data directory. All
//! fields have defaults so an empty or missing file is valid.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Base URL used when neither the config file nor the environment sets one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Top-level configuration for the MedAssist client.
///
/// Loaded from `~/.medassist/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the chat API, without a trailing slash.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Static API key sent as `X-API-Key`. Prefer `MEDASSIST_API_KEY`.
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            api_key: None,
        }
    }
}
