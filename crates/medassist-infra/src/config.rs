//! Client configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.medassist/` by default)
//! into [`ClientConfig`], then applies environment overrides. A missing or
//! malformed file falls back to defaults.

use std::path::Path;

use medassist_types::config::ClientConfig;
use secrecy::{ExposeSecret, SecretString};

/// Overrides `api_base_url`.
pub const API_URL_ENV: &str = "MEDASSIST_API_URL";

/// Overrides `api_key`.
pub const API_KEY_ENV: &str = "MEDASSIST_API_KEY";

/// Load configuration from `{data_dir}/config.toml` and the environment.
pub async fn load_config(data_dir: &Path) -> ClientConfig {
    let config = load_config_file(data_dir).await;
    apply_overrides(
        config,
        std::env::var(API_URL_ENV).ok(),
        std::env::var(API_KEY_ENV).ok(),
    )
}

/// Load `{data_dir}/config.toml` without looking at the environment.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_config_file(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Apply environment values on top of the file config. Blank values are ignored.
pub fn apply_overrides(
    mut config: ClientConfig,
    api_url: Option<String>,
    api_key: Option<String>,
) -> ClientConfig {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        config.api_base_url = url.trim().to_string();
    }
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        config.api_key = Some(SecretString::from(key));
    }
    config
}

/// The API key to send, wrapped so it never reaches logs.
pub fn resolve_api_key(config: &ClientConfig) -> Option<SecretString> {
    config
        .api_key
        .as_ref()
        .map(|k| k.expose_secret().trim())
        .filter(|k| !k.is_empty())
        .map(SecretString::from)
}
