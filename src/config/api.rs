use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Environment variable holding the SimpleLogin API key.
pub const API_KEY_ENV: &str = "SIMPLELOGIN_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://app.simplelogin.io/api";

/// Connection settings for the SimpleLogin API.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// API root, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key. Usually `"${SIMPLELOGIN_API_KEY}"`; when unset the
    /// environment variable is read directly.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Total request timeout in seconds. 0 disables the timeout.
    #[serde(default)]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: 0,
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    pub(super) fn validate(&mut self) -> Result<(), ConfigError> {
        let trimmed = self.base_url.trim_end_matches('/');
        let parsed = url::Url::parse(trimmed).map_err(|e| {
            ConfigError::Validation(format!("api.base_url '{}' is not a URL: {}", self.base_url, e))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "api.base_url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        self.base_url = trimmed.to_string();
        Ok(())
    }

    /// The configured key if non-empty, otherwise `SIMPLELOGIN_API_KEY`.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.to_string());
        }

        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    /// Build a reqwest Client from this configuration.
    pub fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);

        // 0 means no timeout
        if self.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(self.timeout_secs));
        }

        builder.build()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("contact-purge/{}", env!("CARGO_PKG_VERSION"))
}
