//! Configuration for the contact purge.
//!
//! Everything has a default, so running without a config file is the normal
//! case. When a TOML file is given, `${VAR_NAME}` placeholders are expanded
//! from the environment before parsing. A `.env` file in the working
//! directory (or a parent) is loaded into the environment first; variables
//! already set in the real environment take precedence.
//!
//! # Example
//!
//! ```toml
//! [api]
//! base_url = "https://app.simplelogin.io/api"
//! api_key = "${SIMPLELOGIN_API_KEY}"
//! timeout_secs = 30
//!
//! [observability.logging]
//! level = "debug"
//! format = "json"
//! ```

mod api;
mod observability;

use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

pub use api::*;
pub use observability::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PurgeConfig {
    /// SimpleLogin API connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Observability configuration (logging).
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl PurgeConfig {
    /// Load configuration from a TOML file.
    ///
    /// Environment variables in the format `${VAR_NAME}` are expanded.
    /// Missing variables cause an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(contents)?;
        let mut config: PurgeConfig = toml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let mut config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    fn validate(&mut self) -> Result<(), ConfigError> {
        self.api.validate()
    }
}

/// Load `./.env` (searching parent directories) into the process environment.
///
/// Returns the file that was loaded. A missing file is not an error.
pub fn load_dotenv() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::Dotenv(e)),
    }
}

/// Load a specific dotenv file. Variables already set are left untouched.
pub fn load_dotenv_from(path: impl AsRef<Path>) -> Result<(), ConfigError> {
    dotenvy::from_path(path.as_ref()).map_err(ConfigError::Dotenv)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to load .env file: {0}")]
    Dotenv(dotenvy::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("No API key: set {API_KEY_ENV} or api.api_key in the config file")]
    MissingApiKey,

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"));

/// Expand environment variables in the format `${VAR_NAME}`.
/// Variables after a `#` on the same line are left as written.
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(input.len());

    for line in input.lines() {
        let comment_pos = line.find('#');
        let mut last_end = 0;

        for cap in ENV_VAR_RE.captures_iter(line) {
            let Some(whole) = cap.get(0) else { continue };

            if let Some(pos) = comment_pos
                && whole.start() >= pos
            {
                continue;
            }

            result.push_str(&line[last_end..whole.start()]);

            let var_name = &cap[1];
            let value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;
            result.push_str(&value);

            last_end = whole.end();
        }

        result.push_str(&line[last_end..]);
        result.push('\n');
    }

    // Remove trailing newline if input didn't have one
    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    Ok(result)
}
