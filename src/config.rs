//! Admin client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

use crate::net::FallbackMode;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const STORAGE_DIR: &str = "imarabima-admin";
const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("IMARABIMA_MOCK_FALLBACK cannot be enabled when IMARABIMA_ENV=production")]
    FallbackInProduction,

    #[error("no data directory available; set IMARABIMA_STORAGE_PATH")]
    NoStorageDir,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub environment: Environment,
    pub mock_fallback: bool,
    pub storage_path: PathBuf,
}

impl AdminConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `IMARABIMA_API_URL`: default `http://localhost:3000`
    /// - `IMARABIMA_TIMEOUT_SECS`: default 10
    /// - `IMARABIMA_ENV`: `production` (default) or `development`
    /// - `IMARABIMA_MOCK_FALLBACK`: boolean, development only
    /// - `IMARABIMA_STORAGE_PATH`: default `<data dir>/imarabima-admin/storage.json`
    ///
    /// # Errors
    ///
    /// Returns an error for unparseable values or a mock fallback requested
    /// in production.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AdminConfig::from_env`] over an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`AdminConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("IMARABIMA_API_URL")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let timeout_secs = match lookup("IMARABIMA_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue { var: "IMARABIMA_TIMEOUT_SECS", value: raw })?,
        };

        let environment = parse_environment(lookup("IMARABIMA_ENV"))?;

        let mock_fallback = match lookup("IMARABIMA_MOCK_FALLBACK") {
            None => false,
            Some(raw) => {
                parse_bool(&raw).ok_or(ConfigError::InvalidValue { var: "IMARABIMA_MOCK_FALLBACK", value: raw })?
            }
        };
        if mock_fallback && environment == Environment::Production {
            return Err(ConfigError::FallbackInProduction);
        }

        let storage_path = match lookup("IMARABIMA_STORAGE_PATH").filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_storage_path().ok_or(ConfigError::NoStorageDir)?,
        };

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            environment,
            mock_fallback,
            storage_path,
        })
    }

    /// The fallback only switches on for an explicit development setup.
    #[must_use]
    pub fn fallback_mode(&self) -> FallbackMode {
        if self.mock_fallback && self.environment == Environment::Development {
            FallbackMode::Development
        } else {
            FallbackMode::Disabled
        }
    }
}

fn parse_environment(raw: Option<String>) -> Result<Environment, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Environment::Production);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "production" | "prod" => Ok(Environment::Production),
        "development" | "dev" => Ok(Environment::Development),
        _ => Err(ConfigError::InvalidValue { var: "IMARABIMA_ENV", value: raw }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn default_storage_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(STORAGE_DIR).join(STORAGE_FILE))
}
