//! Connection configuration for the Odoo backend.
//!
//! Four settings are required (URL, database, username, API key). They are
//! read from the environment, with explicit overrides taking priority, and
//! validated once up front so that a missing value surfaces as a
//! configuration error before any remote call is attempted.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

pub const ENV_URL: &str = "ODOO_URL";
pub const ENV_DB: &str = "ODOO_DB";
pub const ENV_USERNAME: &str = "ODOO_USERNAME";
pub const ENV_API_KEY: &str = "ODOO_API_KEY";
pub const ENV_TIMEOUT: &str = "ODOO_TIMEOUT_SECS";

/// Required variables, in the order they are reported.
pub const REQUIRED_VARS: [&str; 4] = [ENV_URL, ENV_DB, ENV_USERNAME, ENV_API_KEY];

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing Odoo connection details: {}", .names.join(", "))]
    #[diagnostic(
        code(odoo_mcp::config::missing),
        help("Set ODOO_URL, ODOO_DB, ODOO_USERNAME, and ODOO_API_KEY environment variables.")
    )]
    Missing { names: Vec<&'static str> },

    #[error("Invalid value for {name}: {message}")]
    #[diagnostic(code(odoo_mcp::config::invalid))]
    Invalid { name: &'static str, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Values supplied on the command line. Anything left as `None` falls back
/// to the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub db: Option<String>,
    pub username: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Validated connection parameters.
///
/// Fields are private so a value of this type always holds four non-empty
/// settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    url: String,
    db: String,
    username: String,
    api_key: String,
    timeout: Duration,
}

impl ConnectionConfig {
    pub fn new(
        url: impl Into<String>,
        db: impl Into<String>,
        username: impl Into<String>,
        api_key: impl Into<String>,
    ) -> ConfigResult<Self> {
        let url = url.into().trim().trim_end_matches('/').to_string();
        let db = db.into().trim().to_string();
        let username = username.into().trim().to_string();
        let api_key = api_key.into().trim().to_string();

        let missing: Vec<&'static str> = [
            (ENV_URL, &url),
            (ENV_DB, &db),
            (ENV_USERNAME, &username),
            (ENV_API_KEY, &api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(ConfigError::Missing { names: missing });
        }

        Ok(Self {
            url,
            db,
            username,
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Load from the process environment, applying `overrides` first.
    pub fn from_env(overrides: ConfigOverrides) -> ConfigResult<Self> {
        Self::from_lookup(overrides, |key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup.
    ///
    /// Priority for each setting:
    /// 1. Explicit override
    /// 2. Value returned by `lookup`
    pub fn from_lookup<F>(overrides: ConfigOverrides, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = overrides.url.or_else(|| lookup(ENV_URL)).unwrap_or_default();
        let db = overrides.db.or_else(|| lookup(ENV_DB)).unwrap_or_default();
        let username = overrides
            .username
            .or_else(|| lookup(ENV_USERNAME))
            .unwrap_or_default();
        let api_key = lookup(ENV_API_KEY).unwrap_or_default();

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => match lookup(ENV_TIMEOUT) {
                Some(raw) if !raw.trim().is_empty() => {
                    raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                        name: ENV_TIMEOUT,
                        message: e.to_string(),
                    })?
                }
                _ => DEFAULT_TIMEOUT_SECS,
            },
        };

        Ok(Self::new(url, db, username, api_key)?.with_timeout(Duration::from_secs(timeout_secs)))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL with trailing slashes removed.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn db(&self) -> &str {
        &self.db
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// The API key never appears in debug output.
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("db", &self.db)
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
