//! TCK target configuration.
//!
//! The system under test is external: the kit only needs to know its base
//! URL and which routes implement the login, logout, token, and
//! registration contract. Everything is overridable through environment
//! variables so the same suites can point at any framework integration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the target base URL.
pub const BASE_URL_ENV: &str = "TCK_BASE_URL";

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidValue {
        /// The environment variable name.
        name: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Configuration for one TCK run against one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TckConfig {
    /// Base URL of the system under test, without a trailing slash.
    pub base_url: String,
    /// Path of the login route.
    pub login_path: String,
    /// Path of the logout route.
    pub logout_path: String,
    /// Path of the OAuth2 token route.
    pub token_path: String,
    /// Path of the account registration route.
    pub register_path: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl TckConfig {
    /// Creates a configuration for a target with the default route layout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            login_path: "/login".to_string(),
            logout_path: "/logout".to_string(),
            token_path: "/oauth/token".to_string(),
            register_path: "/register".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Loads configuration from the environment.
    ///
    /// `TCK_BASE_URL` selects the target (default
    /// `http://localhost:8080`); `TCK_LOGIN_PATH`, `TCK_LOGOUT_PATH`,
    /// `TCK_TOKEN_PATH`, and `TCK_REGISTER_PATH` override individual
    /// routes; `TCK_TIMEOUT_SECS` overrides the request timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var(BASE_URL_ENV)
            .unwrap_or_else(|_| "http://localhost:8080".to_string());
        let mut config = Self::new(base_url);

        if let Ok(path) = std::env::var("TCK_LOGIN_PATH") {
            config.login_path = path;
        }
        if let Ok(path) = std::env::var("TCK_LOGOUT_PATH") {
            config.logout_path = path;
        }
        if let Ok(path) = std::env::var("TCK_TOKEN_PATH") {
            config.token_path = path;
        }
        if let Ok(path) = std::env::var("TCK_REGISTER_PATH") {
            config.register_path = path;
        }
        if let Ok(secs) = std::env::var("TCK_TIMEOUT_SECS") {
            let parsed = secs.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "TCK_TIMEOUT_SECS",
                value: secs,
            })?;
            config.request_timeout = Duration::from_secs(parsed);
        }

        Ok(config)
    }

    /// Returns an absolute URL for a path on the target.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Returns the login route URL.
    #[must_use]
    pub fn login_url(&self) -> String {
        self.url(&self.login_path)
    }

    /// Returns the logout route URL.
    #[must_use]
    pub fn logout_url(&self) -> String {
        self.url(&self.logout_path)
    }

    /// Returns the OAuth2 token route URL.
    #[must_use]
    pub fn token_url(&self) -> String {
        self.url(&self.token_path)
    }

    /// Returns the registration route URL.
    #[must_use]
    pub fn register_url(&self) -> String {
        self.url(&self.register_path)
    }
}

impl Default for TckConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
