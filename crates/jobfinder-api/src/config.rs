//! API client configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// API host used when `PUBLIC_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:5001/api";

/// Environment variable selecting the API host.
pub const API_URL_ENV: &str = "PUBLIC_API_URL";

const CONNECT_TIMEOUT_SECS: u64 = 8;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// How the session token travels to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`
    #[default]
    Bearer,
    /// `x-auth-token: <token>`
    XAuthToken,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Bearer => "bearer",
            AuthScheme::XAuthToken => "x-auth-token",
        }
    }

    /// Header name and value carrying `token`.
    pub fn header(&self, token: &str) -> (&'static str, String) {
        match self {
            AuthScheme::Bearer => ("authorization", format!("Bearer {token}")),
            AuthScheme::XAuthToken => ("x-auth-token", token.to_string()),
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bearer" => Ok(AuthScheme::Bearer),
            "x-auth-token" => Ok(AuthScheme::XAuthToken),
            other => Err(format!(
                "unknown auth scheme '{other}' (expected 'bearer' or 'x-auth-token')"
            )),
        }
    }
}

/// Settings for [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_scheme: AuthScheme,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_scheme: AuthScheme::default(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
        }
    }

    /// Read the base URL from `PUBLIC_API_URL`, falling back to the local
    /// development host when the variable is unset.
    ///
    /// A variable that is set but blank is kept as-is so that client
    /// construction reports it as a configuration error.
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) => Self::new(url),
            Err(_) => Self::default(),
        }
    }

    pub fn with_auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Trim whitespace and trailing slashes; reject an empty result.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ApiError::NotConfigured);
    }
    Ok(trimmed.to_string())
}
