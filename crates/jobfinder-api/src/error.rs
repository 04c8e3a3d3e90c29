//! Error types for the Job Finder API client.

use thiserror::Error;

/// Errors returned by the API client.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The base URL is missing or blank.
    #[error("API URL is not configured")]
    NotConfigured,

    /// The request never produced a usable response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or the endpoint's fallback text.
        message: String,
    },

    /// The server rejected the token (HTTP 401).
    #[error("{message}")]
    Unauthorized { message: String },

    /// An authenticated call was attempted without a token.
    #[error("No authentication token")]
    MissingToken,

    /// The response body was not the JSON we expected.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Bad local configuration; nothing was sent.
    Configuration,
    /// Connection refused, timeout, or similar transport failure.
    Network,
    /// The server responded, but not with what we asked for.
    Application,
    /// Missing or rejected credentials.
    Authentication,
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::NotConfigured => FailureKind::Configuration,
            ApiError::Http(e) if e.is_decode() => FailureKind::Application,
            ApiError::Http(_) => FailureKind::Network,
            ApiError::Api { .. } | ApiError::Json(_) => FailureKind::Application,
            ApiError::Unauthorized { .. } | ApiError::MissingToken => FailureKind::Authentication,
        }
    }

    /// HTTP status, when the server got far enough to send one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
