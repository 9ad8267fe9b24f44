//! Gateway error types.

use std::path::PathBuf;

use mpkit_auth::AuthError;

use crate::envelope::AUTH_FAILURE_CODES;

/// Errors surfaced by [`ApiGateway`](crate::ApiGateway) and the resource managers built on it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Token acquisition failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The remote service answered with a non-zero `errcode`.
    #[error("API error [{code}]: {message}")]
    Remote {
        /// Remote `errcode`.
        code: i64,
        /// Remote `errmsg`.
        message: String,
    },

    /// A file to upload does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Input rejected locally, before any network I/O.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A success envelope lacked a field the caller depends on.
    #[error("response missing field `{0}`")]
    MissingField(&'static str),

    /// The response body was not JSON.
    #[error("unexpected response (HTTP {status}): {body}")]
    InvalidResponse {
        /// HTTP status code.
        status: u16,
        /// Raw body, truncated.
        body: String,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Remote error code, for either an API or a token endpoint rejection.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Remote { code, .. } | Self::Auth(AuthError::Remote { code, .. }) => Some(*code),
            _ => None,
        }
    }

    /// Whether this is a remote rejection meaning "token invalid or expired".
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Remote { code, .. } if AUTH_FAILURE_CODES.contains(code))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
