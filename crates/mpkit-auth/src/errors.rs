//! Auth error types.

/// Errors that can occur while obtaining an access token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Application identity is missing or empty.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The token endpoint rejected the application identity.
    #[error("token endpoint error [{code}]: {message}")]
    Remote {
        /// Remote `errcode`.
        code: i64,
        /// Remote `errmsg`.
        message: String,
    },

    /// The token endpoint answered without an error code and without a token.
    #[error("token endpoint response carried no access_token")]
    MissingToken,

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

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_display() {
        let err = AuthError::Remote {
            code: 40013,
            message: "invalid appid".to_string(),
        };
        assert_eq!(err.to_string(), "token endpoint error [40013]: invalid appid");
    }

    #[test]
    fn configuration_display() {
        let err = AuthError::Configuration("WECHAT_APPID is not set".to_string());
        assert!(err.to_string().contains("WECHAT_APPID"));
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let auth_err = AuthError::from(io_err);
        assert!(auth_err.to_string().contains("not found"));
    }
}
