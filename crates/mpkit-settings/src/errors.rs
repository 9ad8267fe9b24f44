//! Settings error types.

use thiserror::Error;

/// Errors that can occur when loading or parsing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read the settings file from disk.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse JSON in the settings file.
    #[error("failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// An explicitly requested `.env` file could not be loaded.
    #[error("failed to load env file {path}: {message}")]
    EnvFile {
        /// Path that was requested.
        path: String,
        /// Loader error description.
        message: String,
    },
    /// A settings value was invalid (e.g., out of range).
    #[error("invalid settings value: {0}")]
    InvalidValue(String),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = SettingsError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "not found",
        ));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn json_error_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err = SettingsError::Json(json_err);
        assert!(err.to_string().contains("parse settings JSON"));
    }

    #[test]
    fn env_file_display() {
        let err = SettingsError::EnvFile {
            path: "/tmp/.env".to_string(),
            message: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "failed to load env file /tmp/.env: missing");
    }

    #[test]
    fn invalid_value_display() {
        let err = SettingsError::InvalidValue("timeout out of range".to_string());
        assert_eq!(err.to_string(), "invalid settings value: timeout out of range");
    }
}
