//! `.env` file loading.
//!
//! Values already present in the process environment always win; a `.env`
//! file only fills gaps.

use std::path::{Path, PathBuf};

use crate::errors::{Result, SettingsError};

/// Load a `.env` file into the process environment.
///
/// With `Some(path)` the file must exist and parse. With `None`, the current
/// directory and its ancestors are searched and a missing file is not an
/// error. Returns the path that was loaded, if any.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| SettingsError::EnvFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            tracing::debug!(path = %path.display(), "loaded env file");
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(found) => {
                tracing::debug!(path = %found.display(), "loaded env file");
                Ok(Some(found))
            }
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(SettingsError::EnvFile {
                path: ".env".to_string(),
                message: e.to_string(),
            }),
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
