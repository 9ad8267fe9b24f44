//! Token cache file I/O.
//!
//! One JSON file per cache directory holds the most recently fetched token.
//! The cache is an optimization only: every read failure degrades to "no
//! cache", and callers decide whether a write failure matters.

use std::path::{Path, PathBuf};

use crate::errors::AuthError;
use crate::types::{CacheRecord, Credential};

/// Get the cache file path under the given directory.
pub fn cache_file_path(cache_dir: &Path, file_name: &str) -> PathBuf {
    cache_dir.join(file_name)
}

/// Load the cached credential for `app_id`.
///
/// Returns `None` if the file doesn't exist, can't be read, doesn't parse,
/// or belongs to a different application.
pub fn load_cache(path: &Path, app_id: &str) -> Option<Credential> {
    let data = match std::fs::read_to_string(path) {
        Ok(d) => d,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!("failed to read token cache: {e}");
            return None;
        }
    };

    match serde_json::from_str::<CacheRecord>(&data) {
        Ok(record) if record.appid == app_id => Some(Credential {
            token: record.access_token,
            expires_at: record.expires_at,
        }),
        Ok(_) => {
            tracing::debug!("token cache belongs to another appid, ignoring");
            None
        }
        Err(e) => {
            tracing::warn!("failed to parse token cache: {e}");
            None
        }
    }
}

/// Write the credential for `app_id` to `path`.
///
/// Creates parent directories if needed. Sets file permissions to 0o600.
pub fn save_cache(path: &Path, app_id: &str, credential: &Credential) -> Result<(), AuthError> {
    let record = CacheRecord {
        appid: app_id.to_string(),
        access_token: credential.token.clone(),
        expires_at: credential.expires_at,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(&record)?;
    std::fs::write(path, &json)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        let _ = std::fs::set_permissions(path, perms);
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_path(dir: &TempDir) -> PathBuf {
        cache_file_path(dir.path(), ".wechat_token_cache.json")
    }

    fn make_credential() -> Credential {
        Credential {
            token: Some("tok".to_string()),
            expires_at: 1_700_007_200,
        }
    }

    #[test]
    fn cache_file_path_construction() {
        let p = cache_file_path(Path::new("/srv/app"), ".wechat_token_cache.json");
        assert_eq!(p, PathBuf::from("/srv/app/.wechat_token_cache.json"));
    }

    #[test]
    fn load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(load_cache(&test_path(&dir), "wx1").is_none());
    }

    #[test]
    fn load_invalid_json_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);
        std::fs::write(&path, "not json").unwrap();
        assert!(load_cache(&path, "wx1").is_none());
    }

    #[test]
    fn load_truncated_file_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);
        std::fs::write(&path, r#"{"appid":"wx1","access_tok"#).unwrap();
        assert!(load_cache(&path, "wx1").is_none());
    }

    #[test]
    fn load_other_appid_returns_none() {
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);
        save_cache(&path, "wx-other", &make_credential()).unwrap();
        assert!(load_cache(&path, "wx1").is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);
        save_cache(&path, "wx1", &make_credential()).unwrap();

        let loaded = load_cache(&path, "wx1").unwrap();
        assert_eq!(loaded, make_credential());
    }

    #[test]
    fn file_uses_flat_keys() {
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);
        save_cache(&path, "wx1", &make_credential()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["appid"], "wx1");
        assert_eq!(raw["access_token"], "tok");
        assert_eq!(raw["expires_at"], 1_700_007_200);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cache.json");
        save_cache(&path, "wx1", &make_credential()).unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn save_sets_permissions_0600() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = test_path(&dir);
        save_cache(&path, "wx1", &make_credential()).unwrap();
        let perms = std::fs::metadata(&path).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }

    #[test]
    fn save_into_unwritable_location_errors() {
        let dir = TempDir::new().unwrap();
        // A regular file cannot be a parent directory.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let path = blocker.join("cache.json");
        assert!(save_cache(&path, "wx1", &make_credential()).is_err());
    }
}
