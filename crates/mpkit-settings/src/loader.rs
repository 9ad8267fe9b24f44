//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`MpkitSettings::default()`]
//! 2. If `~/.mpkit/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `MPKIT_*` environment variable overrides (highest priority)
//! 4. Validate the result

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::MpkitSettings;

/// Resolve the path to the settings file (`~/.mpkit/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".mpkit").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<MpkitSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<MpkitSettings> {
    let defaults = serde_json::to_value(MpkitSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: MpkitSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    validate(&settings)?;
    Ok(settings)
}

/// Reject values no request could succeed with.
pub fn validate(settings: &MpkitSettings) -> Result<()> {
    let base = &settings.api.base_url;
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(SettingsError::InvalidValue(format!(
            "api.baseUrl must be an http(s) URL, got {base:?}"
        )));
    }
    if settings.token.safety_margin_secs < 0 {
        return Err(SettingsError::InvalidValue(
            "token.safetyMarginSecs must not be negative".to_string(),
        ));
    }
    if settings.token.default_expires_in_secs <= 0 {
        return Err(SettingsError::InvalidValue(
            "token.defaultExpiresInSecs must be positive".to_string(),
        ));
    }
    if settings.token.cache_file_name.is_empty() {
        return Err(SettingsError::InvalidValue(
            "token.cacheFileName must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply process environment overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut MpkitSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Empty values are treated as unset. Out-of-range or unparseable numbers
/// are ignored with a warning, leaving the file/default value in place.
pub fn apply_overrides(settings: &mut MpkitSettings, lookup: impl Fn(&str) -> Option<String>) {
    let read_string = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read_string("MPKIT_BASE_URL") {
        settings.api.base_url = v;
    }
    if let Some(v) = read_string("MPKIT_CACHE_DIR") {
        settings.token.cache_dir = Some(v);
    }
    if let Some(v) = read_string("MPKIT_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(raw) = read_string("MPKIT_REQUEST_TIMEOUT_MS") {
        match parse_u64_range(&raw, 1000, 600_000) {
            Some(v) => settings.api.request_timeout_ms = v,
            None => warn_invalid("MPKIT_REQUEST_TIMEOUT_MS", &raw),
        }
    }
    if let Some(raw) = read_string("MPKIT_SAFETY_MARGIN_SECS") {
        match parse_i64_range(&raw, 0, 3600) {
            Some(v) => settings.token.safety_margin_secs = v,
            None => warn_invalid("MPKIT_SAFETY_MARGIN_SECS", &raw),
        }
    }
}

fn warn_invalid(name: &str, value: &str) {
    tracing::warn!(key = name, value = %value, "invalid env var, ignoring");
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as an `i64` within a range.
pub fn parse_i64_range(val: &str, min: i64, max: i64) -> Option<i64> {
    let n: i64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use serde_json::json;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn settings_path_ends_with_mpkit_settings() {
        let p = settings_path();
        assert!(p.ends_with(".mpkit/settings.json"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from_path(&dir.path().join("nope.json")).unwrap();
        assert_eq!(s.token.cache_file_name, ".wechat_token_cache.json");
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"api":{"baseUrl":"http://127.0.0.1:9000"},"token":{"safetyMarginSecs":60}}"#,
        )
        .unwrap();

        let s = load_settings_from_path(&path).unwrap();
        assert_eq!(s.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(s.api.request_timeout_ms, 30_000);
        assert_eq!(s.token.safety_margin_secs, 60);
        assert_eq!(s.token.default_expires_in_secs, 7200);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_settings_from_path(&path).is_err());
    }

    #[test]
    fn deep_merge_nested_objects() {
        let target = json!({"a": {"x": 1, "y": 2}, "b": 3});
        let source = json!({"a": {"y": 20}});
        let merged = deep_merge(target, source);
        assert_eq!(merged, json!({"a": {"x": 1, "y": 20}, "b": 3}));
    }

    #[test]
    fn deep_merge_skips_nulls() {
        let merged = deep_merge(json!({"a": 1}), json!({"a": null}));
        assert_eq!(merged["a"], 1);
    }

    #[test]
    fn deep_merge_replaces_arrays() {
        let merged = deep_merge(json!({"a": [1, 2]}), json!({"a": [3]}));
        assert_eq!(merged["a"], json!([3]));
    }

    #[test]
    fn overrides_apply() {
        let mut s = MpkitSettings::default();
        apply_overrides(
            &mut s,
            lookup_from(&[
                ("MPKIT_BASE_URL", "http://localhost:1"),
                ("MPKIT_CACHE_DIR", "/tmp/mp"),
                ("MPKIT_LOG_LEVEL", "debug"),
                ("MPKIT_REQUEST_TIMEOUT_MS", "5000"),
                ("MPKIT_SAFETY_MARGIN_SECS", "120"),
            ]),
        );
        assert_eq!(s.api.base_url, "http://localhost:1");
        assert_eq!(s.token.cache_dir.as_deref(), Some("/tmp/mp"));
        assert_eq!(s.logging.level, "debug");
        assert_eq!(s.api.request_timeout_ms, 5000);
        assert_eq!(s.token.safety_margin_secs, 120);
    }

    #[test]
    fn invalid_overrides_are_ignored() {
        let mut s = MpkitSettings::default();
        apply_overrides(
            &mut s,
            lookup_from(&[
                ("MPKIT_REQUEST_TIMEOUT_MS", "5"),
                ("MPKIT_SAFETY_MARGIN_SECS", "soon"),
                ("MPKIT_BASE_URL", ""),
            ]),
        );
        assert_eq!(s.api.request_timeout_ms, 30_000);
        assert_eq!(s.token.safety_margin_secs, 300);
        assert_eq!(s.api.base_url, "https://api.weixin.qq.com");
    }

    #[test]
    fn validation_rejects_bad_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"api":{"baseUrl":"api.weixin.qq.com"}}"#).unwrap();
        assert!(matches!(
            load_settings_from_path(&path),
            Err(SettingsError::InvalidValue(_))
        ));

        std::fs::write(&path, r#"{"token":{"defaultExpiresInSecs":0}}"#).unwrap();
        assert!(matches!(
            load_settings_from_path(&path),
            Err(SettingsError::InvalidValue(_))
        ));
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&MpkitSettings::default()).is_ok());
    }

    #[test]
    fn parse_ranges() {
        assert_eq!(parse_u64_range("1500", 1000, 2000), Some(1500));
        assert_eq!(parse_u64_range("999", 1000, 2000), None);
        assert_eq!(parse_u64_range("abc", 0, 10), None);
        assert_eq!(parse_i64_range("0", 0, 3600), Some(0));
        assert_eq!(parse_i64_range("-1", 0, 3600), None);
    }
}
