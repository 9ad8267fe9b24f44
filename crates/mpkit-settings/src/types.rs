//! Settings schema.
//!
//! Serialized as camelCase JSON in `~/.mpkit/settings.json`. Every field has
//! a compiled default, so a user file only needs the keys it changes.

use serde::{Deserialize, Serialize};

/// Default remote API host.
pub const DEFAULT_BASE_URL: &str = "https://api.weixin.qq.com";

/// Default token cache file name, one per cache directory.
pub const DEFAULT_CACHE_FILE_NAME: &str = ".wechat_token_cache.json";

/// Seconds subtracted from a token's reported expiry before it is considered stale.
pub const DEFAULT_SAFETY_MARGIN_SECS: i64 = 300;

/// Token lifetime assumed when the token endpoint omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 7200;

/// Top-level settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MpkitSettings {
    /// Remote API transport settings.
    pub api: ApiSettings,
    /// Token cache and expiry settings.
    pub token: TokenSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Remote API transport settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Whole-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 30_000,
            connect_timeout_ms: 10_000,
            user_agent: mpkit_core::constants::default_user_agent(),
        }
    }
}

/// Token cache and expiry settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenSettings {
    /// Directory holding the cache file. `None` means the current directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
    /// Cache file name inside `cache_dir`.
    pub cache_file_name: String,
    /// Seconds before expiry at which a cached token stops being used.
    pub safety_margin_secs: i64,
    /// Lifetime assumed when the token endpoint omits `expires_in`.
    pub default_expires_in_secs: i64,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            cache_dir: None,
            cache_file_name: DEFAULT_CACHE_FILE_NAME.to_string(),
            safety_margin_secs: DEFAULT_SAFETY_MARGIN_SECS,
            default_expires_in_secs: DEFAULT_EXPIRES_IN_SECS,
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
