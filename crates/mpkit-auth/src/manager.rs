//! Access token lifecycle for one application identity.
//!
//! [`CredentialManager`] hands out a usable token on demand:
//! - a cached token is returned with no I/O while `now < expires_at - margin`
//! - otherwise (or when forced) the token endpoint is called, the result is
//!   stored in memory and written to the cache file
//!
//! The cache file is read once, at construction. Refresh is always
//! synchronous with the caller; there is no background renewal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mpkit_core::{AppId, Clock, SystemClock};
use mpkit_settings::MpkitSettings;
use tokio::sync::Mutex;

use crate::errors::AuthError;
use crate::identity::AppIdentity;
use crate::storage;
use crate::types::{Credential, TokenResponse};

/// Token endpoint path, relative to the API base URL.
pub const TOKEN_PATH: &str = "/cgi-bin/token";

/// Where and how tokens are fetched and cached.
#[derive(Clone, Debug)]
pub struct TokenConfig {
    /// Absolute URL of the token endpoint.
    pub token_url: String,
    /// Cache file location.
    pub cache_path: PathBuf,
    /// Seconds before expiry at which a cached token stops being used.
    pub safety_margin_secs: i64,
    /// Lifetime assumed when the endpoint omits `expires_in`.
    pub default_expires_in_secs: i64,
}

impl TokenConfig {
    /// Config for `base_url` caching into `cache_dir`, with default margins.
    pub fn new(base_url: &str, cache_dir: &Path) -> Self {
        let defaults = mpkit_settings::TokenSettings::default();
        Self {
            token_url: join_url(base_url, TOKEN_PATH),
            cache_path: storage::cache_file_path(cache_dir, &defaults.cache_file_name),
            safety_margin_secs: defaults.safety_margin_secs,
            default_expires_in_secs: defaults.default_expires_in_secs,
        }
    }

    /// Config derived from loaded settings.
    ///
    /// A missing `token.cacheDir` means the current directory.
    pub fn from_settings(settings: &MpkitSettings) -> Self {
        let cache_dir = settings
            .token
            .cache_dir
            .as_deref()
            .map_or_else(|| PathBuf::from("."), PathBuf::from);
        Self {
            token_url: join_url(&settings.api.base_url, TOKEN_PATH),
            cache_path: storage::cache_file_path(&cache_dir, &settings.token.cache_file_name),
            safety_margin_secs: settings.token.safety_margin_secs,
            default_expires_in_secs: settings.token.default_expires_in_secs,
        }
    }
}

/// Join a base URL and an absolute path without doubling the slash.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Owns the credential and the cache file for one application identity.
pub struct CredentialManager {
    identity: AppIdentity,
    config: TokenConfig,
    http: reqwest::Client,
    clock: Arc<dyn Clock>,
    // Held across a refresh so concurrent callers wait for one fetch.
    state: Mutex<Credential>,
}

impl CredentialManager {
    /// Create a manager, adopting a matching cache file if one exists.
    pub fn new(identity: AppIdentity, config: TokenConfig) -> Self {
        let cached = storage::load_cache(&config.cache_path, identity.app_id().as_str());
        if cached.is_some() {
            tracing::info!(
                appid = %identity.app_id(),
                path = %config.cache_path.display(),
                "adopted cached access token"
            );
        }

        Self {
            identity,
            config,
            http: reqwest::Client::new(),
            clock: Arc::new(SystemClock),
            state: Mutex::new(cached.unwrap_or_default()),
        }
    }

    /// Use a shared HTTP client for token requests.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Replace the wall clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Application ID this manager serves.
    pub fn app_id(&self) -> &AppId {
        self.identity.app_id()
    }

    /// Token configuration.
    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Return a usable access token, refreshing when stale or when forced.
    pub async fn get_token(&self, force_refresh: bool) -> Result<String, AuthError> {
        let mut state = self.state.lock().await;

        if !force_refresh {
            let now = self.clock.now_secs();
            if let Some(token) = state.usable_token(now, self.config.safety_margin_secs) {
                return Ok(token.to_string());
            }
        }

        self.refresh(&mut state).await
    }

    /// Whether the held token would be returned without a refresh right now.
    pub async fn is_token_usable(&self) -> bool {
        let state = self.state.lock().await;
        state
            .usable_token(self.clock.now_secs(), self.config.safety_margin_secs)
            .is_some()
    }

    /// Absolute expiry of the held token (0 if none has been fetched).
    pub async fn expires_at(&self) -> i64 {
        self.state.lock().await.expires_at
    }

    #[tracing::instrument(skip_all, fields(appid = %self.identity.app_id()))]
    async fn refresh(&self, state: &mut Credential) -> Result<String, AuthError> {
        tracing::debug!("requesting access token");

        let resp = self
            .http
            .get(&self.config.token_url)
            .query(&[
                ("grant_type", "client_credential"),
                ("appid", self.identity.app_id().as_str()),
                ("secret", self.identity.secret().expose()),
            ])
            .send()
            .await?;

        let data: TokenResponse = resp.json().await?;

        if let Some(code) = data.errcode.filter(|c| *c != 0) {
            tracing::warn!(code, "token endpoint rejected credentials");
            return Err(AuthError::Remote {
                code,
                message: data.errmsg.unwrap_or_default(),
            });
        }

        let token = data.access_token.ok_or(AuthError::MissingToken)?;
        let expires_in = data
            .expires_in
            .unwrap_or(self.config.default_expires_in_secs);

        state.token = Some(token.clone());
        state.expires_at = self.clock.now_secs().saturating_add(expires_in);
        tracing::info!(expires_in, "access token refreshed");

        if let Err(e) = storage::save_cache(
            &self.config.cache_path,
            self.identity.app_id().as_str(),
            state,
        ) {
            tracing::warn!(
                path = %self.config.cache_path.display(),
                "failed to write token cache: {e}"
            );
        }

        Ok(token)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
