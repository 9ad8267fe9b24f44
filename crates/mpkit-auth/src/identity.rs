//! Application identity resolution.
//!
//! Explicit values take priority; otherwise `WECHAT_APPID` and
//! `WECHAT_APPSECRET` are read from the process environment. Empty strings
//! count as absent.

use mpkit_core::{AppId, AppSecret};

use crate::errors::AuthError;

/// Environment variable holding the application ID.
pub const APP_ID_ENV: &str = "WECHAT_APPID";

/// Environment variable holding the application secret.
pub const APP_SECRET_ENV: &str = "WECHAT_APPSECRET";

/// The `(appid, secret)` pair identifying the calling application.
#[derive(Clone, Debug)]
pub struct AppIdentity {
    app_id: AppId,
    secret: AppSecret,
}

impl AppIdentity {
    /// Build an identity from explicit values.
    pub fn new(app_id: impl Into<String>, secret: impl Into<String>) -> Result<Self, AuthError> {
        Self::resolve_with(Some(app_id.into()), Some(secret.into()), |_| None)
    }

    /// Resolve from explicit values, falling back to the process environment.
    pub fn resolve(app_id: Option<String>, secret: Option<String>) -> Result<Self, AuthError> {
        Self::resolve_with(app_id, secret, |name| std::env::var(name).ok())
    }

    /// Resolve from explicit values, falling back to `lookup`.
    pub fn resolve_with(
        app_id: Option<String>,
        secret: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AuthError> {
        let pick = |explicit: Option<String>, env: &str| {
            explicit
                .filter(|v| !v.is_empty())
                .or_else(|| lookup(env).filter(|v| !v.is_empty()))
        };

        let app_id = pick(app_id, APP_ID_ENV);
        let secret = pick(secret, APP_SECRET_ENV);

        match (app_id, secret) {
            (Some(app_id), Some(secret)) => Ok(Self {
                app_id: AppId::from(app_id),
                secret: AppSecret::new(secret),
            }),
            (app_id, secret) => {
                let mut missing = Vec::new();
                if app_id.is_none() {
                    missing.push(APP_ID_ENV);
                }
                if secret.is_none() {
                    missing.push(APP_SECRET_ENV);
                }
                Err(AuthError::Configuration(format!(
                    "missing {}; pass them explicitly, export them, or put them in a .env file",
                    missing.join(" and ")
                )))
            }
        }
    }

    /// The application ID.
    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    /// The application secret.
    pub fn secret(&self) -> &AppSecret {
        &self.secret
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
