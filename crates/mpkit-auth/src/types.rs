//! Credential state and its wire/disk projections.

use serde::{Deserialize, Deserializer, Serialize};

/// In-memory authorization state for one application identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credential {
    /// Current access token, if one has been fetched or adopted from cache.
    pub token: Option<String>,
    /// Absolute expiry in seconds since the Unix epoch (0 if never fetched).
    pub expires_at: i64,
}

impl Credential {
    /// The token, if it is still usable at `now` given `safety_margin` seconds.
    pub fn usable_token(&self, now: i64, safety_margin: i64) -> Option<&str> {
        self.token
            .as_deref()
            .filter(|_| now < self.expires_at.saturating_sub(safety_margin))
    }
}

/// On-disk projection of a [`Credential`].
///
/// Field names match the cache files written by earlier tooling, so an
/// existing cache is adopted rather than discarded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Application ID the token belongs to.
    pub appid: String,
    /// Cached access token.
    pub access_token: Option<String>,
    /// Absolute expiry in seconds since the Unix epoch.
    #[serde(default, deserialize_with = "epoch_secs")]
    pub expires_at: i64,
}

/// Accept integer or fractional seconds.
#[allow(clippy::cast_possible_truncation)]
fn epoch_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = serde_json::Number::deserialize(deserializer)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .ok_or_else(|| serde::de::Error::custom("expires_at out of range"))
}

/// Token endpoint response.
///
/// Success carries `access_token`/`expires_in`; failure carries
/// `errcode`/`errmsg`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
    pub errcode: Option<i64>,
    pub errmsg: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
