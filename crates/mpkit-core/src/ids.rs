//! Branded ID newtypes for type safety.
//!
//! Every identifier the remote service hands out is a plain string on the
//! wire. Wrapping each in its own newtype keeps a draft `media_id` from being
//! passed where a `publish_id` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create from an existing string value.
            #[must_use]
            pub fn from_string(s: String) -> Self {
                Self(s)
            }

            /// Return the inner string as a slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

branded_id! {
    /// Application identity (`appid`) issued by the platform.
    AppId
}

branded_id! {
    /// Identifier of a draft or a permanent/temporary material.
    MediaId
}

branded_id! {
    /// Identifier of an asynchronous publish job.
    PublishId
}

branded_id! {
    /// Identifier of a published article.
    ArticleId
}

/// Application secret paired with an [`AppId`].
///
/// `Debug` never prints the value; use [`AppSecret::expose`] at the single
/// place the secret goes on the wire.
#[derive(Clone, PartialEq, Eq)]
pub struct AppSecret(String);

impl AppSecret {
    /// Wrap a secret value.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Borrow the raw secret.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppSecret(***)")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_and_display() {
        let id = AppId::from("wx1234567890");
        assert_eq!(id.as_str(), "wx1234567890");
        assert_eq!(id.to_string(), "wx1234567890");
    }

    #[test]
    fn serde_is_transparent() {
        let id = MediaId::from("m-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"m-1\"");
        let back: MediaId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn deref_to_str() {
        let id = PublishId::from("p-1");
        assert!(id.starts_with("p-"));
    }

    #[test]
    fn into_inner_roundtrip() {
        let id = ArticleId::from_string("a-1".to_string());
        let s: String = id.into();
        assert_eq!(s, "a-1");
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = AppSecret::new("super-secret");
        let debug = format!("{secret:?}");
        assert!(!debug.contains("super-secret"));
        assert_eq!(secret.expose(), "super-secret");
    }
}
