//! # mpkit-auth
//!
//! Access token management for a WeChat official account.
//!
//! - [`AppIdentity`]: `(appid, secret)` from explicit values or the environment
//! - [`CredentialManager`]: returns a usable token, refreshing when it is
//!   within the safety margin of expiry or when the caller forces it
//! - Cache file persistence in [`storage`], shared with earlier tooling

#![deny(unsafe_code)]

pub mod errors;
pub mod identity;
pub mod manager;
pub mod storage;
pub mod types;

pub use errors::AuthError;
pub use identity::{APP_ID_ENV, APP_SECRET_ENV, AppIdentity};
pub use manager::{CredentialManager, TOKEN_PATH, TokenConfig, join_url};
pub use storage::{cache_file_path, load_cache, save_cache};
pub use types::{CacheRecord, Credential};
