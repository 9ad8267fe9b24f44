//! # mpkit-settings
//!
//! Layered configuration for mpkit.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`MpkitSettings::default()`]
//! 2. **User file**: `~/.mpkit/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `MPKIT_*` overrides (highest priority)
//!
//! Application credentials are not settings; they come from explicit
//! arguments or `WECHAT_APPID`/`WECHAT_APPSECRET`, which [`load_env_file`]
//! can populate from a `.env` file.

#![deny(unsafe_code)]

pub mod env;
pub mod errors;
pub mod loader;
pub mod types;

pub use env::load_env_file;
pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path, validate};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
