//! # mpkit-core
//!
//! Foundation types shared by every mpkit crate.
//!
//! - **Branded IDs**: [`AppId`], [`MediaId`], [`PublishId`], [`ArticleId`] as
//!   newtypes so a draft ID is never passed where a publish ID is expected
//! - **Secrets**: [`AppSecret`] with a redacted `Debug`
//! - **Clock**: [`Clock`] trait with [`SystemClock`] and [`ManualClock`]
//! - **Logging**: [`logging::init_subscriber`] for binaries

#![deny(unsafe_code)]

pub mod constants;
pub mod ids;
pub mod logging;
pub mod time;

pub use ids::{AppId, AppSecret, ArticleId, MediaId, PublishId};
pub use time::{Clock, ManualClock, SystemClock};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
