//! # mpkit-content
//!
//! Resource managers layered on [`mpkit_client::ApiGateway`]:
//!
//! - [`DraftManager`]: draft box CRUD, draft switch, publishing
//! - [`MaterialManager`]: permanent materials, article images, temporary media
//!
//! Managers own endpoint paths and payload shapes. Authentication and the
//! token retry live in the gateway.

#![deny(unsafe_code)]

pub mod article;
pub mod drafts;
pub mod materials;
mod response;

pub use article::{Article, ArticleType};
pub use drafts::DraftManager;
pub use materials::{
    MaterialCount, MaterialKind, MaterialManager, MediaType, TemporaryMedia, VideoDescription,
};
