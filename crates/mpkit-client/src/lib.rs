//! # mpkit-client
//!
//! Authenticated calls against the WeChat official-account API.
//!
//! [`ApiGateway`] attaches a token from [`mpkit_auth::CredentialManager`] to
//! every request, checks the `{errcode, errmsg}` envelope, and on a token
//! rejection refreshes once and retries once. Resource-specific layers own
//! paths and payload shapes; this crate does not interpret them.

#![deny(unsafe_code)]

pub mod envelope;
pub mod errors;
pub mod gateway;
pub mod request;

pub use envelope::{AUTH_FAILURE_CODES, UNKNOWN_ERROR_CODE, check_envelope};
pub use errors::ApiError;
pub use gateway::{
    ACCESS_TOKEN_PARAM, ApiGateway, MAX_ATTEMPTS, build_http_client, read_file_part,
};
pub use request::{ApiRequest, FilePart, RequestBody};
