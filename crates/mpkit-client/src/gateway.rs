//! Authenticated API calls.
//!
//! Every call follows the same state machine:
//!
//! ```text
//! ATTEMPT_1 ─ok──────────────────────────────▶ DONE
//!     │
//!     ├─auth failure─▶ REFRESH ─▶ ATTEMPT_2 ─▶ DONE | FAIL
//!     │
//!     └─other failure─────────────────────────▶ FAIL
//! ```
//!
//! The attempt loop is bounded by [`MAX_ATTEMPTS`]. Binary downloads make a
//! single attempt.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use mpkit_auth::{CredentialManager, join_url};
use mpkit_settings::ApiSettings;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, warn};

use crate::envelope::check_envelope;
use crate::errors::ApiError;
use crate::request::{ApiRequest, FilePart, RequestBody};

/// Upper bound on attempts for one logical call.
pub const MAX_ATTEMPTS: u32 = 2;

/// Query parameter carrying the access token.
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

const MAX_ERROR_BODY_CHARS: usize = 512;

/// HTTP client with the configured timeouts and user agent.
///
/// Build it once and hand clones to both the credential manager and the
/// gateway so token requests obey the same transport settings.
pub fn build_http_client(settings: &ApiSettings) -> Result<reqwest::Client, ApiError> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(settings.request_timeout_ms))
        .connect_timeout(Duration::from_millis(settings.connect_timeout_ms))
        .user_agent(settings.user_agent.clone())
        .build()?;
    Ok(http)
}

/// Issues authenticated calls against one API host.
#[derive(Clone)]
pub struct ApiGateway {
    credentials: Arc<CredentialManager>,
    http: reqwest::Client,
    base_url: String,
}

impl ApiGateway {
    /// Gateway with a default HTTP client.
    pub fn new(credentials: Arc<CredentialManager>, base_url: impl Into<String>) -> Self {
        Self {
            credentials,
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Replace the HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// The credential manager supplying tokens.
    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.credentials
    }

    /// Base URL every path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one authenticated call and return the parsed JSON response.
    ///
    /// An auth-failure code on the first attempt forces a token refresh and
    /// one more attempt. The second attempt's outcome is final.
    #[tracing::instrument(skip_all, fields(method = %request.method, path = %request.path))]
    pub async fn call(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let mut attempt = 1;
        let mut force_refresh = false;

        loop {
            let token = self.credentials.get_token(force_refresh).await?;
            let value = self.send(&request, &token).await?;

            match check_envelope(&value) {
                Ok(()) => return Ok(value),
                Err(err) if err.is_auth_failure() && attempt < MAX_ATTEMPTS => {
                    warn!(attempt, "token rejected, refreshing and retrying: {err}");
                    attempt += 1;
                    force_refresh = true;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// `GET` with query parameters.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        let mut request = ApiRequest::get(path);
        for (key, value) in query {
            request = request.query(*key, *value);
        }
        self.call(request).await
    }

    /// `POST` with a JSON body.
    pub async fn post_json(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.call(ApiRequest::post(path).json(body)).await
    }

    /// `POST` with a urlencoded form body.
    pub async fn post_form(
        &self,
        path: &str,
        fields: Vec<(String, String)>,
    ) -> Result<Value, ApiError> {
        self.call(ApiRequest::post(path).form(fields)).await
    }

    /// Upload one file as multipart field `field_name`, with `extra_fields` alongside.
    ///
    /// The file is read fully before any token or network activity. A missing
    /// file fails with [`ApiError::FileNotFound`].
    pub async fn upload_file(
        &self,
        path: &str,
        file_path: &Path,
        field_name: &str,
        extra_fields: Vec<(String, String)>,
    ) -> Result<Value, ApiError> {
        let file = read_file_part(file_path, field_name).await?;
        debug!(file = %file.file_name, size = file.content.len(), "uploading file");
        self.call(ApiRequest::post(path).multipart(vec![file], extra_fields))
            .await
    }

    /// Download a binary payload.
    ///
    /// Uses `POST` when `json_body` is given, `GET` otherwise. A JSON or
    /// plain-text response carrying a non-zero `errcode` fails with
    /// [`ApiError::Remote`]; any other body is returned unchanged. There is
    /// no auth retry.
    #[tracing::instrument(skip_all, fields(path = %path))]
    pub async fn download_binary(
        &self,
        path: &str,
        query: &[(&str, &str)],
        json_body: Option<&Value>,
    ) -> Result<Bytes, ApiError> {
        let token = self.credentials.get_token(false).await?;

        let mut request = match json_body {
            Some(body) => ApiRequest::post(path).json(body.clone()),
            None => ApiRequest::get(path),
        };
        for (key, value) in query {
            request = request.query(*key, *value);
        }

        let resp = self.build(&request, &token)?.send().await?;
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let body = resp.bytes().await?;

        if content_type.contains("application/json") || content_type.contains("text/plain") {
            match serde_json::from_slice::<Value>(&body) {
                Ok(value) => check_envelope(&value)?,
                Err(e) => debug!("text response is not an envelope, returning raw body: {e}"),
            }
        }

        debug!(size = body.len(), "download complete");
        Ok(body)
    }

    async fn send(&self, request: &ApiRequest, token: &str) -> Result<Value, ApiError> {
        let resp = self.build(request, token)?.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| {
            warn!(status, "response is not JSON: {e}");
            ApiError::InvalidResponse {
                status,
                body: String::from_utf8_lossy(&body)
                    .chars()
                    .take(MAX_ERROR_BODY_CHARS)
                    .collect(),
            }
        })
    }

    fn build(
        &self,
        request: &ApiRequest,
        token: &str,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = join_url(&self.base_url, &request.path);
        let builder = self
            .http
            .request(request.method.clone(), url)
            .query(&request.query)
            .query(&[(ACCESS_TOKEN_PARAM, token)]);

        let builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(value)?),
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Multipart { files, fields } => {
                builder.multipart(multipart_form(files, fields))
            }
        };
        Ok(builder)
    }
}

fn multipart_form(files: &[FilePart], fields: &[(String, String)]) -> Form {
    let form = fields
        .iter()
        .fold(Form::new(), |form, (key, value)| form.text(key.clone(), value.clone()));
    files.iter().fold(form, |form, file| {
        let part = Part::bytes(file.content.to_vec()).file_name(file.file_name.clone());
        form.part(file.field_name.clone(), part)
    })
}

/// Read a file into a multipart part named `field_name`.
pub async fn read_file_part(file_path: &Path, field_name: &str) -> Result<FilePart, ApiError> {
    let content = match tokio::fs::read(file_path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::FileNotFound(file_path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let file_name = file_path
        .file_name()
        .map_or_else(|| "file".to_string(), |n| n.to_string_lossy().into_owned());

    Ok(FilePart {
        field_name: field_name.to_string(),
        file_name,
        content: Bytes::from(content),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn read_file_part_uses_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.jpg");
        std::fs::write(&path, b"jpeg").unwrap();

        let part = read_file_part(&path, "media").await.unwrap();
        assert_eq!(part.field_name, "media");
        assert_eq!(part.file_name, "cover.jpg");
        assert_eq!(&part.content[..], b"jpeg");
    }

    #[tokio::test]
    async fn read_file_part_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");
        assert_matches!(
            read_file_part(&path, "media").await,
            Err(ApiError::FileNotFound(p)) if p == path
        );
    }

    #[tokio::test]
    async fn read_file_part_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(read_file_part(dir.path(), "media").await, Err(ApiError::Io(_)));
    }
}
