//! Request description.
//!
//! An [`ApiRequest`] is plain data. The gateway rebuilds the HTTP request
//! from it on every attempt, so a retried call sends exactly what the first
//! attempt sent, with only the token changed.

use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;

/// One file attached to a multipart body.
#[derive(Clone, Debug)]
pub struct FilePart {
    /// Form field name.
    pub field_name: String,
    /// File name reported to the server.
    pub file_name: String,
    /// File contents.
    pub content: Bytes,
}

/// Request payload.
#[derive(Clone, Debug, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// UTF-8 JSON with non-ASCII characters sent literally.
    Json(Value),
    /// `application/x-www-form-urlencoded` fields.
    Form(Vec<(String, String)>),
    /// `multipart/form-data` with files and plain text fields.
    Multipart {
        /// Attached files.
        files: Vec<FilePart>,
        /// Text fields sent alongside the files.
        fields: Vec<(String, String)>,
    },
}

/// A single logical API call, before the access token is attached.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Endpoint path, e.g. `/cgi-bin/draft/add`.
    pub path: String,
    /// Query parameters, excluding `access_token`.
    pub query: Vec<(String, String)>,
    /// Payload.
    pub body: RequestBody,
}

impl ApiRequest {
    /// Request with an arbitrary method and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Set a urlencoded form body.
    #[must_use]
    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    /// Set a multipart body.
    #[must_use]
    pub fn multipart(mut self, files: Vec<FilePart>, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Multipart { files, fields };
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builder_accumulates_query() {
        let req = ApiRequest::get("/cgi-bin/media/get")
            .query("media_id", "M1")
            .query("type", "image");
        assert_eq!(req.method, Method::GET);
        assert_eq!(
            req.query,
            vec![
                ("media_id".to_string(), "M1".to_string()),
                ("type".to_string(), "image".to_string())
            ]
        );
        assert!(matches!(req.body, RequestBody::Empty));
    }

    #[test]
    fn json_body_replaces_previous_body() {
        let req = ApiRequest::post("/x")
            .form(vec![("a".into(), "b".into())])
            .json(json!({"k": 1}));
        assert!(matches!(req.body, RequestBody::Json(ref v) if v["k"] == 1));
    }

    #[test]
    fn clone_keeps_file_bytes() {
        let req = ApiRequest::post("/x").multipart(
            vec![FilePart {
                field_name: "media".into(),
                file_name: "a.png".into(),
                content: Bytes::from_static(b"\x89PNG"),
            }],
            vec![],
        );
        let copy = req.clone();
        match copy.body {
            RequestBody::Multipart { files, .. } => assert_eq!(&files[0].content[..], b"\x89PNG"),
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
