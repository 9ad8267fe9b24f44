//! Shared mock-host setup for manager tests.

#![allow(dead_code)]

use std::sync::Arc;

use mpkit_auth::{AppIdentity, CredentialManager, TOKEN_PATH, TokenConfig};
use mpkit_client::ApiGateway;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub struct Host {
    pub server: MockServer,
    pub gateway: Arc<ApiGateway>,
    _dir: TempDir,
}

impl Host {
    /// Mock host that always issues token `T1`.
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TOKEN_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "T1", "expires_in": 7200})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let credentials = Arc::new(CredentialManager::new(
            AppIdentity::new("A1", "S1").unwrap(),
            TokenConfig::new(&server.uri(), dir.path()),
        ));
        let gateway = Arc::new(ApiGateway::new(credentials, server.uri()));
        Self {
            server,
            gateway,
            _dir: dir,
        }
    }

    /// Answer `verb path` with `body`.
    pub async fn reply(&self, verb: &str, endpoint: &str, body: Value) {
        Mock::given(method(verb))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Requests received at `endpoint`.
    pub async fn requests_to(&self, endpoint: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == endpoint)
            .collect()
    }

    /// JSON body of the only request received at `endpoint`.
    pub async fn sent_json(&self, endpoint: &str) -> Value {
        let requests = self.requests_to(endpoint).await;
        assert_eq!(requests.len(), 1, "expected one request to {endpoint}");
        serde_json::from_slice(&requests[0].body).unwrap()
    }

    /// Total requests of any kind.
    pub async fn total_requests(&self) -> usize {
        self.server.received_requests().await.unwrap_or_default().len()
    }
}
