//! Integration tests for the Homestyle storefront API.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory API tests (no services needed)
//! cargo test -p homestyle-integration-tests
//!
//! # PostgreSQL repository tests
//! TEST_DATABASE_URL=postgres://... cargo test -p homestyle-integration-tests -- --ignored
//! ```
//!
//! [`TestServer`] binds the in-memory app to an ephemeral port so requests go
//! through the real listener, session cookies and middleware stack.

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use homestyle_storefront::config::StorefrontConfig;

/// A running in-memory storefront. Aborted on drop.
pub struct TestServer {
    base_url: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server over the sample catalog with rate limiting off.
    pub async fn start() -> Self {
        Self::with_config(StorefrontConfig::in_memory()).await
    }

    /// Start a server with a custom configuration.
    pub async fn with_config(config: StorefrontConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let app = homestyle_storefront::memory_app(config);

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A client with its own cookie jar, i.e. its own session.
    #[must_use]
    pub fn client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    pub async fn get(&self, client: &Client, path: &str) -> (StatusCode, Value) {
        let resp = client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed");
        read_json(resp).await
    }

    pub async fn post(&self, client: &Client, path: &str, body: &Value) -> (StatusCode, Value) {
        let resp = client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST request failed");
        read_json(resp).await
    }

    pub async fn put(&self, client: &Client, path: &str, body: &Value) -> (StatusCode, Value) {
        let resp = client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("PUT request failed");
        read_json(resp).await
    }

    /// Register `username` on `client`, leaving it logged in.
    pub async fn register(&self, client: &Client, username: &str) -> Value {
        let (status, body) = self
            .post(
                client,
                "/api/register",
                &json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "password123",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Status plus JSON body; non-JSON bodies come back as a JSON string.
async fn read_json(resp: reqwest::Response) -> (StatusCode, Value) {
    let status = resp.status();
    let text = resp.text().await.expect("Failed to read response body");
    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
    (status, body)
}
