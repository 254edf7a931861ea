//! HTTP client abstraction for the knowledge source
//!
//! The semantic tier only ever issues GET requests against the
//! knowledge-base endpoint, so the surface here is deliberately small:
//! an abstract client trait (swappable in tests), a production reqwest
//! implementation, and a canned client for fault injection.

use crate::constants::{KNOWLEDGE_FETCH_TIMEOUT_MS_DEFAULT, KNOWLEDGE_RESPONSE_BYTES_MAX};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// An HTTP GET request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request timeout
    pub timeout: Duration,
}

impl HttpRequest {
    /// Create a new GET request with the default timeout
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            timeout: Duration::from_millis(KNOWLEDGE_FETCH_TIMEOUT_MS_DEFAULT),
        }
    }

    /// Add a header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// An HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
}

impl HttpResponse {
    /// Create a new response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// HTTP client errors
#[derive(Debug, Clone)]
pub enum HttpError {
    /// Request timed out
    Timeout { timeout_ms: u64 },
    /// Connection failed
    ConnectionFailed { reason: String },
    /// Request failed
    RequestFailed { reason: String },
    /// Response too large
    ResponseTooLarge { size: u64, max: u64 },
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::Timeout { timeout_ms } => {
                write!(f, "HTTP request timed out after {}ms", timeout_ms)
            }
            HttpError::ConnectionFailed { reason } => {
                write!(f, "HTTP connection failed: {}", reason)
            }
            HttpError::RequestFailed { reason } => write!(f, "HTTP request failed: {}", reason),
            HttpError::ResponseTooLarge { size, max } => {
                write!(
                    f,
                    "HTTP response too large: {} bytes (max: {} bytes)",
                    size, max
                )
            }
        }
    }
}

impl std::error::Error for HttpError {}

/// HTTP client result type
pub type HttpResult<T> = Result<T, HttpError>;

/// Abstract HTTP client trait
///
/// Production code uses [`ReqwestHttpClient`]; tests inject
/// [`StaticHttpClient`] or [`FailingHttpClient`] to exercise the
/// semantic tier's fallback path without a network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request
    async fn execute(&self, request: HttpRequest) -> HttpResult<HttpResponse>;

    /// Convenience method for GET requests
    async fn get(&self, url: &str) -> HttpResult<HttpResponse> {
        self.execute(HttpRequest::get(url)).await
    }
}

/// Production HTTP client using reqwest
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new reqwest HTTP client
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(KNOWLEDGE_FETCH_TIMEOUT_MS_DEFAULT))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Create with custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> HttpResult<HttpResponse> {
        let mut builder = self.client.get(&request.url);

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        builder = builder.timeout(request.timeout);

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout {
                    timeout_ms: request.timeout.as_millis() as u64,
                }
            } else if e.is_connect() {
                HttpError::ConnectionFailed {
                    reason: e.to_string(),
                }
            } else {
                HttpError::RequestFailed {
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();

        let body = response
            .text()
            .await
            .map_err(|e| HttpError::RequestFailed {
                reason: e.to_string(),
            })?;

        if body.len() as u64 > KNOWLEDGE_RESPONSE_BYTES_MAX {
            return Err(HttpError::ResponseTooLarge {
                size: body.len() as u64,
                max: KNOWLEDGE_RESPONSE_BYTES_MAX,
            });
        }

        Ok(HttpResponse { status, body })
    }
}

/// Create the default HTTP client for production use
pub fn default_http_client() -> Arc<dyn HttpClient> {
    Arc::new(ReqwestHttpClient::new())
}

/// Canned HTTP client returning a fixed response
///
/// Not suitable for production - use only for testing.
#[derive(Debug, Clone)]
pub struct StaticHttpClient {
    status: u16,
    body: String,
}

impl StaticHttpClient {
    /// Create a client that always returns the given status and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Create a client that always returns 200 with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }
}

#[async_trait]
impl HttpClient for StaticHttpClient {
    async fn execute(&self, _request: HttpRequest) -> HttpResult<HttpResponse> {
        Ok(HttpResponse::new(self.status, self.body.clone()))
    }
}

/// HTTP client that fails every request
///
/// Not suitable for production - use only for testing.
#[derive(Debug, Clone, Default)]
pub struct FailingHttpClient;

#[async_trait]
impl HttpClient for FailingHttpClient {
    async fn execute(&self, request: HttpRequest) -> HttpResult<HttpResponse> {
        Err(HttpError::ConnectionFailed {
            reason: format!("unreachable endpoint: {}", request.url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_builder() {
        let req = HttpRequest::get("https://example.com/knowledge")
            .with_header("Authorization", "Bearer token")
            .with_timeout(Duration::from_secs(10));

        assert_eq!(req.url, "https://example.com/knowledge");
        assert_eq!(
            req.headers.get("Authorization"),
            Some(&"Bearer token".to_string())
        );
        assert_eq!(req.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_http_response() {
        let resp = HttpResponse::new(200, r#"{"key": "value"}"#);

        assert!(resp.is_success());
        assert_eq!(resp.status, 200);

        let json: serde_json::Value = resp.json().unwrap();
        assert_eq!(json["key"], "value");
    }

    #[test]
    fn test_http_response_not_success() {
        let resp = HttpResponse::new(404, "Not Found");
        assert!(!resp.is_success());
    }

    #[tokio::test]
    async fn test_static_client() {
        let client = StaticHttpClient::ok(r#"{"ok": true}"#);
        let resp = client.get("http://example.com").await.unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.json::<serde_json::Value>().unwrap()["ok"], true);
    }

    #[tokio::test]
    async fn test_failing_client() {
        let client = FailingHttpClient;
        let result = client.get("http://example.com").await;
        assert!(matches!(result, Err(HttpError::ConnectionFailed { .. })));
    }
}
