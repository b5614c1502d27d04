//! HTTP transport backed by `reqwest`
//!
//! Every [`ApiRequest`] is issued against `base_url` + `path`. JSON bodies
//! are sent with `Content-Type: application/json`, the bearer token (if any)
//! as `Authorization: Bearer <token>`. The per-request timeout comes from the
//! configuration; there is no retry.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::error::{ArtdeskError, Result};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

/// `reqwest`-based [`Transport`]
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use artdesk::transport::http::HttpTransport;
///
/// let transport = HttpTransport::new(
///     url::Url::parse("http://localhost:1337/api").unwrap(),
///     Duration::from_secs(30),
/// ).unwrap();
/// assert_eq!(transport.endpoint("/articles"), "http://localhost:1337/api/articles");
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: url::Url,
}

impl HttpTransport {
    /// Construct a transport targeting `base_url`.
    ///
    /// No network I/O is performed at construction time.
    ///
    /// # Errors
    ///
    /// Returns [`ArtdeskError::Http`] if the TLS backend cannot be
    /// initialised.
    pub fn new(base_url: url::Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(ArtdeskError::Http)?;

        Ok(Self { client, base_url })
    }

    /// Full URL for a backend path.
    ///
    /// The base URL may carry its own path prefix (e.g. `/api`), so the
    /// path is appended textually rather than resolved with `Url::join`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.endpoint(&request.path);
        tracing::debug!("{} {}", request.method, url);

        let mut req = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if let Some(token) = &request.bearer {
            req = req.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!("{} {} failed: {}", request.method, url, e);
            ArtdeskError::Transport(format!("{} {} failed: {}", request.method, request.path, e))
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            tracing::error!("Failed to read response body from {}: {}", url, e);
            ArtdeskError::Transport(format!("Failed to read response body: {}", e))
        })?;

        // Non-JSON bodies are kept as a string; callers that need a
        // structured body fail when decoding it.
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::debug!("Response from {} is not JSON: {}", url, e);
                Value::String(text)
            })
        };

        tracing::debug!("{} {} -> {}", request.method, url, status);
        Ok(ApiResponse::new(status, body))
    }
}
