//! In-process fake transport for unit and integration tests
//!
//! [`FakeTransport`] replays a queue of scripted responses in order and
//! records every request it was asked to send. Clones share the same queue
//! and log, so a test can keep one handle while the code under test owns
//! another (usually as `Arc<dyn Transport>`).
//!
//! # Example
//!
//! ```
//! use artdesk::transport::fake::FakeTransport;
//! use artdesk::transport::{ApiRequest, Transport};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let transport = FakeTransport::new();
//! transport.push_json(200, json!({"data": []}));
//!
//! let response = transport.send(ApiRequest::get("/articles")).await.unwrap();
//! assert_eq!(response.status, 200);
//! assert_eq!(transport.requests()[0].path, "/articles");
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::error::{ArtdeskError, Result};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// One scripted reply: either a response or a transport failure message.
type Scripted = std::result::Result<ApiResponse, String>;

#[derive(Debug, Default)]
struct Inner {
    replies: VecDeque<Scripted>,
    requests: Vec<ApiRequest>,
}

/// Scripted [`Transport`] for tests
#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
    inner: Arc<Mutex<Inner>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking test thread must not poison the script for the others.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a response with the given status and JSON body.
    pub fn push_json(&self, status: u16, body: Value) {
        self.lock()
            .replies
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    /// Queue a response with an empty body.
    pub fn push_empty(&self, status: u16) {
        self.push_json(status, Value::Null);
    }

    /// Queue a transport-level failure (e.g. connection refused).
    pub fn push_failure(&self, message: impl Into<String>) {
        self.lock().replies.push_back(Err(message.into()));
    }

    /// Every request sent so far, oldest first.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.lock().requests.last().cloned()
    }

    /// Number of scripted replies not yet consumed.
    pub fn pending(&self) -> usize {
        self.lock().replies.len()
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    /// Record `request` and pop the next scripted reply.
    ///
    /// # Errors
    ///
    /// Returns [`ArtdeskError::Transport`] for scripted failures and when the
    /// script is exhausted.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut inner = self.lock();
        let description = format!("{} {}", request.method, request.path);
        inner.requests.push(request);

        match inner.replies.pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(ArtdeskError::Transport(message).into()),
            None => Err(ArtdeskError::Transport(format!(
                "no scripted response for {}",
                description
            ))
            .into()),
        }
    }
}
