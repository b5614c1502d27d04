//! Backend transport abstraction and implementations
//!
//! This module defines the [`Transport`] trait every backend call goes
//! through. Concrete implementations live in submodules:
//!
//! - [`http::HttpTransport`] -- `reqwest` client against a base URL.
//! - [`fake::FakeTransport`] -- in-process scripted fake for tests.
//!
//! # Design
//!
//! The trait is a single `send(request) -> response` capability. A response
//! with a non-success status is still `Ok`: only network failures are
//! transport errors, and a body that is not JSON is carried as a string.
//! Interpreting the status is left to the caller, because the auth endpoints
//! report rejections through a `400` body that must be read.
//!
//! No retries are performed anywhere in this crate.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ArtdeskError, Result};
use crate::types::ApiErrorBody;

pub mod fake;
pub mod http;

/// HTTP method of an [`ApiRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        write!(f, "{}", s)
    }
}

/// A backend call, independent of the HTTP client used to issue it
///
/// `path` is relative to the configured API base URL and starts with `/`.
///
/// # Examples
///
/// ```
/// use artdesk::transport::{ApiRequest, Method};
///
/// let request = ApiRequest::get("/articles").with_bearer("abc");
/// assert_eq!(request.method, Method::Get);
/// assert_eq!(request.bearer.as_deref(), Some("abc"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            bearer: None,
            body,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path, Some(body))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path, None)
    }

    /// Attach `Authorization: Bearer <token>`.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// A decoded backend response
///
/// An empty body is represented as [`Value::Null`], a body that is not JSON
/// as [`Value::String`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtdeskError::Transport`] when the body does not have the
    /// expected shape.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone()).map_err(|e| {
            ArtdeskError::Transport(format!("Unexpected response body: {}", e)).into()
        })
    }

    /// The backend's `error.message`, if the body carries one.
    pub fn error_message(&self) -> Option<String> {
        self.body
            .get("error")
            .cloned()
            .and_then(|v| serde_json::from_value::<ApiErrorBody>(v).ok())
            .and_then(|e| e.message)
    }

    /// Turn a non-success response into [`ArtdeskError::Api`].
    ///
    /// `context` names the operation for the log line.
    pub fn into_success(self, context: &str) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let message = self.error_message().unwrap_or_else(|| match &self.body {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        tracing::error!("{} failed with status {}: {}", context, self.status, message);

        Err(ArtdeskError::Api {
            status: self.status,
            message,
        }
        .into())
    }
}

/// Abstraction over the channel used to reach the backend.
///
/// Implementations exist for real HTTP and for tests. Used polymorphically
/// through `Arc<dyn Transport>`.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Issue `request` and return the backend's answer.
    ///
    /// # Errors
    ///
    /// Returns [`ArtdeskError::Transport`] if the request could not be
    /// delivered or its body could not be read. Non-success statuses are
    /// returned as `Ok`.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builders() {
        let req = ApiRequest::put("/articles/4", json!({"data": {}})).with_bearer("tok");
        assert_eq!(req.method, Method::Put);
        assert_eq!(req.path, "/articles/4");
        assert_eq!(req.bearer.as_deref(), Some("tok"));
        assert!(req.body.is_some());

        let req = ApiRequest::delete("/articles/4");
        assert_eq!(req.method, Method::Delete);
        assert!(req.body.is_none());
        assert!(req.bearer.is_none());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_response_success_range() {
        assert!(ApiResponse::new(200, Value::Null).is_success());
        assert!(ApiResponse::new(204, Value::Null).is_success());
        assert!(!ApiResponse::new(401, Value::Null).is_success());
        assert!(!ApiResponse::new(500, Value::Null).is_success());
    }

    #[test]
    fn test_error_message_extraction() {
        let response = ApiResponse::new(400, json!({"error": {"message": "Email is taken"}}));
        assert_eq!(response.error_message().as_deref(), Some("Email is taken"));
        assert!(ApiResponse::new(400, json!({})).error_message().is_none());
    }

    #[test]
    fn test_into_success_maps_status() {
        let err = ApiResponse::new(404, json!({"error": {"message": "Not Found"}}))
            .into_success("fetch")
            .unwrap_err();
        match err.downcast_ref::<ArtdeskError>() {
            Some(ArtdeskError::Api { status, message }) => {
                assert_eq!(*status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(ApiResponse::new(200, Value::Null).into_success("ok").is_ok());
    }

    #[test]
    fn test_json_decode_failure_is_transport_error() {
        let err = ApiResponse::new(200, json!({"data": 5}))
            .json::<crate::types::DataEnvelope<Vec<crate::types::Article>>>()
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArtdeskError>(),
            Some(ArtdeskError::Transport(_))
        ));
    }
}
