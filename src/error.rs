//! Error types for Artdesk
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Artdesk operations
///
/// Authentication rejections (`Auth`) are the only failures surfaced to the
/// user through notifications. Transport and API failures are logged at the
/// failure site and returned so callers can inspect them, but the session
/// and article state is always left as it was before the call.
#[derive(Error, Debug)]
pub enum ArtdeskError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Registration or login rejected by the backend
    ///
    /// Carries the human-readable message returned in `error.message`.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Network failure or undecodable response body
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend answered with a non-success status
    #[error("API error: status={status}, {message}")]
    Api {
        /// HTTP status code returned by the backend
        status: u16,
        /// Body text or error message returned by the backend
        message: String,
    },

    /// An operation that needs a bearer token was attempted without one
    #[error("Not logged in")]
    NotLoggedIn,

    /// The requested article is not in the local list
    #[error("Article not found: {0}")]
    ArticleNotFound(u64),

    /// Token persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Interactive shell command errors
    #[error("Command error: {0}")]
    Command(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type alias for Artdesk operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation. Callers that
/// need to branch on the failure kind use
/// `err.downcast_ref::<ArtdeskError>()`.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ArtdeskError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_auth_error_display() {
        let error = ArtdeskError::Auth("Invalid identifier or password".to_string());
        assert_eq!(
            error.to_string(),
            "Authentication error: Invalid identifier or password"
        );
    }

    #[test]
    fn test_transport_error_display() {
        let error = ArtdeskError::Transport("connection refused".to_string());
        assert_eq!(error.to_string(), "Transport error: connection refused");
    }

    #[test]
    fn test_api_error_display() {
        let error = ArtdeskError::Api {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert!(error.to_string().contains("status=404"));
        assert!(error.to_string().contains("Not Found"));
    }

    #[test]
    fn test_not_logged_in_display() {
        assert_eq!(ArtdeskError::NotLoggedIn.to_string(), "Not logged in");
    }

    #[test]
    fn test_article_not_found_display() {
        assert_eq!(
            ArtdeskError::ArticleNotFound(12).to_string(),
            "Article not found: 12"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ArtdeskError = io_error.into();
        assert!(matches!(error, ArtdeskError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: ArtdeskError = json_error.into();
        assert!(matches!(error, ArtdeskError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: ArtdeskError = yaml_error.into();
        assert!(matches!(error, ArtdeskError::Yaml(_)));
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = ArtdeskError::Auth("rejected".to_string()).into();
        assert!(matches!(
            err.downcast_ref::<ArtdeskError>(),
            Some(ArtdeskError::Auth(msg)) if msg == "rejected"
        ));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ArtdeskError>();
    }
}
