//! Session management: authentication, current user and token persistence
//!
//! [`SessionManager`] owns the [`Session`] (bearer token + user) and the
//! [`TokenStore`] the token is persisted in. Registration and login go to the
//! backend's local-auth endpoints; a response carrying a `jwt` establishes
//! the session, anything else is an [`ArtdeskError::Auth`] rejection.
//!
//! Transport failures never touch the session: the previous state persists
//! and the error is returned to the caller.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{ArtdeskError, Result};
use crate::storage::TokenStore;
use crate::transport::{ApiRequest, Transport};
use crate::types::{AuthResponse, LoginRequest, RegisterRequest, User};

/// Fallback message when a rejected registration carries no `error.message`.
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// Fallback message when a rejected login carries no `error.message`.
pub const LOGIN_FAILED: &str = "Login failed";

/// The logged-in state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }
}

/// Holds the session and performs auth transitions
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    token_store: Box<dyn TokenStore>,
    session: Session,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("logged_in", &self.session.is_logged_in())
            .field("user", &self.session.user)
            .finish()
    }
}

impl SessionManager {
    pub fn new(transport: Arc<dyn Transport>, token_store: Box<dyn TokenStore>) -> Self {
        Self {
            transport,
            token_store,
            session: Session::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    /// Create an account and log in with it.
    ///
    /// # Errors
    ///
    /// - [`ArtdeskError::Auth`] with the server's message when rejected.
    /// - [`ArtdeskError::Transport`] on network or decoding failure.
    /// - Storage errors if the token cannot be persisted.
    ///
    /// In every error case the session is left as it was.
    pub async fn register(
        &mut self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Session> {
        tracing::info!("Registering user {}", username);
        let body = RegisterRequest {
            email,
            username,
            password,
        };
        self.authenticate("/auth/local/register", &body, REGISTRATION_FAILED).await
    }

    /// Log in with an email or username.
    ///
    /// Same contract as [`SessionManager::register`].
    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<Session> {
        tracing::info!("Logging in as {}", identifier);
        let body = LoginRequest {
            identifier,
            password,
        };
        self.authenticate("/auth/local", &body, LOGIN_FAILED).await
    }

    async fn authenticate<B: Serialize>(
        &mut self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<Session> {
        let response = self
            .transport
            .send(ApiRequest::post(path, serde_json::to_value(body)?))
            .await
            .map_err(|e| {
                tracing::error!("Error calling {}: {:#}", path, e);
                e
            })?;

        let auth: AuthResponse = response.json().map_err(|e| {
            tracing::error!("Error decoding {} response: {:#}", path, e);
            e
        })?;

        let jwt = match auth.jwt {
            Some(jwt) => jwt,
            None => {
                let message = auth
                    .error
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| fallback.to_string());
                tracing::warn!("{}: {}", fallback, message);
                return Err(ArtdeskError::Auth(message).into());
            }
        };

        self.token_store.save(&jwt)?;
        self.session = Session {
            token: Some(jwt),
            user: auth.user,
        };
        tracing::info!("Session established");
        Ok(self.session.clone())
    }

    /// Drop the session and the persisted token.
    ///
    /// Never fails: a store that cannot be cleared is logged and the
    /// in-memory session is reset regardless.
    pub fn logout(&mut self) {
        if let Err(e) = self.token_store.clear() {
            tracing::warn!("Failed to clear persisted token: {:#}", e);
        }
        self.session = Session::default();
        tracing::info!("Logged out");
    }

    /// Adopt a previously persisted token, if there is one.
    ///
    /// The token is not checked against the backend; an expired token only
    /// shows up when a later call fails. Returns whether a session was
    /// restored.
    pub fn restore_session(&mut self) -> bool {
        match self.token_store.load() {
            Ok(Some(token)) => {
                tracing::info!("Restored persisted session");
                self.session.token = Some(token);
                true
            }
            Ok(None) => {
                tracing::debug!("No persisted session");
                false
            }
            Err(e) => {
                tracing::warn!("Failed to read persisted token: {:#}", e);
                false
            }
        }
    }

    /// Load the current user from `GET /users/me`.
    ///
    /// # Errors
    ///
    /// [`ArtdeskError::NotLoggedIn`] without a token; transport or API errors
    /// otherwise. The stored user is only replaced on success.
    pub async fn fetch_user(&mut self) -> Result<&User> {
        let token = self.token().ok_or(ArtdeskError::NotLoggedIn)?.to_string();

        let response = self
            .transport
            .send(ApiRequest::get("/users/me").with_bearer(token))
            .await
            .map_err(|e| {
                tracing::error!("Error fetching user: {:#}", e);
                e
            })?
            .into_success("Fetching user")?;

        let user: User = response.json().map_err(|e| {
            tracing::error!("Error decoding user: {:#}", e);
            e
        })?;

        Ok(self.session.user.insert(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryTokenStore;
    use crate::transport::fake::FakeTransport;
    use crate::transport::Method;
    use serde_json::json;

    fn manager() -> (SessionManager, FakeTransport, MemoryTokenStore) {
        let transport = FakeTransport::new();
        let store = MemoryTokenStore::new();
        let manager = SessionManager::new(Arc::new(transport.clone()), Box::new(store.clone()));
        (manager, transport, store)
    }

    #[tokio::test]
    async fn test_login_persists_token() {
        let (mut sessions, transport, store) = manager();
        transport.push_json(200, json!({"jwt": "abc", "user": {"id": 1, "username": "alice"}}));

        let session = sessions.login("alice", "pw1").await.unwrap();

        assert_eq!(session.token.as_deref(), Some("abc"));
        assert_eq!(session.user.unwrap().username, "alice");
        assert!(sessions.is_logged_in());
        assert_eq!(store.load().unwrap().as_deref(), Some("abc"));

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/auth/local");
        assert_eq!(
            request.body,
            Some(json!({"identifier": "alice", "password": "pw1"}))
        );
        assert!(request.bearer.is_none());
    }

    #[tokio::test]
    async fn test_register_sends_credentials() {
        let (mut sessions, transport, store) = manager();
        transport.push_json(200, json!({"jwt": "new", "user": {"username": "bob"}}));

        sessions.register("bob@example.com", "bob", "secret").await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/auth/local/register");
        assert_eq!(
            request.body,
            Some(json!({"email": "bob@example.com", "username": "bob", "password": "secret"}))
        );
        assert_eq!(store.load().unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_rejected_login_surfaces_server_message() {
        let (mut sessions, transport, store) = manager();
        transport.push_json(
            400,
            json!({
                "data": null,
                "error": {"status": 400, "message": "Invalid identifier or password"}
            }),
        );

        let err = sessions.login("alice", "wrong").await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ArtdeskError>(),
            Some(ArtdeskError::Auth(msg)) if msg == "Invalid identifier or password"
        ));
        assert!(!sessions.is_logged_in());
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejection_without_message_uses_fallback() {
        let (mut sessions, transport, _store) = manager();
        transport.push_json(400, json!({}));

        let err = sessions.register("a@b.c", "a", "p").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArtdeskError>(),
            Some(ArtdeskError::Auth(msg)) if msg == REGISTRATION_FAILED
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_previous_session() {
        let (mut sessions, transport, store) = manager();
        transport.push_json(200, json!({"jwt": "first"}));
        sessions.login("alice", "pw").await.unwrap();

        transport.push_failure("connection refused");
        let err = sessions.login("bob", "pw").await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ArtdeskError>(),
            Some(ArtdeskError::Transport(_))
        ));
        assert_eq!(sessions.token(), Some("first"));
        assert_eq!(store.load().unwrap().as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let (mut sessions, transport, store) = manager();
        transport.push_json(200, json!({"jwt": "abc", "user": {"username": "alice"}}));
        sessions.login("alice", "pw").await.unwrap();

        sessions.logout();

        assert!(!sessions.is_logged_in());
        assert!(sessions.user().is_none());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_restore_session_from_store() {
        let (mut sessions, _transport, store) = manager();
        assert!(!sessions.restore_session());

        store.save("persisted").unwrap();
        assert!(sessions.restore_session());
        assert_eq!(sessions.token(), Some("persisted"));
        assert!(sessions.user().is_none());
    }

    #[tokio::test]
    async fn test_fetch_user_uses_bearer() {
        let (mut sessions, transport, store) = manager();
        store.save("abc").unwrap();
        sessions.restore_session();
        transport.push_json(200, json!({"id": 1, "username": "alice", "email": "a@x.io"}));

        let user = sessions.fetch_user().await.unwrap();
        assert_eq!(user.username, "alice");

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/users/me");
        assert_eq!(request.bearer.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_fetch_user_with_invalid_token_leaves_user_absent() {
        let (mut sessions, transport, store) = manager();
        store.save("expired").unwrap();
        sessions.restore_session();
        transport.push_json(401, json!({"error": {"message": "Missing or invalid credentials"}}));

        let err = sessions.fetch_user().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArtdeskError>(),
            Some(ArtdeskError::Api { status: 401, .. })
        ));
        assert!(sessions.user().is_none());
        assert!(sessions.is_logged_in());
    }

    #[tokio::test]
    async fn test_fetch_user_requires_token() {
        let (mut sessions, transport, _store) = manager();
        let err = sessions.fetch_user().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArtdeskError>(),
            Some(ArtdeskError::NotLoggedIn)
        ));
        assert!(transport.requests().is_empty());
    }
}
