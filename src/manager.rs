//! Session-scoped article manager
//!
//! [`ArticleManager`] is the explicit context object tying the pieces
//! together: the [`SessionManager`] provides the bearer token, the
//! [`ArticleStore`] uses it for every call, the [`EditBuffer`] feeds
//! mutations, and a [`Notifier`] reports outcomes.
//!
//! # Lifecycle
//!
//! - [`ArticleManager::init`] restores a persisted token and loads the user
//!   and article list.
//! - [`ArticleManager::register`] / [`ArticleManager::login`] establish a
//!   session and load the same data.
//! - [`ArticleManager::logout`] resets session, list and form.
//!
//! # Failure reporting
//!
//! Auth rejections are notified as errors. Article failures are only logged
//! and returned; the user sees no notification for them.

use std::sync::Arc;
use std::time::Duration;

use crate::articles::ArticleStore;
use crate::error::{ArtdeskError, Result};
use crate::form::{EditBuffer, SubmitOutcome};
use crate::notify::{Notification, Notifier, DEFAULT_DURATION};
use crate::session::{Session, SessionManager};
use crate::storage::TokenStore;
use crate::transport::Transport;
use crate::types::{Article, ArticleId, User};

/// Session, article list and edit buffer for one user
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use artdesk::manager::ArticleManager;
/// use artdesk::notify::RecordingNotifier;
/// use artdesk::storage::MemoryTokenStore;
/// use artdesk::transport::fake::FakeTransport;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let transport = FakeTransport::new();
/// transport.push_json(200, json!({"jwt": "abc", "user": {"username": "alice"}}));
/// transport.push_json(200, json!({"username": "alice"}));
/// transport.push_json(200, json!({"data": []}));
///
/// let mut manager = ArticleManager::new(
///     Arc::new(transport),
///     Box::new(MemoryTokenStore::new()),
///     Box::new(RecordingNotifier::new()),
/// );
/// manager.login("alice", "pw1").await?;
/// assert!(manager.is_logged_in());
/// # Ok(())
/// # }
/// ```
pub struct ArticleManager {
    session: SessionManager,
    store: ArticleStore,
    form: EditBuffer,
    notifier: Box<dyn Notifier>,
    notification_duration: Duration,
}

impl std::fmt::Debug for ArticleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleManager")
            .field("session", &self.session)
            .field("store", &self.store)
            .field("form", &self.form)
            .finish()
    }
}

impl ArticleManager {
    pub fn new(
        transport: Arc<dyn Transport>,
        token_store: Box<dyn TokenStore>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            session: SessionManager::new(Arc::clone(&transport), token_store),
            store: ArticleStore::new(transport),
            form: EditBuffer::new(),
            notifier,
            notification_duration: DEFAULT_DURATION,
        }
    }

    /// Display duration attached to every notification.
    pub fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.notification_duration = duration;
        self
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn articles(&self) -> &[Article] {
        self.store.articles()
    }

    pub fn form(&self) -> &EditBuffer {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EditBuffer {
        &mut self.form
    }

    fn notify(&self, notification: Notification) {
        self.notifier
            .notify(&notification.with_duration(self.notification_duration));
    }

    fn token(&self) -> Result<String> {
        self.session
            .token()
            .map(str::to_string)
            .ok_or_else(|| ArtdeskError::NotLoggedIn.into())
    }

    /// Restore a persisted session and load its data.
    ///
    /// Returns whether a session was restored. Load failures are logged
    /// and leave the user absent and the list empty.
    pub async fn init(&mut self) -> bool {
        if !self.session.restore_session() {
            return false;
        }
        self.load_session_data().await;
        true
    }

    /// Load the user and the article list for the current token.
    async fn load_session_data(&mut self) {
        let token = match self.session.token() {
            Some(token) => token.to_string(),
            None => return,
        };

        if let Err(e) = self.session.fetch_user().await {
            tracing::warn!("Could not load user: {:#}", e);
        }
        if let Err(e) = self.store.fetch_all(&token).await {
            tracing::warn!("Could not load articles: {:#}", e);
        }
    }

    /// Register and log in; see [`SessionManager::register`].
    ///
    /// Returns the established session, including the user loaded after
    /// authentication when that load succeeded.
    pub async fn register(
        &mut self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Session> {
        let result = self.session.register(email, username, password).await;
        self.finish_auth(result, "Registration successful", "Registration failed").await
    }

    /// Log in by email or username; see [`SessionManager::login`].
    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<Session> {
        let result = self.session.login(identifier, password).await;
        self.finish_auth(result, "Login successful", "Login failed").await
    }

    /// A new session never sees the previous one's list or form, even when
    /// its own loads fail.
    async fn finish_auth(
        &mut self,
        result: Result<Session>,
        success: &str,
        failure: &str,
    ) -> Result<Session> {
        match result {
            Ok(_) => {
                self.store.clear();
                self.form.clear();
                self.load_session_data().await;
                self.notify(Notification::success(success));
                Ok(self.session.session().clone())
            }
            Err(e) => {
                if let Some(ArtdeskError::Auth(message)) = e.downcast_ref::<ArtdeskError>() {
                    self.notify(Notification::error(failure, message.clone()));
                }
                Err(e)
            }
        }
    }

    /// End the session: token, user, articles and form are all reset.
    pub fn logout(&mut self) {
        self.session.logout();
        self.store.clear();
        self.form.clear();
        self.notify(Notification::info("Logged out"));
    }

    /// Re-fetch the article list.
    pub async fn refresh(&mut self) -> Result<&[Article]> {
        let token = self.token()?;
        self.store.fetch_all(&token).await
    }

    /// Create an article directly, bypassing the edit buffer.
    pub async fn create_article(&mut self, title: &str, description: &str) -> Result<Article> {
        let token = self.token()?;
        let article = self.store.create(&token, title, description).await?;
        self.notify(Notification::success("Article created"));
        Ok(article)
    }

    /// Update an article directly, bypassing the edit buffer.
    pub async fn update_article(
        &mut self,
        id: ArticleId,
        title: &str,
        description: &str,
    ) -> Result<Article> {
        let token = self.token()?;
        let article = self.store.update(&token, id, title, description).await?;
        self.notify(Notification::success("Article updated"));
        Ok(article)
    }

    pub async fn delete_article(&mut self, id: ArticleId) -> Result<()> {
        let token = self.token()?;
        self.store.delete(&token, id).await?;
        self.notify(Notification::success("Article deleted"));
        Ok(())
    }

    /// Load the listed article `id` into the edit buffer.
    ///
    /// # Errors
    ///
    /// [`ArtdeskError::ArticleNotFound`] if `id` is not in the current list.
    pub fn begin_edit(&mut self, id: ArticleId) -> Result<()> {
        let article = self.store.get(id).ok_or(ArtdeskError::ArticleNotFound(id.0))?;
        self.form.begin_edit(article);
        Ok(())
    }

    /// Submit the edit buffer (create or update).
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        let token = self.token()?;
        let outcome = self.form.submit(&mut self.store, &token).await?;
        let title = match outcome {
            SubmitOutcome::Created(_) => "Article created",
            SubmitOutcome::Updated(_) => "Article updated",
        };
        self.notify(Notification::success(title));
        Ok(outcome)
    }
}
