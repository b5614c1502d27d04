//! Edit buffer bridging user input to article mutations
//!
//! The buffer holds the in-progress title and description plus an optional
//! edit target. Submitting with no target creates an article; with a target
//! it updates that article. Nothing is validated: empty fields are sent as
//! they are.

use crate::articles::ArticleStore;
use crate::error::Result;
use crate::types::{Article, ArticleId};

/// What the next [`EditBuffer::submit`] will do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(ArticleId),
}

impl FormMode {
    /// Label of the submit action.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Create => "Create Article",
            Self::Update(_) => "Update Article",
        }
    }
}

/// Result of a successful submit
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(Article),
    Updated(Article),
}

impl SubmitOutcome {
    pub fn article(&self) -> &Article {
        match self {
            Self::Created(article) | Self::Updated(article) => article,
        }
    }
}

/// Transient form state; never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    pub title: String,
    pub description: String,
    pub editing_id: Option<ArticleId>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> FormMode {
        match self.editing_id {
            Some(id) => FormMode::Update(id),
            None => FormMode::Create,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Load `article` into the buffer and make it the edit target.
    pub fn begin_edit(&mut self, article: &Article) {
        self.title = article.title.clone();
        self.description = article.description.clone();
        self.editing_id = Some(article.id);
    }

    /// Reset fields and target.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Create or update depending on the edit target, then clear the buffer.
    ///
    /// On failure the buffer keeps its contents so the input is not lost.
    pub async fn submit(
        &mut self,
        store: &mut ArticleStore,
        token: &str,
    ) -> Result<SubmitOutcome> {
        let outcome = match self.mode() {
            FormMode::Create => {
                tracing::debug!("Submitting new article");
                SubmitOutcome::Created(
                    store
                        .create(token, &self.title, &self.description)
                        .await?,
                )
            }
            FormMode::Update(id) => {
                tracing::debug!("Submitting edit of article {}", id);
                SubmitOutcome::Updated(
                    store
                        .update(token, id, &self.title, &self.description)
                        .await?,
                )
            }
        };

        self.clear();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::fake::FakeTransport;
    use crate::transport::Method;
    use serde_json::json;
    use std::sync::Arc;

    fn store() -> (ArticleStore, FakeTransport) {
        let transport = FakeTransport::new();
        (ArticleStore::new(Arc::new(transport.clone())), transport)
    }

    #[test]
    fn test_mode_follows_edit_target() {
        let mut buffer = EditBuffer::new();
        assert_eq!(buffer.mode(), FormMode::Create);
        assert_eq!(buffer.mode().label(), "Create Article");

        buffer.begin_edit(&Article::new(4, "t", "d"));
        assert_eq!(buffer.mode(), FormMode::Update(ArticleId(4)));
        assert_eq!(buffer.mode().label(), "Update Article");
        assert_eq!(buffer.title, "t");
        assert_eq!(buffer.description, "d");

        buffer.clear();
        assert_eq!(buffer, EditBuffer::default());
    }

    #[tokio::test]
    async fn test_submit_without_target_creates() {
        let (mut store, transport) = store();
        transport.push_json(
            200,
            json!({"data": {"id": 1, "attributes": {"title": "T", "description": "D"}}}),
        );

        let mut buffer = EditBuffer::new();
        buffer.set_title("T");
        buffer.set_description("D");
        let outcome = buffer.submit(&mut store, "abc").await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        assert_eq!(transport.last_request().unwrap().method, Method::Post);
        assert_eq!(buffer, EditBuffer::default());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_begin_edit_then_submit_updates_target() {
        let (mut store, transport) = store();
        transport.push_json(
            200,
            json!({"data": {"id": 8, "attributes": {"title": "new", "description": "D"}}}),
        );

        let mut buffer = EditBuffer::new();
        buffer.begin_edit(&Article::new(8, "old", "D"));
        buffer.set_title("new");
        let outcome = buffer.submit(&mut store, "abc").await.unwrap();

        assert_eq!(outcome.article().id, ArticleId(8));
        assert!(matches!(outcome, SubmitOutcome::Updated(_)));
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.path, "/articles/8");
        assert_eq!(
            request.body,
            Some(json!({"data": {"title": "new", "description": "D"}}))
        );
        assert!(buffer.editing_id.is_none());
    }

    #[tokio::test]
    async fn test_empty_fields_are_submitted_as_is() {
        let (mut store, transport) = store();
        transport.push_json(
            200,
            json!({"data": {"id": 2, "attributes": {"title": "", "description": ""}}}),
        );

        let mut buffer = EditBuffer::new();
        buffer.submit(&mut store, "abc").await.unwrap();
        assert_eq!(
            transport.last_request().unwrap().body,
            Some(json!({"data": {"title": "", "description": ""}}))
        );
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_buffer() {
        let (mut store, transport) = store();
        transport.push_failure("timeout");

        let mut buffer = EditBuffer::new();
        buffer.begin_edit(&Article::new(3, "keep", "me"));
        assert!(buffer.submit(&mut store, "abc").await.is_err());
        assert_eq!(buffer.title, "keep");
        assert_eq!(buffer.editing_id, Some(ArticleId(3)));
    }
}
