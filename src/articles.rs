//! Article store: the session's in-memory article list
//!
//! Every mutation is applied only after the backend confirms it, so the
//! list always mirrors the last successful response. A failed call logs,
//! returns the error and leaves the list exactly as it was; there is nothing
//! to roll back and nothing is retried.

use std::sync::Arc;

use crate::error::Result;
use crate::transport::{ApiRequest, Transport};
use crate::types::{Article, ArticleId, ArticleInput, DataEnvelope};

/// In-memory article list plus the REST calls that keep it in sync
pub struct ArticleStore {
    transport: Arc<dyn Transport>,
    articles: Vec<Article>,
}

impl std::fmt::Debug for ArticleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleStore")
            .field("articles", &self.articles)
            .finish()
    }
}

fn article_path(id: ArticleId) -> String {
    format!("/articles/{}", id)
}

fn article_body(title: &str, description: &str) -> Result<serde_json::Value> {
    let body = DataEnvelope {
        data: ArticleInput {
            title: title.to_string(),
            description: description.to_string(),
        },
    };
    Ok(serde_json::to_value(body)?)
}

impl ArticleStore {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            articles: Vec::new(),
        }
    }

    /// The current list, in server order.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn get(&self, id: ArticleId) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Forget every article (logout).
    pub fn clear(&mut self) {
        self.articles.clear();
    }

    /// Replace the list with `GET /articles`.
    pub async fn fetch_all(&mut self, token: &str) -> Result<&[Article]> {
        let response = self
            .transport
            .send(ApiRequest::get("/articles").with_bearer(token))
            .await
            .map_err(|e| {
                tracing::error!("Error fetching articles: {:#}", e);
                e
            })?
            .into_success("Fetching articles")?;

        let envelope: DataEnvelope<Vec<Article>> = response.json().map_err(|e| {
            tracing::error!("Error decoding articles: {:#}", e);
            e
        })?;

        tracing::info!("Fetched {} articles", envelope.data.len());
        self.articles = envelope.data;
        Ok(&self.articles)
    }

    /// `POST /articles`; the returned article is appended.
    pub async fn create(
        &mut self,
        token: &str,
        title: &str,
        description: &str,
    ) -> Result<Article> {
        let request =
            ApiRequest::post("/articles", article_body(title, description)?).with_bearer(token);
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| {
                tracing::error!("Error creating article: {:#}", e);
                e
            })?
            .into_success("Creating article")?;

        let envelope: DataEnvelope<Article> = response.json().map_err(|e| {
            tracing::error!("Error decoding created article: {:#}", e);
            e
        })?;

        let article = envelope.data;
        tracing::info!("Created article {}", article.id);
        self.articles.push(article.clone());
        Ok(article)
    }

    /// `PUT /articles/:id`; the element with `id` is replaced in place.
    ///
    /// If no local element has `id` the list is left unchanged.
    pub async fn update(
        &mut self,
        token: &str,
        id: ArticleId,
        title: &str,
        description: &str,
    ) -> Result<Article> {
        let request =
            ApiRequest::put(article_path(id), article_body(title, description)?).with_bearer(token);
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| {
                tracing::error!("Error updating article {}: {:#}", id, e);
                e
            })?
            .into_success("Updating article")?;

        let envelope: DataEnvelope<Article> = response.json().map_err(|e| {
            tracing::error!("Error decoding updated article {}: {:#}", id, e);
            e
        })?;

        let article = envelope.data;
        match self.articles.iter_mut().find(|a| a.id == id) {
            Some(slot) => *slot = article.clone(),
            None => tracing::debug!("Updated article {} is not in the local list", id),
        }
        tracing::info!("Updated article {}", id);
        Ok(article)
    }

    /// `DELETE /articles/:id`; the element with `id` is removed.
    pub async fn delete(&mut self, token: &str, id: ArticleId) -> Result<()> {
        self.transport
            .send(ApiRequest::delete(article_path(id)).with_bearer(token))
            .await
            .map_err(|e| {
                tracing::error!("Error deleting article {}: {:#}", id, e);
                e
            })?
            .into_success("Deleting article")?;

        self.articles.retain(|a| a.id != id);
        tracing::info!("Deleted article {}", id);
        Ok(())
    }
}
