//! Domain and wire types shared by the session, article and form modules
//!
//! The backend speaks a Strapi-style JSON dialect: collection entries are
//! wrapped as `{ id, attributes: { ... } }` and every payload is enveloped in
//! `{ data: ... }`. [`Article`] hides that shape behind a flat struct and
//! converts to and from the wire form through serde.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend identifier of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub u64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArticleId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(ArticleId)
    }
}

impl From<u64> for ArticleId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A managed content entry
///
/// # Examples
///
/// ```
/// use artdesk::types::{Article, ArticleId};
///
/// let json = r#"{"id":7,"attributes":{"title":"Hello","description":"World"}}"#;
/// let article: Article = serde_json::from_str(json).unwrap();
/// assert_eq!(article.id, ArticleId(7));
/// assert_eq!(article.title, "Hello");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireArticle", into = "WireArticle")]
pub struct Article {
    /// Server-assigned identifier
    pub id: ArticleId,
    /// Article title
    pub title: String,
    /// Article body/summary
    pub description: String,
    /// Creation timestamp, when the backend reports one
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp, when the backend reports one
    pub updated_at: Option<DateTime<Utc>>,
    /// Publication timestamp, when the backend reports one
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Build an article with no timestamps.
    pub fn new(
        id: impl Into<ArticleId>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            created_at: None,
            updated_at: None,
            published_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireArticle {
    id: ArticleId,
    #[serde(default)]
    attributes: WireAttributes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAttributes {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    published_at: Option<DateTime<Utc>>,
}

impl From<WireArticle> for Article {
    fn from(wire: WireArticle) -> Self {
        Self {
            id: wire.id,
            title: wire.attributes.title.unwrap_or_default(),
            description: wire.attributes.description.unwrap_or_default(),
            created_at: wire.attributes.created_at,
            updated_at: wire.attributes.updated_at,
            published_at: wire.attributes.published_at,
        }
    }
}

impl From<Article> for WireArticle {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            attributes: WireAttributes {
                title: Some(article.title),
                description: Some(article.description),
                created_at: article.created_at,
                updated_at: article.updated_at,
                published_at: article.published_at,
            },
        }
    }
}

/// Fields sent when creating or updating an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleInput {
    pub title: String,
    pub description: String,
}

/// The authenticated user as returned by the backend
///
/// Only `id`, `username` and `email` are surfaced; every other field is kept
/// verbatim in `extra` and never validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `{ "data": ... }` envelope used by every collection endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Body of `POST /auth/local/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/local`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
}

/// Response of both auth endpoints
///
/// Success carries `jwt` and `user`; rejection carries `error.message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub jwt: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// Error object embedded in failed backend responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
