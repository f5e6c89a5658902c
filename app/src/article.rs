//! Articles, their authors, and comments.

use crate::viewer::Username;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// URL-safe article identifier, never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Parse a slug, rejecting empty strings
    #[must_use]
    pub fn parse(slug: &str) -> Option<Self> {
        (!slug.is_empty()).then(|| Self(slug.to_string()))
    }

    /// The slug as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Slug {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Err("slug cannot be empty".to_string())
        } else {
            Ok(Self(value))
        }
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user as seen from their articles and profile page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Author username
    pub username: Username,
    /// Profile bio
    #[serde(default)]
    pub bio: Option<String>,
    /// Avatar image URL
    #[serde(default)]
    pub image: Option<String>,
    /// Whether the viewer follows this author
    #[serde(default)]
    pub following: bool,
}

/// A published article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Identifier
    pub slug: Slug,
    /// Headline
    pub title: String,
    /// One-line summary
    pub description: String,
    /// Markdown body
    #[serde(default)]
    pub body: String,
    /// Tags
    #[serde(default)]
    pub tag_list: Vec<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Whether the viewer favorited it
    #[serde(default)]
    pub favorited: bool,
    /// Number of favorites
    #[serde(default)]
    pub favorites_count: u32,
    /// Who wrote it
    pub author: Author,
}

/// A comment on an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Identifier
    pub id: i64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Text
    pub body: String,
    /// Who wrote it
    pub author: Author,
}

/// The editable fields of an article
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    /// Headline
    pub title: String,
    /// One-line summary
    pub description: String,
    /// Markdown body
    pub body: String,
    /// Tags
    pub tag_list: Vec<String>,
}

impl From<&Article> for ArticleDraft {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            body: article.body.clone(),
            tag_list: article.tag_list.clone(),
        }
    }
}
