//! Article model
//!
//! This module provides:
//! - `Article` entity as stored in the `articles` table
//! - Input types for creating and updating articles
//! - Response shapes returned by the article endpoints

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Status value that marks an article as published
pub const STATUS_PUBLISHED: &str = "published";

/// Article entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub article_id: i64,
    pub article_title: String,
    pub article_author: String,
    /// Free-form status label (e.g. "draft", "published")
    pub article_status: String,
    pub created_timestamp: DateTime<Utc>,
    pub updated_timestamp: Option<DateTime<Utc>>,
    pub published_timestamp: Option<DateTime<Utc>>,
    pub article_views_count: i64,
    pub content: String,
    pub blog_id: i64,
}

impl Article {
    /// Build an unsaved article for `blog_id` from a validated input
    ///
    /// A published article without an explicit publish date is stamped
    /// with its creation time.
    pub fn from_input(blog_id: i64, input: &CreateArticleInput, now: DateTime<Utc>) -> Self {
        let created_timestamp = input.created_timestamp.unwrap_or(now);
        let published_timestamp = match input.published_timestamp {
            Some(date) => Some(timestamp::start_of_day(date)),
            None if is_published(&input.article_status) => Some(created_timestamp),
            None => None,
        };

        Self {
            article_id: 0,
            article_title: input.article_title.clone(),
            article_author: input.article_author.clone(),
            article_status: input.article_status.clone(),
            created_timestamp,
            updated_timestamp: input.updated_timestamp.map(timestamp::start_of_day),
            published_timestamp,
            article_views_count: input.article_views_count.unwrap_or(0),
            content: input.content.clone(),
            blog_id,
        }
    }
}

/// Whether a status label means the article is published (case-insensitive)
pub fn is_published(status: &str) -> bool {
    status.trim().eq_ignore_ascii_case(STATUS_PUBLISHED)
}

/// Input for creating an article
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleInput {
    #[serde(default)]
    pub article_title: String,
    #[serde(default)]
    pub article_author: String,
    #[serde(default)]
    pub article_status: String,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_timestamp: Option<NaiveDate>,
    #[serde(default)]
    pub published_timestamp: Option<NaiveDate>,
    #[serde(default)]
    pub article_views_count: Option<i64>,
    #[serde(default)]
    pub content: String,
    /// Must match the blog id in the route when present
    #[serde(default)]
    pub blog_id: Option<i64>,
}

/// Input for editing an article's title and author
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleInput {
    #[serde(default)]
    pub article_title: String,
    #[serde(default)]
    pub article_author: String,
}

/// Body returned after an article is created
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleCreatedResponse {
    pub article_title: String,
    pub article_author: String,
    pub article_status: String,
    pub created_timestamp: DateTime<Utc>,
    pub updated_timestamp: Option<NaiveDate>,
    pub published_timestamp: Option<NaiveDate>,
    pub article_views_count: i64,
    pub content: String,
    pub blog_id: i64,
}

impl From<&Article> for ArticleCreatedResponse {
    fn from(article: &Article) -> Self {
        Self {
            article_title: article.article_title.clone(),
            article_author: article.article_author.clone(),
            article_status: article.article_status.clone(),
            created_timestamp: article.created_timestamp,
            updated_timestamp: timestamp::date_of(article.updated_timestamp),
            published_timestamp: timestamp::date_of(article.published_timestamp),
            article_views_count: article.article_views_count,
            content: article.content.clone(),
            blog_id: article.blog_id,
        }
    }
}

/// Single article as returned by the lookup endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    pub article_title: String,
    pub article_author: String,
    pub content: String,
}

impl From<Article> for ArticleDetail {
    fn from(article: Article) -> Self {
        Self {
            article_title: article.article_title,
            article_author: article.article_author,
            content: article.content,
        }
    }
}

/// Row of the per-blog article listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub article_id: i64,
    pub article_title: String,
    pub article_author: String,
    pub created_timestamp: DateTime<Utc>,
}

impl From<Article> for ArticleSummary {
    fn from(article: Article) -> Self {
        Self {
            article_id: article.article_id,
            article_title: article.article_title,
            article_author: article.article_author,
            created_timestamp: article.created_timestamp,
        }
    }
}
