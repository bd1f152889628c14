//! Article comment repository

use crate::config::DatabaseDriver;
use crate::db::pool::{mysql, sqlite};
use crate::db::DynDatabasePool;
use crate::models::ArticleComment;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(
        &self,
        article_id: i64,
        commentator_name: &str,
        comment: &str,
        created_at: DateTime<Utc>,
    ) -> Result<ArticleComment>;
    /// Comments of an article, oldest first
    async fn list_by_article(&self, article_id: i64) -> Result<Vec<ArticleComment>>;
}

pub struct SqlxCommentRepository {
    pool: DynDatabasePool,
}

impl SqlxCommentRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(
        &self,
        article_id: i64,
        commentator_name: &str,
        comment: &str,
        created_at: DateTime<Utc>,
    ) -> Result<ArticleComment> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_sqlite(sqlite(&self.pool)?, article_id, commentator_name, comment, created_at)
                    .await
            }
            DatabaseDriver::Mysql => {
                create_mysql(mysql(&self.pool)?, article_id, commentator_name, comment, created_at)
                    .await
            }
        }
    }

    async fn list_by_article(&self, article_id: i64) -> Result<Vec<ArticleComment>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_by_article_sqlite(sqlite(&self.pool)?, article_id).await,
            DatabaseDriver::Mysql => list_by_article_mysql(mysql(&self.pool)?, article_id).await,
        }
    }
}

// SQLite implementations
async fn create_sqlite(
    pool: &SqlitePool,
    article_id: i64,
    commentator_name: &str,
    comment: &str,
    created_at: DateTime<Utc>,
) -> Result<ArticleComment> {
    let result = sqlx::query(
        "INSERT INTO article_comments (commentator_name, comment, created_timestamp, article_id) VALUES (?, ?, ?, ?)",
    )
    .bind(commentator_name)
    .bind(comment)
    .bind(created_at)
    .bind(article_id)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    Ok(ArticleComment {
        comment_id: result.last_insert_rowid(),
        commentator_name: commentator_name.to_string(),
        comment: comment.to_string(),
        created_timestamp: created_at,
        article_id,
    })
}

async fn list_by_article_sqlite(pool: &SqlitePool, article_id: i64) -> Result<Vec<ArticleComment>> {
    let rows = sqlx::query(
        "SELECT comment_id, commentator_name, comment, created_timestamp, article_id \
         FROM article_comments WHERE article_id = ? ORDER BY created_timestamp, comment_id",
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments")?;

    rows.iter()
        .map(|row| {
            Ok(ArticleComment {
                comment_id: row.try_get("comment_id")?,
                commentator_name: row.try_get("commentator_name")?,
                comment: row.try_get("comment")?,
                created_timestamp: row.try_get("created_timestamp")?,
                article_id: row.try_get("article_id")?,
            })
        })
        .collect()
}

// MySQL implementations
async fn create_mysql(
    pool: &MySqlPool,
    article_id: i64,
    commentator_name: &str,
    comment: &str,
    created_at: DateTime<Utc>,
) -> Result<ArticleComment> {
    let result = sqlx::query(
        "INSERT INTO article_comments (commentator_name, comment, created_timestamp, article_id) VALUES (?, ?, ?, ?)",
    )
    .bind(commentator_name)
    .bind(comment)
    .bind(created_at)
    .bind(article_id)
    .execute(pool)
    .await
    .context("Failed to create comment")?;

    Ok(ArticleComment {
        comment_id: result.last_insert_id() as i64,
        commentator_name: commentator_name.to_string(),
        comment: comment.to_string(),
        created_timestamp: created_at,
        article_id,
    })
}

async fn list_by_article_mysql(pool: &MySqlPool, article_id: i64) -> Result<Vec<ArticleComment>> {
    let rows = sqlx::query(
        "SELECT comment_id, commentator_name, comment, created_timestamp, article_id \
         FROM article_comments WHERE article_id = ? ORDER BY created_timestamp, comment_id",
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to list comments")?;

    rows.iter()
        .map(|row| {
            Ok(ArticleComment {
                comment_id: row.try_get("comment_id")?,
                commentator_name: row.try_get("commentator_name")?,
                comment: row.try_get("comment")?,
                created_timestamp: row.try_get("created_timestamp")?,
                article_id: row.try_get("article_id")?,
            })
        })
        .collect()
}
