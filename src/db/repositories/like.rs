//! Article like repository
//!
//! The schema allows one like row per (article, email account) pair; a
//! second insert is ignored and reported as `None`.

use crate::config::DatabaseDriver;
use crate::db::pool::{mysql, sqlite};
use crate::db::DynDatabasePool;
use crate::models::ArticleLike;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Insert a like; `None` if the account already has one on the article
    async fn create(
        &self,
        article_id: i64,
        email_account_id: i64,
        is_liked: bool,
    ) -> Result<Option<ArticleLike>>;
    async fn get(&self, article_id: i64, email_account_id: i64) -> Result<Option<ArticleLike>>;
    /// Number of like rows recorded for the article
    async fn count_likes(&self, article_id: i64) -> Result<i64>;
    async fn delete(&self, article_id: i64, email_account_id: i64) -> Result<bool>;
}

pub struct SqlxLikeRepository {
    pool: DynDatabasePool,
}

impl SqlxLikeRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn LikeRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl LikeRepository for SqlxLikeRepository {
    async fn create(
        &self,
        article_id: i64,
        email_account_id: i64,
        is_liked: bool,
    ) -> Result<Option<ArticleLike>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_sqlite(sqlite(&self.pool)?, article_id, email_account_id, is_liked).await
            }
            DatabaseDriver::Mysql => {
                create_mysql(mysql(&self.pool)?, article_id, email_account_id, is_liked).await
            }
        }
    }

    async fn get(&self, article_id: i64, email_account_id: i64) -> Result<Option<ArticleLike>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_sqlite(sqlite(&self.pool)?, article_id, email_account_id).await
            }
            DatabaseDriver::Mysql => get_mysql(mysql(&self.pool)?, article_id, email_account_id).await,
        }
    }

    async fn count_likes(&self, article_id: i64) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_likes_sqlite(sqlite(&self.pool)?, article_id).await,
            DatabaseDriver::Mysql => count_likes_mysql(mysql(&self.pool)?, article_id).await,
        }
    }

    async fn delete(&self, article_id: i64, email_account_id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_sqlite(sqlite(&self.pool)?, article_id, email_account_id).await
            }
            DatabaseDriver::Mysql => {
                delete_mysql(mysql(&self.pool)?, article_id, email_account_id).await
            }
        }
    }
}

// SQLite implementations
async fn create_sqlite(
    pool: &SqlitePool,
    article_id: i64,
    email_account_id: i64,
    is_liked: bool,
) -> Result<Option<ArticleLike>> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO article_likes (is_liked, article_id, email_account_id) VALUES (?, ?, ?)",
    )
    .bind(is_liked)
    .bind(article_id)
    .bind(email_account_id)
    .execute(pool)
    .await
    .context("Failed to create like")?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    Ok(Some(ArticleLike {
        like_id: result.last_insert_rowid(),
        is_liked,
        article_id,
        email_account_id,
    }))
}

async fn get_sqlite(
    pool: &SqlitePool,
    article_id: i64,
    email_account_id: i64,
) -> Result<Option<ArticleLike>> {
    let row = sqlx::query(
        "SELECT like_id, is_liked, article_id, email_account_id FROM article_likes \
         WHERE article_id = ? AND email_account_id = ?",
    )
    .bind(article_id)
    .bind(email_account_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get like")?;

    Ok(row.map(|r| ArticleLike {
        like_id: r.get("like_id"),
        is_liked: r.get("is_liked"),
        article_id: r.get("article_id"),
        email_account_id: r.get("email_account_id"),
    }))
}

async fn count_likes_sqlite(pool: &SqlitePool, article_id: i64) -> Result<i64> {
    let row = sqlx::query(
        "SELECT COUNT(*) as count FROM article_likes WHERE article_id = ?",
    )
    .bind(article_id)
    .fetch_one(pool)
    .await
    .context("Failed to count likes")?;
    Ok(row.get("count"))
}

async fn delete_sqlite(pool: &SqlitePool, article_id: i64, email_account_id: i64) -> Result<bool> {
    let result =
        sqlx::query("DELETE FROM article_likes WHERE article_id = ? AND email_account_id = ?")
            .bind(article_id)
            .bind(email_account_id)
            .execute(pool)
            .await
            .context("Failed to delete like")?;
    Ok(result.rows_affected() > 0)
}

// MySQL implementations
async fn create_mysql(
    pool: &MySqlPool,
    article_id: i64,
    email_account_id: i64,
    is_liked: bool,
) -> Result<Option<ArticleLike>> {
    let result = sqlx::query(
        "INSERT IGNORE INTO article_likes (is_liked, article_id, email_account_id) VALUES (?, ?, ?)",
    )
    .bind(is_liked)
    .bind(article_id)
    .bind(email_account_id)
    .execute(pool)
    .await
    .context("Failed to create like")?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    Ok(Some(ArticleLike {
        like_id: result.last_insert_id() as i64,
        is_liked,
        article_id,
        email_account_id,
    }))
}

async fn get_mysql(
    pool: &MySqlPool,
    article_id: i64,
    email_account_id: i64,
) -> Result<Option<ArticleLike>> {
    let row = sqlx::query(
        "SELECT like_id, is_liked, article_id, email_account_id FROM article_likes \
         WHERE article_id = ? AND email_account_id = ?",
    )
    .bind(article_id)
    .bind(email_account_id)
    .fetch_optional(pool)
    .await
    .context("Failed to get like")?;

    Ok(row.map(|r| ArticleLike {
        like_id: r.get("like_id"),
        is_liked: r.get("is_liked"),
        article_id: r.get("article_id"),
        email_account_id: r.get("email_account_id"),
    }))
}

async fn count_likes_mysql(pool: &MySqlPool, article_id: i64) -> Result<i64> {
    let row = sqlx::query(
        "SELECT COUNT(*) as count FROM article_likes WHERE article_id = ?",
    )
    .bind(article_id)
    .fetch_one(pool)
    .await
    .context("Failed to count likes")?;
    Ok(row.get("count"))
}

async fn delete_mysql(pool: &MySqlPool, article_id: i64, email_account_id: i64) -> Result<bool> {
    let result =
        sqlx::query("DELETE FROM article_likes WHERE article_id = ? AND email_account_id = ?")
            .bind(article_id)
            .bind(email_account_id)
            .execute(pool)
            .await
            .context("Failed to delete like")?;
    Ok(result.rows_affected() > 0)
}
