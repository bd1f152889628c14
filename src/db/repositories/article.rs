//! Article repository

use crate::config::DatabaseDriver;
use crate::db::pool::{mysql, sqlite};
use crate::db::DynDatabasePool;
use crate::models::Article;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const SELECT_COLUMNS: &str = "SELECT article_id, article_title, article_author, article_status, \
     created_timestamp, updated_timestamp, published_timestamp, article_views_count, content, blog_id \
     FROM articles";

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn create(&self, article: &Article) -> Result<Article>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Article>>;
    async fn list_by_blog(&self, blog_id: i64) -> Result<Vec<Article>>;
    /// Set title and author and stamp `updated_timestamp`; false if no row matched
    async fn update(
        &self,
        id: i64,
        title: &str,
        author: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;
    /// Delete an article and, through the schema cascade, its comments and likes
    async fn delete(&self, id: i64) -> Result<bool>;
    /// Bump the view counter by one; false if no row matched
    async fn increment_views(&self, id: i64) -> Result<bool>;
}

pub struct SqlxArticleRepository {
    pool: DynDatabasePool,
}

impl SqlxArticleRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn create(&self, article: &Article) -> Result<Article> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(sqlite(&self.pool)?, article).await,
            DatabaseDriver::Mysql => create_mysql(mysql(&self.pool)?, article).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(sqlite(&self.pool)?, id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(mysql(&self.pool)?, id).await,
        }
    }

    async fn list_by_blog(&self, blog_id: i64) -> Result<Vec<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_by_blog_sqlite(sqlite(&self.pool)?, blog_id).await,
            DatabaseDriver::Mysql => list_by_blog_mysql(mysql(&self.pool)?, blog_id).await,
        }
    }

    async fn update(
        &self,
        id: i64,
        title: &str,
        author: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_sqlite(sqlite(&self.pool)?, id, title, author, updated_at).await
            }
            DatabaseDriver::Mysql => {
                update_mysql(mysql(&self.pool)?, id, title, author, updated_at).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(sqlite(&self.pool)?, id).await,
            DatabaseDriver::Mysql => delete_mysql(mysql(&self.pool)?, id).await,
        }
    }

    async fn increment_views(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => increment_views_sqlite(sqlite(&self.pool)?, id).await,
            DatabaseDriver::Mysql => increment_views_mysql(mysql(&self.pool)?, id).await,
        }
    }
}

// SQLite implementations
async fn create_sqlite(pool: &SqlitePool, article: &Article) -> Result<Article> {
    let result = sqlx::query(
        "INSERT INTO articles (article_title, article_author, article_status, created_timestamp, \
         updated_timestamp, published_timestamp, article_views_count, content, blog_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&article.article_title)
    .bind(&article.article_author)
    .bind(&article.article_status)
    .bind(article.created_timestamp)
    .bind(article.updated_timestamp)
    .bind(article.published_timestamp)
    .bind(article.article_views_count)
    .bind(&article.content)
    .bind(article.blog_id)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    Ok(Article {
        article_id: result.last_insert_rowid(),
        ..article.clone()
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Article>> {
    let row = sqlx::query(&format!("{} WHERE article_id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get article")?;
    row.map(|r| row_to_article_sqlite(&r)).transpose()
}

async fn list_by_blog_sqlite(pool: &SqlitePool, blog_id: i64) -> Result<Vec<Article>> {
    let rows = sqlx::query(&format!("{} WHERE blog_id = ? ORDER BY article_id", SELECT_COLUMNS))
        .bind(blog_id)
        .fetch_all(pool)
        .await
        .context("Failed to list articles")?;
    rows.iter().map(row_to_article_sqlite).collect()
}

async fn update_sqlite(
    pool: &SqlitePool,
    id: i64,
    title: &str,
    author: &str,
    updated_at: DateTime<Utc>,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE articles SET article_title = ?, article_author = ?, updated_timestamp = ? WHERE article_id = ?",
    )
    .bind(title)
    .bind(author)
    .bind(updated_at)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update article")?;
    Ok(result.rows_affected() > 0)
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM articles WHERE article_id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete article")?;
    Ok(result.rows_affected() > 0)
}

async fn increment_views_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE articles SET article_views_count = article_views_count + 1 WHERE article_id = ?",
    )
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to increment article views")?;
    Ok(result.rows_affected() > 0)
}

fn row_to_article_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Article> {
    Ok(Article {
        article_id: row.try_get("article_id")?,
        article_title: row.try_get("article_title")?,
        article_author: row.try_get("article_author")?,
        article_status: row.try_get("article_status")?,
        created_timestamp: row.try_get("created_timestamp")?,
        updated_timestamp: row.try_get("updated_timestamp")?,
        published_timestamp: row.try_get("published_timestamp")?,
        article_views_count: row.try_get("article_views_count")?,
        content: row.try_get("content")?,
        blog_id: row.try_get("blog_id")?,
    })
}

// MySQL implementations
async fn create_mysql(pool: &MySqlPool, article: &Article) -> Result<Article> {
    let result = sqlx::query(
        "INSERT INTO articles (article_title, article_author, article_status, created_timestamp, \
         updated_timestamp, published_timestamp, article_views_count, content, blog_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&article.article_title)
    .bind(&article.article_author)
    .bind(&article.article_status)
    .bind(article.created_timestamp)
    .bind(article.updated_timestamp)
    .bind(article.published_timestamp)
    .bind(article.article_views_count)
    .bind(&article.content)
    .bind(article.blog_id)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    Ok(Article {
        article_id: result.last_insert_id() as i64,
        ..article.clone()
    })
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Article>> {
    let row = sqlx::query(&format!("{} WHERE article_id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get article")?;
    row.map(|r| row_to_article_mysql(&r)).transpose()
}

async fn list_by_blog_mysql(pool: &MySqlPool, blog_id: i64) -> Result<Vec<Article>> {
    let rows = sqlx::query(&format!("{} WHERE blog_id = ? ORDER BY article_id", SELECT_COLUMNS))
        .bind(blog_id)
        .fetch_all(pool)
        .await
        .context("Failed to list articles")?;
    rows.iter().map(row_to_article_mysql).collect()
}

async fn update_mysql(
    pool: &MySqlPool,
    id: i64,
    title: &str,
    author: &str,
    updated_at: DateTime<Utc>,
) -> Result<bool> {
    // MySQL reports only changed rows as affected, so match on existence instead
    if get_by_id_mysql(pool, id).await?.is_none() {
        return Ok(false);
    }
    sqlx::query(
        "UPDATE articles SET article_title = ?, article_author = ?, updated_timestamp = ? WHERE article_id = ?",
    )
    .bind(title)
    .bind(author)
    .bind(updated_at)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update article")?;
    Ok(true)
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM articles WHERE article_id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete article")?;
    Ok(result.rows_affected() > 0)
}

async fn increment_views_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE articles SET article_views_count = article_views_count + 1 WHERE article_id = ?",
    )
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to increment article views")?;
    Ok(result.rows_affected() > 0)
}

fn row_to_article_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Article> {
    Ok(Article {
        article_id: row.try_get("article_id")?,
        article_title: row.try_get("article_title")?,
        article_author: row.try_get("article_author")?,
        article_status: row.try_get("article_status")?,
        created_timestamp: row.try_get("created_timestamp")?,
        updated_timestamp: row.try_get("updated_timestamp")?,
        published_timestamp: row.try_get("published_timestamp")?,
        article_views_count: row.try_get("article_views_count")?,
        content: row.try_get("content")?,
        blog_id: row.try_get("blog_id")?,
    })
}
