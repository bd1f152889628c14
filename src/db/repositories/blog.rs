//! Blog repository

use crate::config::DatabaseDriver;
use crate::db::pool::{mysql, sqlite};
use crate::db::DynDatabasePool;
use crate::models::Blog;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const SELECT_COLUMNS: &str =
    "SELECT blog_id, blog_title, blog_author, blog_category, email_account_id FROM blogs";

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn create(&self, blog: &Blog) -> Result<Blog>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Blog>>;
    async fn list_by_email_account(&self, email_account_id: i64) -> Result<Vec<Blog>>;
    /// Overwrite title, author and category; returns false if no row matched
    async fn update(&self, blog: &Blog) -> Result<bool>;
    /// Delete a blog and, through the schema cascade, its articles
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct SqlxBlogRepository {
    pool: DynDatabasePool,
}

impl SqlxBlogRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn BlogRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BlogRepository for SqlxBlogRepository {
    async fn create(&self, blog: &Blog) -> Result<Blog> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(sqlite(&self.pool)?, blog).await,
            DatabaseDriver::Mysql => create_mysql(mysql(&self.pool)?, blog).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Blog>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(sqlite(&self.pool)?, id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(mysql(&self.pool)?, id).await,
        }
    }

    async fn list_by_email_account(&self, email_account_id: i64) -> Result<Vec<Blog>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_by_email_account_sqlite(sqlite(&self.pool)?, email_account_id).await
            }
            DatabaseDriver::Mysql => {
                list_by_email_account_mysql(mysql(&self.pool)?, email_account_id).await
            }
        }
    }

    async fn update(&self, blog: &Blog) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(sqlite(&self.pool)?, blog).await,
            DatabaseDriver::Mysql => update_mysql(mysql(&self.pool)?, blog).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(sqlite(&self.pool)?, id).await,
            DatabaseDriver::Mysql => delete_mysql(mysql(&self.pool)?, id).await,
        }
    }
}

// SQLite implementations
async fn create_sqlite(pool: &SqlitePool, blog: &Blog) -> Result<Blog> {
    let result = sqlx::query(
        "INSERT INTO blogs (blog_title, blog_author, blog_category, email_account_id) VALUES (?, ?, ?, ?)",
    )
    .bind(&blog.blog_title)
    .bind(&blog.blog_author)
    .bind(&blog.blog_category)
    .bind(blog.email_account_id)
    .execute(pool)
    .await
    .context("Failed to create blog")?;

    Ok(Blog {
        blog_id: result.last_insert_rowid(),
        ..blog.clone()
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Blog>> {
    let row = sqlx::query(&format!("{} WHERE blog_id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get blog")?;
    Ok(row.map(|r| row_to_blog_sqlite(&r)))
}

async fn list_by_email_account_sqlite(pool: &SqlitePool, email_account_id: i64) -> Result<Vec<Blog>> {
    let rows = sqlx::query(&format!(
        "{} WHERE email_account_id = ? ORDER BY blog_id",
        SELECT_COLUMNS
    ))
    .bind(email_account_id)
    .fetch_all(pool)
    .await
    .context("Failed to list blogs")?;
    Ok(rows.iter().map(row_to_blog_sqlite).collect())
}

async fn update_sqlite(pool: &SqlitePool, blog: &Blog) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE blogs SET blog_title = ?, blog_author = ?, blog_category = ? WHERE blog_id = ?",
    )
    .bind(&blog.blog_title)
    .bind(&blog.blog_author)
    .bind(&blog.blog_category)
    .bind(blog.blog_id)
    .execute(pool)
    .await
    .context("Failed to update blog")?;
    Ok(result.rows_affected() > 0)
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM blogs WHERE blog_id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete blog")?;
    Ok(result.rows_affected() > 0)
}

fn row_to_blog_sqlite(row: &sqlx::sqlite::SqliteRow) -> Blog {
    Blog {
        blog_id: row.get("blog_id"),
        blog_title: row.get("blog_title"),
        blog_author: row.get("blog_author"),
        blog_category: row.get("blog_category"),
        email_account_id: row.get("email_account_id"),
    }
}

// MySQL implementations
async fn create_mysql(pool: &MySqlPool, blog: &Blog) -> Result<Blog> {
    let result = sqlx::query(
        "INSERT INTO blogs (blog_title, blog_author, blog_category, email_account_id) VALUES (?, ?, ?, ?)",
    )
    .bind(&blog.blog_title)
    .bind(&blog.blog_author)
    .bind(&blog.blog_category)
    .bind(blog.email_account_id)
    .execute(pool)
    .await
    .context("Failed to create blog")?;

    Ok(Blog {
        blog_id: result.last_insert_id() as i64,
        ..blog.clone()
    })
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Blog>> {
    let row = sqlx::query(&format!("{} WHERE blog_id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get blog")?;
    Ok(row.map(|r| row_to_blog_mysql(&r)))
}

async fn list_by_email_account_mysql(pool: &MySqlPool, email_account_id: i64) -> Result<Vec<Blog>> {
    let rows = sqlx::query(&format!(
        "{} WHERE email_account_id = ? ORDER BY blog_id",
        SELECT_COLUMNS
    ))
    .bind(email_account_id)
    .fetch_all(pool)
    .await
    .context("Failed to list blogs")?;
    Ok(rows.iter().map(row_to_blog_mysql).collect())
}

async fn update_mysql(pool: &MySqlPool, blog: &Blog) -> Result<bool> {
    // MySQL reports only changed rows as affected, so match on existence instead
    let exists = get_by_id_mysql(pool, blog.blog_id).await?.is_some();
    if !exists {
        return Ok(false);
    }
    sqlx::query(
        "UPDATE blogs SET blog_title = ?, blog_author = ?, blog_category = ? WHERE blog_id = ?",
    )
    .bind(&blog.blog_title)
    .bind(&blog.blog_author)
    .bind(&blog.blog_category)
    .bind(blog.blog_id)
    .execute(pool)
    .await
    .context("Failed to update blog")?;
    Ok(true)
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM blogs WHERE blog_id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete blog")?;
    Ok(result.rows_affected() > 0)
}

fn row_to_blog_mysql(row: &sqlx::mysql::MySqlRow) -> Blog {
    Blog {
        blog_id: row.get("blog_id"),
        blog_title: row.get("blog_title"),
        blog_author: row.get("blog_author"),
        blog_category: row.get("blog_category"),
        email_account_id: row.get("email_account_id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (DynDatabasePool, i64) {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool).await.expect("Failed to run migrations");
        let (_, accounts) = SqlxUserRepository::new(pool.clone())
            .create_with_email_accounts("ann", &["ann@example.com".to_string()])
            .await
            .unwrap();
        (pool, accounts[0].email_account_id)
    }

    fn blog(title: &str, email_account_id: i64) -> Blog {
        Blog::new(
            title.to_string(),
            "Ann".to_string(),
            "Tech".to_string(),
            email_account_id,
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (pool, account_id) = setup().await;
        let repo = SqlxBlogRepository::new(pool);

        let created = repo.create(&blog("Rust notes", account_id)).await.unwrap();
        assert!(created.blog_id > 0);

        let found = repo.get_by_id(created.blog_id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_email_account() {
        let (pool, account_id) = setup().await;
        let repo = SqlxBlogRepository::new(pool);
        repo.create(&blog("First", account_id)).await.unwrap();
        repo.create(&blog("Second", account_id)).await.unwrap();

        let blogs = repo.list_by_email_account(account_id).await.unwrap();
        let titles: Vec<_> = blogs.iter().map(|b| b.blog_title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert!(repo.list_by_email_account(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update() {
        let (pool, account_id) = setup().await;
        let repo = SqlxBlogRepository::new(pool);
        let mut created = repo.create(&blog("Old", account_id)).await.unwrap();

        created.blog_title = "New".to_string();
        created.blog_category = "Life".to_string();
        assert!(repo.update(&created).await.unwrap());

        let found = repo.get_by_id(created.blog_id).await.unwrap().unwrap();
        assert_eq!(found.blog_title, "New");
        assert_eq!(found.blog_category, "Life");

        created.blog_id = 999;
        assert!(!repo.update(&created).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let (pool, account_id) = setup().await;
        let repo = SqlxBlogRepository::new(pool);
        let created = repo.create(&blog("Gone", account_id)).await.unwrap();

        assert!(repo.delete(created.blog_id).await.unwrap());
        assert!(repo.get_by_id(created.blog_id).await.unwrap().is_none());
        assert!(!repo.delete(created.blog_id).await.unwrap());
    }
}
