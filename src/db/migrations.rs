//! Database migrations module
//!
//! Code-based migrations for the blogging schema. Every migration is embedded
//! as SQL strings, one body per supported driver, and recorded in the
//! `_migrations` table once applied.
//!
//! The schema is the five-level ownership chain
//! `users → email_accounts → blogs → articles → {article_comments, article_likes}`.
//! Each child row carries a foreign key to its parent with `ON DELETE CASCADE`,
//! so removing any row removes everything below it.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};

use super::pool::{mysql, sqlite};
use super::DynDatabasePool;
use crate::config::DatabaseDriver;

/// A database migration with SQL for both SQLite and MySQL
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements for SQLite
    pub up_sqlite: &'static str,
    /// SQL statements for MySQL
    pub up_mysql: &'static str,
}

/// Migration record stored in the database
#[derive(Debug, Clone)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_users",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_name VARCHAR(100) NOT NULL
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id BIGINT PRIMARY KEY AUTO_INCREMENT,
                user_name VARCHAR(100) NOT NULL
            );
        "#,
    },
    Migration {
        version: 2,
        name: "create_email_accounts",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS email_accounts (
                email_account_id INTEGER PRIMARY KEY AUTOINCREMENT,
                email_address VARCHAR(100) NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(user_id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_email_accounts_user_id ON email_accounts(user_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS email_accounts (
                email_account_id BIGINT PRIMARY KEY AUTO_INCREMENT,
                email_address VARCHAR(100) NOT NULL,
                user_id BIGINT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(user_id) ON DELETE CASCADE
            );
            CREATE INDEX idx_email_accounts_user_id ON email_accounts(user_id);
        "#,
    },
    Migration {
        version: 3,
        name: "create_blogs",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS blogs (
                blog_id INTEGER PRIMARY KEY AUTOINCREMENT,
                blog_title VARCHAR(50) NOT NULL,
                blog_author VARCHAR(50) NOT NULL,
                blog_category VARCHAR(50) NOT NULL,
                email_account_id INTEGER NOT NULL,
                FOREIGN KEY (email_account_id) REFERENCES email_accounts(email_account_id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_blogs_email_account_id ON blogs(email_account_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS blogs (
                blog_id BIGINT PRIMARY KEY AUTO_INCREMENT,
                blog_title VARCHAR(50) NOT NULL,
                blog_author VARCHAR(50) NOT NULL,
                blog_category VARCHAR(50) NOT NULL,
                email_account_id BIGINT NOT NULL,
                FOREIGN KEY (email_account_id) REFERENCES email_accounts(email_account_id) ON DELETE CASCADE
            );
            CREATE INDEX idx_blogs_email_account_id ON blogs(email_account_id);
        "#,
    },
    Migration {
        version: 4,
        name: "create_articles",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS articles (
                article_id INTEGER PRIMARY KEY AUTOINCREMENT,
                article_title VARCHAR(50) NOT NULL,
                article_author VARCHAR(50) NOT NULL,
                article_status VARCHAR(50) NOT NULL,
                created_timestamp TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_timestamp TIMESTAMP,
                published_timestamp TIMESTAMP,
                article_views_count INTEGER NOT NULL DEFAULT 0,
                content TEXT NOT NULL,
                blog_id INTEGER NOT NULL,
                FOREIGN KEY (blog_id) REFERENCES blogs(blog_id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_articles_blog_id ON articles(blog_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS articles (
                article_id BIGINT PRIMARY KEY AUTO_INCREMENT,
                article_title VARCHAR(50) NOT NULL,
                article_author VARCHAR(50) NOT NULL,
                article_status VARCHAR(50) NOT NULL,
                created_timestamp TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_timestamp TIMESTAMP NULL,
                published_timestamp TIMESTAMP NULL,
                article_views_count BIGINT NOT NULL DEFAULT 0,
                content LONGTEXT NOT NULL,
                blog_id BIGINT NOT NULL,
                FOREIGN KEY (blog_id) REFERENCES blogs(blog_id) ON DELETE CASCADE
            );
            CREATE INDEX idx_articles_blog_id ON articles(blog_id);
        "#,
    },
    Migration {
        version: 5,
        name: "create_article_comments",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS article_comments (
                comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
                commentator_name VARCHAR(255) NOT NULL,
                comment TEXT NOT NULL,
                created_timestamp TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                article_id INTEGER NOT NULL,
                FOREIGN KEY (article_id) REFERENCES articles(article_id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_article_comments_article_id ON article_comments(article_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS article_comments (
                comment_id BIGINT PRIMARY KEY AUTO_INCREMENT,
                commentator_name VARCHAR(255) NOT NULL,
                comment TEXT NOT NULL,
                created_timestamp TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                article_id BIGINT NOT NULL,
                FOREIGN KEY (article_id) REFERENCES articles(article_id) ON DELETE CASCADE
            );
            CREATE INDEX idx_article_comments_article_id ON article_comments(article_id);
        "#,
    },
    Migration {
        version: 6,
        name: "create_article_likes",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS article_likes (
                like_id INTEGER PRIMARY KEY AUTOINCREMENT,
                is_liked BOOLEAN NOT NULL DEFAULT 1,
                article_id INTEGER NOT NULL,
                email_account_id INTEGER NOT NULL,
                UNIQUE (article_id, email_account_id),
                FOREIGN KEY (article_id) REFERENCES articles(article_id) ON DELETE CASCADE,
                FOREIGN KEY (email_account_id) REFERENCES email_accounts(email_account_id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_article_likes_email_account_id ON article_likes(email_account_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS article_likes (
                like_id BIGINT PRIMARY KEY AUTO_INCREMENT,
                is_liked BOOLEAN NOT NULL DEFAULT TRUE,
                article_id BIGINT NOT NULL,
                email_account_id BIGINT NOT NULL,
                UNIQUE KEY uq_article_likes_article_account (article_id, email_account_id),
                FOREIGN KEY (article_id) REFERENCES articles(article_id) ON DELETE CASCADE,
                FOREIGN KEY (email_account_id) REFERENCES email_accounts(email_account_id) ON DELETE CASCADE
            );
            CREATE INDEX idx_article_likes_email_account_id ON article_likes(email_account_id);
        "#,
    },
];

/// Run all pending migrations
///
/// Creates the tracking table if needed, then applies every migration whose
/// version is not yet recorded, in order.
///
/// # Returns
///
/// Number of migrations applied
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = get_applied_migrations(pool).await?;
    let applied_versions: Vec<i32> = applied.iter().map(|m| m.version as i32).collect();

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied_versions.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

/// Create the migrations tracking table if it doesn't exist
async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
        DatabaseDriver::Mysql => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INT PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
    };

    pool.execute(sql).await?;
    Ok(())
}

async fn get_applied_migrations(pool: &DynDatabasePool) -> Result<Vec<MigrationRecord>> {
    match pool.driver() {
        DatabaseDriver::Sqlite => get_applied_migrations_sqlite(sqlite(pool)?).await,
        DatabaseDriver::Mysql => get_applied_migrations_mysql(mysql(pool)?).await,
    }
}

async fn get_applied_migrations_sqlite(pool: &SqlitePool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| MigrationRecord {
            version: row.get("version"),
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        })
        .collect())
}

async fn get_applied_migrations_mysql(pool: &MySqlPool) -> Result<Vec<MigrationRecord>> {
    let rows = sqlx::query("SELECT version, name, applied_at FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| MigrationRecord {
            version: row.get::<i32, _>("version") as i64,
            name: row.get("name"),
            applied_at: row.get("applied_at"),
        })
        .collect())
}

async fn apply_migration(pool: &DynDatabasePool, migration: &Migration) -> Result<()> {
    match pool.driver() {
        DatabaseDriver::Sqlite => apply_migration_sqlite(sqlite(pool)?, migration).await,
        DatabaseDriver::Mysql => apply_migration_mysql(mysql(pool)?, migration).await,
    }
}

async fn apply_migration_sqlite(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    for statement in split_sql_statements(migration.up_sqlite) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

async fn apply_migration_mysql(pool: &MySqlPool, migration: &Migration) -> Result<()> {
    for statement in split_sql_statements(migration.up_mysql) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    match sql.char_indices().nth(100) {
        Some((idx, _)) => format!("{}...", &sql[..idx]),
        None => sql.to_string(),
    }
}

/// Split SQL into individual statements, skipping comment-only fragments
fn split_sql_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty() && !is_comment_only(stmt))
        .collect()
}

/// Check if a string contains only SQL comments
fn is_comment_only(s: &str) -> bool {
    s.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with("--"))
}

/// Check if migrations are up to date
pub async fn is_up_to_date(pool: &DynDatabasePool) -> Result<bool> {
    Ok(pending_count(pool).await? == 0)
}

/// Get pending migrations count
pub async fn pending_count(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = get_applied_migrations(pool).await?;
    Ok(MIGRATIONS.len().saturating_sub(applied.len()))
}

/// Get the total number of migrations defined
pub fn total_migrations() -> usize {
    MIGRATIONS.len()
}

/// Get migration by version
pub fn get_migration(version: i32) -> Option<&'static Migration> {
    MIGRATIONS.iter().find(|m| m.version == version)
}
