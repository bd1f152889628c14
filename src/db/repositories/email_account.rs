//! Email account repository

use crate::config::DatabaseDriver;
use crate::db::pool::{mysql, sqlite};
use crate::db::DynDatabasePool;
use crate::models::EmailAccount;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const SELECT_COLUMNS: &str = "SELECT email_account_id, email_address, user_id FROM email_accounts";

#[async_trait]
pub trait EmailAccountRepository: Send + Sync {
    async fn create(&self, user_id: i64, email_address: &str) -> Result<EmailAccount>;
    async fn get_by_id(&self, id: i64) -> Result<Option<EmailAccount>>;
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<EmailAccount>>;
    async fn exists(&self, id: i64) -> Result<bool>;
}

pub struct SqlxEmailAccountRepository {
    pool: DynDatabasePool,
}

impl SqlxEmailAccountRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn EmailAccountRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl EmailAccountRepository for SqlxEmailAccountRepository {
    async fn create(&self, user_id: i64, email_address: &str) -> Result<EmailAccount> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_sqlite(sqlite(&self.pool)?, user_id, email_address).await
            }
            DatabaseDriver::Mysql => create_mysql(mysql(&self.pool)?, user_id, email_address).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<EmailAccount>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(sqlite(&self.pool)?, id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(mysql(&self.pool)?, id).await,
        }
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<EmailAccount>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_by_user_sqlite(sqlite(&self.pool)?, user_id).await,
            DatabaseDriver::Mysql => list_by_user_mysql(mysql(&self.pool)?, user_id).await,
        }
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => exists_sqlite(sqlite(&self.pool)?, id).await,
            DatabaseDriver::Mysql => exists_mysql(mysql(&self.pool)?, id).await,
        }
    }
}

// SQLite implementations
async fn create_sqlite(pool: &SqlitePool, user_id: i64, email_address: &str) -> Result<EmailAccount> {
    let result = sqlx::query("INSERT INTO email_accounts (email_address, user_id) VALUES (?, ?)")
        .bind(email_address)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to create email account")?;

    Ok(EmailAccount {
        email_account_id: result.last_insert_rowid(),
        email_address: email_address.to_string(),
        user_id,
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<EmailAccount>> {
    let row = sqlx::query(&format!("{} WHERE email_account_id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get email account")?;
    Ok(row.map(|r| row_to_email_account_sqlite(&r)))
}

async fn list_by_user_sqlite(pool: &SqlitePool, user_id: i64) -> Result<Vec<EmailAccount>> {
    let rows = sqlx::query(&format!(
        "{} WHERE user_id = ? ORDER BY email_account_id",
        SELECT_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list email accounts")?;
    Ok(rows.iter().map(row_to_email_account_sqlite).collect())
}

async fn exists_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM email_accounts WHERE email_account_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .context("Failed to check email account")?;
    Ok(row.get::<i64, _>("count") > 0)
}

fn row_to_email_account_sqlite(row: &sqlx::sqlite::SqliteRow) -> EmailAccount {
    EmailAccount {
        email_account_id: row.get("email_account_id"),
        email_address: row.get("email_address"),
        user_id: row.get("user_id"),
    }
}

// MySQL implementations
async fn create_mysql(pool: &MySqlPool, user_id: i64, email_address: &str) -> Result<EmailAccount> {
    let result = sqlx::query("INSERT INTO email_accounts (email_address, user_id) VALUES (?, ?)")
        .bind(email_address)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to create email account")?;

    Ok(EmailAccount {
        email_account_id: result.last_insert_id() as i64,
        email_address: email_address.to_string(),
        user_id,
    })
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<EmailAccount>> {
    let row = sqlx::query(&format!("{} WHERE email_account_id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get email account")?;
    Ok(row.map(|r| row_to_email_account_mysql(&r)))
}

async fn list_by_user_mysql(pool: &MySqlPool, user_id: i64) -> Result<Vec<EmailAccount>> {
    let rows = sqlx::query(&format!(
        "{} WHERE user_id = ? ORDER BY email_account_id",
        SELECT_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list email accounts")?;
    Ok(rows.iter().map(row_to_email_account_mysql).collect())
}

async fn exists_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM email_accounts WHERE email_account_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .context("Failed to check email account")?;
    Ok(row.get::<i64, _>("count") > 0)
}

fn row_to_email_account_mysql(row: &sqlx::mysql::MySqlRow) -> EmailAccount {
    EmailAccount {
        email_account_id: row.get("email_account_id"),
        email_address: row.get("email_address"),
        user_id: row.get("user_id"),
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
        let (user, _) = SqlxUserRepository::new(pool.clone())
            .create_with_email_accounts("ann", &["ann@example.com".to_string()])
            .await
            .unwrap();
        (pool, user.user_id)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (pool, user_id) = setup().await;
        let repo = SqlxEmailAccountRepository::new(pool);

        let account = repo.create(user_id, "second@example.com").await.unwrap();
        assert_eq!(account.user_id, user_id);

        let found = repo.get_by_id(account.email_account_id).await.unwrap().unwrap();
        assert_eq!(found, account);
        assert!(repo.exists(account.email_account_id).await.unwrap());
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_user_in_insert_order() {
        let (pool, user_id) = setup().await;
        let repo = SqlxEmailAccountRepository::new(pool);
        repo.create(user_id, "second@example.com").await.unwrap();

        let accounts = repo.list_by_user(user_id).await.unwrap();
        let addresses: Vec<_> = accounts.iter().map(|a| a.email_address.as_str()).collect();
        assert_eq!(addresses, vec!["ann@example.com", "second@example.com"]);

        assert!(repo.list_by_user(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_for_missing_user_fails() {
        let (pool, _) = setup().await;
        let repo = SqlxEmailAccountRepository::new(pool);
        assert!(repo.create(999, "ghost@example.com").await.is_err());
    }
}
