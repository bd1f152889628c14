//! User repository
//!
//! A user is always created together with its first email accounts, inside
//! one transaction, so no user row exists without an address.

use crate::config::DatabaseDriver;
use crate::db::pool::{mysql, sqlite};
use crate::db::DynDatabasePool;
use crate::models::{EmailAccount, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and its email accounts atomically
    async fn create_with_email_accounts(
        &self,
        user_name: &str,
        email_addresses: &[String],
    ) -> Result<(User, Vec<EmailAccount>)>;
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn exists(&self, id: i64) -> Result<bool>;
}

pub struct SqlxUserRepository {
    pool: DynDatabasePool,
}

impl SqlxUserRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_with_email_accounts(
        &self,
        user_name: &str,
        email_addresses: &[String],
    ) -> Result<(User, Vec<EmailAccount>)> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_sqlite(sqlite(&self.pool)?, user_name, email_addresses).await
            }
            DatabaseDriver::Mysql => {
                create_mysql(mysql(&self.pool)?, user_name, email_addresses).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(sqlite(&self.pool)?, id).await,
            DatabaseDriver::Mysql => get_by_id_mysql(mysql(&self.pool)?, id).await,
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
async fn create_sqlite(
    pool: &SqlitePool,
    user_name: &str,
    email_addresses: &[String],
) -> Result<(User, Vec<EmailAccount>)> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let user_id = sqlx::query("INSERT INTO users (user_name) VALUES (?)")
        .bind(user_name)
        .execute(&mut *tx)
        .await
        .context("Failed to create user")?
        .last_insert_rowid();

    let mut accounts = Vec::with_capacity(email_addresses.len());
    for address in email_addresses {
        let id = sqlx::query("INSERT INTO email_accounts (email_address, user_id) VALUES (?, ?)")
            .bind(address)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .context("Failed to create email account")?
            .last_insert_rowid();
        accounts.push(EmailAccount {
            email_account_id: id,
            email_address: address.clone(),
            user_id,
        });
    }

    tx.commit().await.context("Failed to commit user")?;

    let user = User {
        user_id,
        user_name: user_name.to_string(),
    };
    Ok((user, accounts))
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query("SELECT user_id, user_name FROM users WHERE user_id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user")?;
    Ok(row.map(|r| User {
        user_id: r.get("user_id"),
        user_name: r.get("user_name"),
    }))
}

async fn exists_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM users WHERE user_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .context("Failed to check user")?;
    Ok(row.get::<i64, _>("count") > 0)
}

// MySQL implementations
async fn create_mysql(
    pool: &MySqlPool,
    user_name: &str,
    email_addresses: &[String],
) -> Result<(User, Vec<EmailAccount>)> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let user_id = sqlx::query("INSERT INTO users (user_name) VALUES (?)")
        .bind(user_name)
        .execute(&mut *tx)
        .await
        .context("Failed to create user")?
        .last_insert_id() as i64;

    let mut accounts = Vec::with_capacity(email_addresses.len());
    for address in email_addresses {
        let id = sqlx::query("INSERT INTO email_accounts (email_address, user_id) VALUES (?, ?)")
            .bind(address)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .context("Failed to create email account")?
            .last_insert_id() as i64;
        accounts.push(EmailAccount {
            email_account_id: id,
            email_address: address.clone(),
            user_id,
        });
    }

    tx.commit().await.context("Failed to commit user")?;

    let user = User {
        user_id,
        user_name: user_name.to_string(),
    };
    Ok((user, accounts))
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query("SELECT user_id, user_name FROM users WHERE user_id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get user")?;
    Ok(row.map(|r| User {
        user_id: r.get("user_id"),
        user_name: r.get("user_name"),
    }))
}

async fn exists_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM users WHERE user_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .context("Failed to check user")?;
    Ok(row.get::<i64, _>("count") > 0)
}
