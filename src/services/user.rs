//! User service
//!
//! Users are registered together with at least one email account.

use crate::db::repositories::{EmailAccountRepository, UserRepository};
use crate::models::{CreateUserInput, EmailAccount, User, UserWithEmailAccounts};
use crate::services::validation::{ValidationErrors, MAX_USER_FIELD_LEN};
use crate::services::ServiceError;
use anyhow::Context;
use std::sync::Arc;

pub struct UserService {
    users: Arc<dyn UserRepository>,
    email_accounts: Arc<dyn EmailAccountRepository>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        email_accounts: Arc<dyn EmailAccountRepository>,
    ) -> Self {
        Self {
            users,
            email_accounts,
        }
    }

    /// Register a user with its email accounts
    pub async fn add_user(
        &self,
        input: CreateUserInput,
    ) -> Result<(User, Vec<EmailAccount>), ServiceError> {
        validate_create_input(&input)?;

        let user_name = input.user_name.trim();
        let addresses: Vec<String> = input
            .email_accounts
            .iter()
            .map(|account| account.email_address.trim().to_string())
            .collect();

        let (user, accounts) = self
            .users
            .create_with_email_accounts(user_name, &addresses)
            .await
            .context("Failed to create user")?;

        tracing::info!(
            "Created user {} with {} email account(s)",
            user.user_id,
            accounts.len()
        );
        Ok((user, accounts))
    }

    /// Get a user together with its email accounts
    pub async fn get_user(&self, id: i64) -> Result<UserWithEmailAccounts, ServiceError> {
        let user = self
            .users
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;
        let email_accounts = self.email_accounts.list_by_user(id).await?;

        Ok(UserWithEmailAccounts {
            user,
            email_accounts,
        })
    }
}

fn validate_create_input(input: &CreateUserInput) -> Result<(), ServiceError> {
    let mut errors = ValidationErrors::new();
    errors.text("userName", &input.user_name, MAX_USER_FIELD_LEN);

    if input.email_accounts.is_empty() {
        errors.add("emailAccounts", "At least one EmailAccount is required.");
    }
    for (i, account) in input.email_accounts.iter().enumerate() {
        errors.email(
            &format!("emailAccounts[{}].emailAddress", i),
            &account.email_address,
        );
    }

    errors.into_result()
}
