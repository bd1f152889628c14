//! Email account service

use crate::db::repositories::{EmailAccountRepository, UserRepository};
use crate::models::{CreateEmailAccountInput, EmailAccount};
use crate::services::validation::ValidationErrors;
use crate::services::ServiceError;
use std::sync::Arc;

pub struct EmailAccountService {
    users: Arc<dyn UserRepository>,
    email_accounts: Arc<dyn EmailAccountRepository>,
}

impl EmailAccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        email_accounts: Arc<dyn EmailAccountRepository>,
    ) -> Self {
        Self {
            users,
            email_accounts,
        }
    }

    /// Attach a new address to an existing user
    ///
    /// The `user_id` argument is authoritative; any id in the body is ignored.
    pub async fn add_email_account(
        &self,
        user_id: i64,
        input: CreateEmailAccountInput,
    ) -> Result<EmailAccount, ServiceError> {
        let mut errors = ValidationErrors::new();
        errors.email("emailAddress", &input.email_address);
        errors.into_result()?;

        if !self.users.exists(user_id).await? {
            return Err(ServiceError::not_found("User", user_id));
        }

        let account = self
            .email_accounts
            .create(user_id, input.email_address.trim())
            .await?;
        tracing::info!(
            "Added email account {} to user {}",
            account.email_account_id,
            user_id
        );
        Ok(account)
    }

    pub async fn get_email_account(&self, id: i64) -> Result<EmailAccount, ServiceError> {
        self.email_accounts
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("EmailAccount", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxEmailAccountRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_service() -> (EmailAccountService, i64) {
        let pool = create_test_pool()
            .await
            .expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let users = SqlxUserRepository::boxed(pool.clone());
        let (user, _) = users
            .create_with_email_accounts("ann", &["ann@example.com".to_string()])
            .await
            .unwrap();
        let service = EmailAccountService::new(users, SqlxEmailAccountRepository::boxed(pool));
        (service, user.user_id)
    }

    fn input(address: &str, user_id: Option<i64>) -> CreateEmailAccountInput {
        CreateEmailAccountInput {
            email_address: address.to_string(),
            user_id,
        }
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let (service, user_id) = setup_test_service().await;

        let account = service
            .add_email_account(user_id, input("second@example.com", Some(999)))
            .await
            .unwrap();
        assert_eq!(account.user_id, user_id);

        let found = service.get_email_account(account.email_account_id).await.unwrap();
        assert_eq!(found.email_address, "second@example.com");
    }

    #[tokio::test]
    async fn test_add_for_missing_user() {
        let (service, _) = setup_test_service().await;
        let result = service
            .add_email_account(999, input("x@example.com", None))
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_invalid_address() {
        let (service, user_id) = setup_test_service().await;
        let result = service.add_email_account(user_id, input("", None)).await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let (service, _) = setup_test_service().await;
        assert!(matches!(
            service.get_email_account(999).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
