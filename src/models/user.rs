//! User model

use serde::{Deserialize, Serialize};

use super::EmailAccount;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i64,
    pub user_name: String,
}

/// User together with the email accounts it owns
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithEmailAccounts {
    #[serde(flatten)]
    pub user: User,
    pub email_accounts: Vec<EmailAccount>,
}

/// Input for creating a user along with its first email accounts
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub email_accounts: Vec<NewEmailAccountInput>,
}

/// Email account nested in a new-user request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmailAccountInput {
    #[serde(default)]
    pub email_address: String,
}
