//! Email account model

use serde::{Deserialize, Serialize};

/// Email account entity, owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAccount {
    pub email_account_id: i64,
    pub email_address: String,
    pub user_id: i64,
}

/// Input for adding an email account to an existing user
///
/// `userId` is accepted for compatibility but the user id in the route wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmailAccountInput {
    #[serde(default)]
    pub email_address: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}
