//! Article like model

use serde::{Deserialize, Serialize};

/// A like (or explicit un-like) of an article by an email account.
/// At most one exists per (article, email account) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleLike {
    pub like_id: i64,
    pub is_liked: bool,
    pub article_id: i64,
    pub email_account_id: i64,
}

/// Input for posting a like
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLikeInput {
    #[serde(default = "default_is_liked")]
    pub is_liked: bool,
}

impl Default for CreateLikeInput {
    fn default() -> Self {
        Self {
            is_liked: default_is_liked(),
        }
    }
}

fn default_is_liked() -> bool {
    true
}
