//! Article comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Comment left on an article
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleComment {
    pub comment_id: i64,
    pub commentator_name: String,
    pub comment: String,
    pub created_timestamp: DateTime<Utc>,
    pub article_id: i64,
}

/// Input for commenting on an article
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    #[serde(default)]
    pub commentator_name: String,
    #[serde(default)]
    pub comment: String,
    /// Defaults to the time the comment is stored
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_timestamp: Option<DateTime<Utc>>,
}
