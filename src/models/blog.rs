//! Blog model

use serde::{Deserialize, Serialize};

/// Blog entity, owned by an email account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub blog_id: i64,
    pub blog_title: String,
    pub blog_author: String,
    pub blog_category: String,
    pub email_account_id: i64,
}

impl Blog {
    pub fn new(
        blog_title: String,
        blog_author: String,
        blog_category: String,
        email_account_id: i64,
    ) -> Self {
        Self {
            blog_id: 0,
            blog_title,
            blog_author,
            blog_category,
            email_account_id,
        }
    }
}

/// Input for creating a blog
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogInput {
    #[serde(default)]
    pub blog_title: String,
    #[serde(default)]
    pub blog_author: String,
    #[serde(default)]
    pub blog_category: String,
    #[serde(default, alias = "emailAccountid")]
    pub email_account_id: Option<i64>,
}

/// Input for editing a blog; every field is replaced
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogInput {
    #[serde(default)]
    pub blog_title: String,
    #[serde(default)]
    pub blog_author: String,
    #[serde(default)]
    pub blog_category: String,
}
