//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the row operations for one entity and dispatches
//! to SQLite or MySQL queries based on the pool's driver.

pub mod article;
pub mod blog;
pub mod comment;
pub mod email_account;
pub mod like;
pub mod user;

pub use article::{ArticleRepository, SqlxArticleRepository};
pub use blog::{BlogRepository, SqlxBlogRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use email_account::{EmailAccountRepository, SqlxEmailAccountRepository};
pub use like::{LikeRepository, SqlxLikeRepository};
pub use user::{SqlxUserRepository, UserRepository};

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixture rows shared by the repository and service tests

    use super::*;
    use crate::db::DynDatabasePool;
    use crate::models::{Article, Blog, CreateArticleInput};
    use chrono::Utc;

    /// Ids of a freshly seeded user → email account → blog → article chain
    pub struct Seeded {
        pub user_id: i64,
        pub email_account_id: i64,
        pub blog_id: i64,
        pub article_id: i64,
    }

    pub async fn seed_article(pool: &DynDatabasePool) -> Seeded {
        let (user, accounts) = SqlxUserRepository::new(pool.clone())
            .create_with_email_accounts("seed", &["seed@example.com".to_string()])
            .await
            .expect("Failed to seed user");
        let email_account_id = accounts[0].email_account_id;

        let blog = SqlxBlogRepository::new(pool.clone())
            .create(&Blog::new(
                "Seed blog".to_string(),
                "Seed".to_string(),
                "Misc".to_string(),
                email_account_id,
            ))
            .await
            .expect("Failed to seed blog");

        let input = CreateArticleInput {
            article_title: "Seed article".to_string(),
            article_author: "Seed".to_string(),
            article_status: "draft".to_string(),
            content: "Seed content".to_string(),
            ..Default::default()
        };
        let article = SqlxArticleRepository::new(pool.clone())
            .create(&Article::from_input(blog.blog_id, &input, Utc::now()))
            .await
            .expect("Failed to seed article");

        Seeded {
            user_id: user.user_id,
            email_account_id,
            blog_id: blog.blog_id,
            article_id: article.article_id,
        }
    }
}
