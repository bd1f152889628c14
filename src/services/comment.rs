//! Article comment service

use crate::db::repositories::{ArticleRepository, CommentRepository};
use crate::models::{ArticleComment, CreateCommentInput};
use crate::services::article::require_article_in_blog;
use crate::services::validation::{ValidationErrors, MAX_COMMENTATOR_NAME_LEN};
use crate::services::ServiceError;
use chrono::Utc;
use std::sync::Arc;

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    articles: Arc<dyn ArticleRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, articles: Arc<dyn ArticleRepository>) -> Self {
        Self { comments, articles }
    }

    /// Comment on an article of `blog_id`
    pub async fn add_comment(
        &self,
        blog_id: i64,
        article_id: i64,
        input: CreateCommentInput,
    ) -> Result<ArticleComment, ServiceError> {
        let mut errors = ValidationErrors::new();
        errors.text("commentatorName", &input.commentator_name, MAX_COMMENTATOR_NAME_LEN);
        errors.require("comment", &input.comment);
        errors.into_result()?;

        require_article_in_blog(self.articles.as_ref(), blog_id, article_id).await?;

        let comment = self
            .comments
            .create(
                article_id,
                input.commentator_name.trim(),
                &input.comment,
                input.created_timestamp.unwrap_or_else(Utc::now),
            )
            .await?;
        tracing::info!("Added comment {} to article {}", comment.comment_id, article_id);
        Ok(comment)
    }

    /// Comments of an article, oldest first
    pub async fn list_comments(
        &self,
        blog_id: i64,
        article_id: i64,
    ) -> Result<Vec<ArticleComment>, ServiceError> {
        require_article_in_blog(self.articles.as_ref(), blog_id, article_id).await?;
        Ok(self.comments.list_by_article(article_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::test_support::{seed_article, Seeded};
    use crate::db::repositories::{SqlxArticleRepository, SqlxCommentRepository};
    use crate::db::{create_test_pool, migrations};
    use chrono::TimeZone;

    async fn setup_test_service() -> (CommentService, Seeded) {
        let pool = create_test_pool()
            .await
            .expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let seeded = seed_article(&pool).await;
        let service = CommentService::new(
            SqlxCommentRepository::boxed(pool.clone()),
            SqlxArticleRepository::boxed(pool),
        );
        (service, seeded)
    }

    fn input(name: &str, comment: &str) -> CreateCommentInput {
        CreateCommentInput {
            commentator_name: name.to_string(),
            comment: comment.to_string(),
            created_timestamp: None,
        }
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let (service, s) = setup_test_service().await;
        let at = Utc.with_ymd_and_hms(2024, 7, 9, 8, 0, 0).unwrap();

        let mut first = input("ann", "first!");
        first.created_timestamp = Some(at);
        let created = service.add_comment(s.blog_id, s.article_id, first).await.unwrap();
        assert_eq!(created.created_timestamp, at);

        service
            .add_comment(s.blog_id, s.article_id, input("bob", "second"))
            .await
            .unwrap();

        let comments = service.list_comments(s.blog_id, s.article_id).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].commentator_name, "ann");
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (service, s) = setup_test_service().await;
        assert!(service
            .list_comments(s.blog_id, s.article_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_article_must_belong_to_blog() {
        let (service, s) = setup_test_service().await;

        let add = service
            .add_comment(s.blog_id + 1, s.article_id, input("ann", "hi"))
            .await;
        assert!(matches!(add, Err(ServiceError::NotFound(_))));

        let list = service.list_comments(s.blog_id, 999).await;
        assert!(matches!(list, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_validation() {
        let (service, s) = setup_test_service().await;
        match service.add_comment(s.blog_id, s.article_id, input("", " ")).await {
            Err(ServiceError::ValidationError(errors)) => {
                assert!(errors.field("commentatorName").is_some());
                assert!(errors.field("comment").is_some());
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
