//! Article service
//!
//! Articles belong to a blog. Reading a single article counts as a view.

use crate::db::repositories::{ArticleRepository, BlogRepository};
use crate::models::{Article, CreateArticleInput, UpdateArticleInput};
use crate::services::validation::{ValidationErrors, MAX_TITLE_FIELD_LEN};
use crate::services::ServiceError;
use chrono::Utc;
use std::sync::Arc;

pub struct ArticleService {
    articles: Arc<dyn ArticleRepository>,
    blogs: Arc<dyn BlogRepository>,
}

impl ArticleService {
    pub fn new(articles: Arc<dyn ArticleRepository>, blogs: Arc<dyn BlogRepository>) -> Self {
        Self { articles, blogs }
    }

    /// Create an article in `blog_id`
    ///
    /// A `blogId` in the body must agree with `blog_id` when given.
    pub async fn add_article(
        &self,
        blog_id: i64,
        input: CreateArticleInput,
    ) -> Result<Article, ServiceError> {
        validate_create_input(blog_id, &input)?;

        if self.blogs.get_by_id(blog_id).await?.is_none() {
            return Err(ServiceError::not_found("Blog", blog_id));
        }

        let input = CreateArticleInput {
            article_title: input.article_title.trim().to_string(),
            article_author: input.article_author.trim().to_string(),
            article_status: input.article_status.trim().to_string(),
            ..input
        };
        let article = self
            .articles
            .create(&Article::from_input(blog_id, &input, Utc::now()))
            .await?;
        tracing::info!("Created article {} in blog {}", article.article_id, blog_id);
        Ok(article)
    }

    /// Fetch an article, counting the read as a view
    pub async fn get_article(&self, id: i64) -> Result<Article, ServiceError> {
        if !self.articles.increment_views(id).await? {
            return Err(ServiceError::not_found("Article", id));
        }
        self.articles
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Article", id))
    }

    /// Articles of a blog, oldest first
    pub async fn list_articles(&self, blog_id: i64) -> Result<Vec<Article>, ServiceError> {
        Ok(self.articles.list_by_blog(blog_id).await?)
    }

    /// Replace title and author and stamp the update time
    pub async fn update_article(
        &self,
        id: i64,
        input: UpdateArticleInput,
    ) -> Result<(), ServiceError> {
        let mut errors = ValidationErrors::new();
        errors.text("articleTitle", &input.article_title, MAX_TITLE_FIELD_LEN);
        errors.text("articleAuthor", &input.article_author, MAX_TITLE_FIELD_LEN);
        errors.into_result()?;

        let updated = self
            .articles
            .update(
                id,
                input.article_title.trim(),
                input.article_author.trim(),
                Utc::now(),
            )
            .await?;
        if !updated {
            return Err(ServiceError::not_found("Article", id));
        }
        Ok(())
    }

    /// Delete an article; its comments and likes go with it
    pub async fn delete_article(&self, id: i64) -> Result<(), ServiceError> {
        if !self.articles.delete(id).await? {
            return Err(ServiceError::not_found("Article", id));
        }
        tracing::info!("Deleted article {}", id);
        Ok(())
    }
}

/// Load `article_id` and check it belongs to `blog_id`
///
/// An article under a different blog is reported as missing.
pub(crate) async fn require_article_in_blog(
    articles: &dyn ArticleRepository,
    blog_id: i64,
    article_id: i64,
) -> Result<Article, ServiceError> {
    match articles.get_by_id(article_id).await? {
        Some(article) if article.blog_id == blog_id => Ok(article),
        _ => Err(ServiceError::NotFound(format!(
            "Article with ID {} not found in blog {}",
            article_id, blog_id
        ))),
    }
}

fn validate_create_input(blog_id: i64, input: &CreateArticleInput) -> Result<(), ServiceError> {
    let mut errors = ValidationErrors::new();
    errors.text("articleTitle", &input.article_title, MAX_TITLE_FIELD_LEN);
    errors.text("articleAuthor", &input.article_author, MAX_TITLE_FIELD_LEN);
    errors.text("articleStatus", &input.article_status, MAX_TITLE_FIELD_LEN);
    errors.require("content", &input.content);

    if input.article_views_count.is_some_and(|views| views < 0) {
        errors.add("articleViewsCount", "The field articleViewsCount must not be negative.");
    }
    if let Some(body_blog_id) = input.blog_id {
        if body_blog_id != blog_id {
            errors.add(
                "blogId",
                format!(
                    "The blogId in the body ({}) does not match the route ({}).",
                    body_blog_id, blog_id
                ),
            );
        }
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxArticleRepository, SqlxBlogRepository, SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{is_published, Blog};
    use chrono::NaiveDate;

    async fn setup_test_service() -> (ArticleService, i64) {
        let pool = create_test_pool()
            .await
            .expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let (_, accounts) = SqlxUserRepository::new(pool.clone())
            .create_with_email_accounts("ann", &["ann@example.com".to_string()])
            .await
            .unwrap();
        let blogs = SqlxBlogRepository::boxed(pool.clone());
        let blog = blogs
            .create(&Blog::new(
                "Notes".to_string(),
                "Ann".to_string(),
                "Tech".to_string(),
                accounts[0].email_account_id,
            ))
            .await
            .unwrap();

        let service = ArticleService::new(SqlxArticleRepository::boxed(pool), blogs);
        (service, blog.blog_id)
    }

    fn input(title: &str, status: &str) -> CreateArticleInput {
        CreateArticleInput {
            article_title: title.to_string(),
            article_author: "Ann".to_string(),
            article_status: status.to_string(),
            content: "Body".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_add_article() {
        let (service, blog_id) = setup_test_service().await;

        let article = service.add_article(blog_id, input("Hello", "draft")).await.unwrap();
        assert!(article.article_id > 0);
        assert_eq!(article.blog_id, blog_id);
        assert_eq!(article.article_views_count, 0);
        assert!(article.published_timestamp.is_none());
    }

    #[tokio::test]
    async fn test_add_published_article_stamps_publish_time() {
        let (service, blog_id) = setup_test_service().await;

        let article = service
            .add_article(blog_id, input("Live", "published"))
            .await
            .unwrap();
        assert!(is_published(&article.article_status));
        assert_eq!(article.published_timestamp, Some(article.created_timestamp));
    }

    #[tokio::test]
    async fn test_add_article_keeps_given_dates() {
        let (service, blog_id) = setup_test_service().await;
        let mut input = input("Dated", "draft");
        input.updated_timestamp = NaiveDate::from_ymd_opt(2024, 3, 4);
        input.article_views_count = Some(10);
        input.blog_id = Some(blog_id);

        let article = service.add_article(blog_id, input).await.unwrap();
        assert_eq!(
            article.updated_timestamp.map(|t| t.date_naive()),
            NaiveDate::from_ymd_opt(2024, 3, 4)
        );
        assert_eq!(article.article_views_count, 10);
    }

    #[tokio::test]
    async fn test_add_article_validation() {
        let (service, blog_id) = setup_test_service().await;
        let mut bad = input("", "draft");
        bad.content = String::new();
        bad.article_views_count = Some(-1);
        bad.blog_id = Some(blog_id + 1);

        match service.add_article(blog_id, bad).await {
            Err(ServiceError::ValidationError(errors)) => {
                let fields: Vec<_> = errors.fields().collect();
                assert_eq!(
                    fields,
                    vec!["articleTitle", "articleViewsCount", "blogId", "content"]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_article_to_missing_blog() {
        let (service, _) = setup_test_service().await;
        let result = service.add_article(999, input("Lost", "draft")).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_article_counts_views() {
        let (service, blog_id) = setup_test_service().await;
        let created = service.add_article(blog_id, input("Read me", "draft")).await.unwrap();

        let first = service.get_article(created.article_id).await.unwrap();
        assert_eq!(first.article_views_count, 1);
        let second = service.get_article(created.article_id).await.unwrap();
        assert_eq!(second.article_views_count, 2);

        assert!(matches!(
            service.get_article(999).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_articles() {
        let (service, blog_id) = setup_test_service().await;
        assert!(service.list_articles(blog_id).await.unwrap().is_empty());

        service.add_article(blog_id, input("One", "draft")).await.unwrap();
        service.add_article(blog_id, input("Two", "draft")).await.unwrap();

        let titles: Vec<_> = service
            .list_articles(blog_id)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.article_title)
            .collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[tokio::test]
    async fn test_update_article() {
        let (service, blog_id) = setup_test_service().await;
        let created = service.add_article(blog_id, input("Before", "draft")).await.unwrap();

        service
            .update_article(
                created.article_id,
                UpdateArticleInput {
                    article_title: "After".to_string(),
                    article_author: "Bob".to_string(),
                },
            )
            .await
            .unwrap();

        let updated = service.get_article(created.article_id).await.unwrap();
        assert_eq!(updated.article_title, "After");
        assert_eq!(updated.article_author, "Bob");
        assert!(updated.updated_timestamp.is_some());
    }

    #[tokio::test]
    async fn test_update_article_errors() {
        let (service, _) = setup_test_service().await;

        let missing = service
            .update_article(
                999,
                UpdateArticleInput {
                    article_title: "a".to_string(),
                    article_author: "b".to_string(),
                },
            )
            .await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));

        let invalid = service
            .update_article(1, UpdateArticleInput::default())
            .await;
        assert!(matches!(invalid, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_delete_article() {
        let (service, blog_id) = setup_test_service().await;
        let created = service.add_article(blog_id, input("Gone", "draft")).await.unwrap();

        service.delete_article(created.article_id).await.unwrap();
        assert!(matches!(
            service.delete_article(created.article_id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_require_article_in_blog() {
        let (service, blog_id) = setup_test_service().await;
        let created = service.add_article(blog_id, input("Scoped", "draft")).await.unwrap();

        let found = require_article_in_blog(service.articles.as_ref(), blog_id, created.article_id)
            .await
            .unwrap();
        assert_eq!(found.article_id, created.article_id);

        let wrong_blog =
            require_article_in_blog(service.articles.as_ref(), blog_id + 1, created.article_id)
                .await;
        assert!(matches!(wrong_blog, Err(ServiceError::NotFound(_))));
    }
}
