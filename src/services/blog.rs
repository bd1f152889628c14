//! Blog service

use crate::db::repositories::{BlogRepository, EmailAccountRepository};
use crate::models::{Blog, CreateBlogInput, UpdateBlogInput};
use crate::services::validation::{ValidationErrors, MAX_TITLE_FIELD_LEN};
use crate::services::ServiceError;
use std::sync::Arc;

pub struct BlogService {
    blogs: Arc<dyn BlogRepository>,
    email_accounts: Arc<dyn EmailAccountRepository>,
}

impl BlogService {
    pub fn new(
        blogs: Arc<dyn BlogRepository>,
        email_accounts: Arc<dyn EmailAccountRepository>,
    ) -> Self {
        Self {
            blogs,
            email_accounts,
        }
    }

    pub async fn add_blog(&self, input: CreateBlogInput) -> Result<Blog, ServiceError> {
        let mut errors = ValidationErrors::new();
        validate_blog_fields(
            &mut errors,
            &input.blog_title,
            &input.blog_author,
            &input.blog_category,
        );
        if input.email_account_id.is_none() {
            errors.add("emailAccountId", "The emailAccountId field is required.");
        }
        errors.into_result()?;

        let email_account_id = input.email_account_id.unwrap_or_default();
        if !self.email_accounts.exists(email_account_id).await? {
            return Err(ServiceError::not_found("EmailAccount", email_account_id));
        }

        let blog = self
            .blogs
            .create(&Blog::new(
                input.blog_title.trim().to_string(),
                input.blog_author.trim().to_string(),
                input.blog_category.trim().to_string(),
                email_account_id,
            ))
            .await?;
        tracing::info!("Created blog {} for email account {}", blog.blog_id, email_account_id);
        Ok(blog)
    }

    pub async fn get_blog(&self, id: i64) -> Result<Blog, ServiceError> {
        self.blogs
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Blog", id))
    }

    /// Blogs owned by an email account, oldest first
    pub async fn list_blogs(&self, email_account_id: i64) -> Result<Vec<Blog>, ServiceError> {
        Ok(self.blogs.list_by_email_account(email_account_id).await?)
    }

    pub async fn update_blog(&self, id: i64, input: UpdateBlogInput) -> Result<(), ServiceError> {
        let mut errors = ValidationErrors::new();
        validate_blog_fields(
            &mut errors,
            &input.blog_title,
            &input.blog_author,
            &input.blog_category,
        );
        errors.into_result()?;

        let mut blog = self.get_blog(id).await?;
        blog.blog_title = input.blog_title.trim().to_string();
        blog.blog_author = input.blog_author.trim().to_string();
        blog.blog_category = input.blog_category.trim().to_string();

        if !self.blogs.update(&blog).await? {
            return Err(ServiceError::not_found("Blog", id));
        }
        Ok(())
    }

    /// Delete a blog; its articles, comments and likes go with it
    pub async fn delete_blog(&self, id: i64) -> Result<(), ServiceError> {
        if !self.blogs.delete(id).await? {
            return Err(ServiceError::not_found("Blog", id));
        }
        tracing::info!("Deleted blog {}", id);
        Ok(())
    }
}

fn validate_blog_fields(errors: &mut ValidationErrors, title: &str, author: &str, category: &str) {
    errors.text("blogTitle", title, MAX_TITLE_FIELD_LEN);
    errors.text("blogAuthor", author, MAX_TITLE_FIELD_LEN);
    errors.text("blogCategory", category, MAX_TITLE_FIELD_LEN);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        SqlxBlogRepository, SqlxEmailAccountRepository, SqlxUserRepository, UserRepository,
    };
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_service() -> (BlogService, i64) {
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
        let service = BlogService::new(
            SqlxBlogRepository::boxed(pool.clone()),
            SqlxEmailAccountRepository::boxed(pool),
        );
        (service, accounts[0].email_account_id)
    }

    fn input(title: &str, email_account_id: Option<i64>) -> CreateBlogInput {
        CreateBlogInput {
            blog_title: title.to_string(),
            blog_author: "Ann".to_string(),
            blog_category: "Tech".to_string(),
            email_account_id,
        }
    }

    #[tokio::test]
    async fn test_add_get_and_list() {
        let (service, account_id) = setup_test_service().await;

        let blog = service.add_blog(input("Notes", Some(account_id))).await.unwrap();
        assert_eq!(service.get_blog(blog.blog_id).await.unwrap(), blog);

        service.add_blog(input("More", Some(account_id))).await.unwrap();
        let blogs = service.list_blogs(account_id).await.unwrap();
        assert_eq!(blogs.len(), 2);
        assert!(service.list_blogs(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_requires_email_account_id() {
        let (service, _) = setup_test_service().await;

        match service.add_blog(input("Notes", None)).await {
            Err(ServiceError::ValidationError(errors)) => {
                assert!(errors.field("emailAccountId").is_some());
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_rejects_long_fields() {
        let (service, account_id) = setup_test_service().await;
        let result = service
            .add_blog(input(&"t".repeat(51), Some(account_id)))
            .await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_add_for_missing_email_account() {
        let (service, _) = setup_test_service().await;
        let result = service.add_blog(input("Notes", Some(999))).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_blog() {
        let (service, account_id) = setup_test_service().await;
        let blog = service.add_blog(input("Old", Some(account_id))).await.unwrap();

        service
            .update_blog(
                blog.blog_id,
                UpdateBlogInput {
                    blog_title: "New".to_string(),
                    blog_author: "Bob".to_string(),
                    blog_category: "Life".to_string(),
                },
            )
            .await
            .unwrap();

        let updated = service.get_blog(blog.blog_id).await.unwrap();
        assert_eq!(updated.blog_title, "New");
        assert_eq!(updated.blog_author, "Bob");
        assert_eq!(updated.email_account_id, account_id);
    }

    #[tokio::test]
    async fn test_update_missing_blog() {
        let (service, _) = setup_test_service().await;
        let result = service
            .update_blog(
                999,
                UpdateBlogInput {
                    blog_title: "a".to_string(),
                    blog_author: "b".to_string(),
                    blog_category: "c".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_blog() {
        let (service, account_id) = setup_test_service().await;
        let blog = service.add_blog(input("Gone", Some(account_id))).await.unwrap();

        service.delete_blog(blog.blog_id).await.unwrap();
        assert!(matches!(
            service.get_blog(blog.blog_id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_blog(blog.blog_id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
