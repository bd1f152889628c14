//! Article like service
//!
//! Each email account holds at most one like per article.

use crate::db::repositories::{ArticleRepository, EmailAccountRepository, LikeRepository};
use crate::models::{ArticleLike, CreateLikeInput};
use crate::services::article::require_article_in_blog;
use crate::services::ServiceError;
use std::sync::Arc;

pub struct LikeService {
    likes: Arc<dyn LikeRepository>,
    articles: Arc<dyn ArticleRepository>,
    email_accounts: Arc<dyn EmailAccountRepository>,
}

impl LikeService {
    pub fn new(
        likes: Arc<dyn LikeRepository>,
        articles: Arc<dyn ArticleRepository>,
        email_accounts: Arc<dyn EmailAccountRepository>,
    ) -> Self {
        Self {
            likes,
            articles,
            email_accounts,
        }
    }

    /// Record `email_account_id`'s like of an article
    pub async fn add_like(
        &self,
        email_account_id: i64,
        blog_id: i64,
        article_id: i64,
        input: CreateLikeInput,
    ) -> Result<ArticleLike, ServiceError> {
        require_article_in_blog(self.articles.as_ref(), blog_id, article_id).await?;
        if !self.email_accounts.exists(email_account_id).await? {
            return Err(ServiceError::not_found("EmailAccount", email_account_id));
        }

        let like = self
            .likes
            .create(article_id, email_account_id, input.is_liked)
            .await?
            .ok_or_else(|| {
                ServiceError::Conflict(format!(
                    "Email account {} has already liked article {}",
                    email_account_id, article_id
                ))
            })?;
        tracing::info!(
            "Email account {} liked article {} ({})",
            email_account_id,
            article_id,
            like.is_liked
        );
        Ok(like)
    }

    pub async fn get_like(
        &self,
        email_account_id: i64,
        blog_id: i64,
        article_id: i64,
    ) -> Result<ArticleLike, ServiceError> {
        require_article_in_blog(self.articles.as_ref(), blog_id, article_id).await?;
        self.likes
            .get(article_id, email_account_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Like by email account {} on article {} not found",
                    email_account_id, article_id
                ))
            })
    }

    /// Number of like rows on an article, whatever their `is_liked` value
    pub async fn count_likes(&self, blog_id: i64, article_id: i64) -> Result<i64, ServiceError> {
        require_article_in_blog(self.articles.as_ref(), blog_id, article_id).await?;
        Ok(self.likes.count_likes(article_id).await?)
    }

    pub async fn delete_like(
        &self,
        email_account_id: i64,
        blog_id: i64,
        article_id: i64,
    ) -> Result<(), ServiceError> {
        require_article_in_blog(self.articles.as_ref(), blog_id, article_id).await?;
        if !self.likes.delete(article_id, email_account_id).await? {
            return Err(ServiceError::NotFound(format!(
                "Like by email account {} on article {} not found",
                email_account_id, article_id
            )));
        }
        tracing::info!(
            "Deleted like by email account {} on article {}",
            email_account_id,
            article_id
        );
        Ok(())
    }
}
