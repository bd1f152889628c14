//! Data models
//!
//! This module contains the data structures of the blogging backend:
//! - Database entities (User, EmailAccount, Blog, Article, ArticleComment, ArticleLike)
//! - API request inputs and response shapes
//! - Timestamp helpers shared by the wire formats

mod article;
mod blog;
mod comment;
mod email_account;
mod like;
pub mod timestamp;
mod user;

pub use article::{
    is_published, Article, ArticleCreatedResponse, ArticleDetail, ArticleSummary,
    CreateArticleInput, UpdateArticleInput, STATUS_PUBLISHED,
};
pub use blog::{Blog, CreateBlogInput, UpdateBlogInput};
pub use comment::{ArticleComment, CreateCommentInput};
pub use email_account::{CreateEmailAccountInput, EmailAccount};
pub use like::{ArticleLike, CreateLikeInput};
pub use user::{CreateUserInput, NewEmailAccountInput, User, UserWithEmailAccounts};
