//! Services layer - Business logic
//!
//! Services validate inputs, check that parent rows exist and call the
//! repositories. Every operation reports failures as [`ServiceError`].

pub mod article;
pub mod blog;
pub mod comment;
pub mod email_account;
mod error;
pub mod like;
pub mod user;
pub mod validation;

pub use article::ArticleService;
pub use blog::BlogService;
pub use comment::CommentService;
pub use email_account::EmailAccountService;
pub use error::ServiceError;
pub use like::LikeService;
pub use user::UserService;
pub use validation::ValidationErrors;
