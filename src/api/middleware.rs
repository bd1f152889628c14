//! API middleware and shared handler plumbing
//!
//! Contains:
//! - `AppState` with the services every handler uses
//! - `ApiError`, the JSON error envelope, and its mapping from `ServiceError`
//! - `ApiJson` / `ApiPath` / `ApiQuery` extractors that report rejections
//!   through the same envelope
//! - Request statistics middleware

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Request, State,
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::db::repositories::{
    SqlxArticleRepository, SqlxBlogRepository, SqlxCommentRepository, SqlxEmailAccountRepository,
    SqlxLikeRepository, SqlxUserRepository,
};
use crate::db::DynDatabasePool;
use crate::services::validation::VALIDATION_MESSAGE;
use crate::services::{
    ArticleService, BlogService, CommentService, EmailAccountService, LikeService, ServiceError,
    UserService,
};

// ============================================================================
// Request Statistics
// ============================================================================

/// Lightweight request statistics using atomic operations (no locks)
pub struct RequestStats {
    total_requests: AtomicU64,
    total_response_time_us: AtomicU64,
    start_time: Instant,
}

impl RequestStats {
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_response_time_us: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a request with its response time
    pub fn record(&self, duration_us: u64) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_response_time_us
            .fetch_add(duration_us, Ordering::Relaxed);
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Average response time in microseconds
    pub fn avg_response_time_us(&self) -> f64 {
        let total = self.total_requests.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        let total_time = self.total_response_time_us.load(Ordering::Relaxed);
        total_time as f64 / total as f64
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Records request count and response time for every request
pub async fn request_stats_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let response = next.run(request).await;
    state
        .request_stats
        .record(start.elapsed().as_micros() as u64);
    response
}

// ============================================================================
// Application State
// ============================================================================

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: DynDatabasePool,
    pub user_service: Arc<UserService>,
    pub email_account_service: Arc<EmailAccountService>,
    pub blog_service: Arc<BlogService>,
    pub article_service: Arc<ArticleService>,
    pub comment_service: Arc<CommentService>,
    pub like_service: Arc<LikeService>,
    pub request_stats: Arc<RequestStats>,
}

impl AppState {
    /// Wire every repository and service onto one pool
    pub fn new(pool: DynDatabasePool) -> Self {
        let user_repo = SqlxUserRepository::boxed(pool.clone());
        let email_account_repo = SqlxEmailAccountRepository::boxed(pool.clone());
        let blog_repo = SqlxBlogRepository::boxed(pool.clone());
        let article_repo = SqlxArticleRepository::boxed(pool.clone());
        let comment_repo = SqlxCommentRepository::boxed(pool.clone());
        let like_repo = SqlxLikeRepository::boxed(pool.clone());

        Self {
            user_service: Arc::new(UserService::new(
                user_repo.clone(),
                email_account_repo.clone(),
            )),
            email_account_service: Arc::new(EmailAccountService::new(
                user_repo,
                email_account_repo.clone(),
            )),
            blog_service: Arc::new(BlogService::new(
                blog_repo.clone(),
                email_account_repo.clone(),
            )),
            article_service: Arc::new(ArticleService::new(article_repo.clone(), blog_repo)),
            comment_service: Arc::new(CommentService::new(comment_repo, article_repo.clone())),
            like_service: Arc::new(LikeService::new(
                like_repo,
                article_repo,
                email_account_repo,
            )),
            request_stats: Arc::new(RequestStats::new()),
            pool,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new("SERVICE_UNAVAILABLE", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        match self.error.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            "SERVICE_UNAVAILABLE" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(message) => Self::not_found(message),
            ServiceError::ValidationError(errors) => Self::with_details(
                "VALIDATION_ERROR",
                VALIDATION_MESSAGE,
                serde_json::to_value(&errors).unwrap_or_default(),
            ),
            ServiceError::Conflict(message) => Self::conflict(message),
            ServiceError::InternalError(e) => {
                tracing::error!("Request failed: {:#}", e);
                Self::internal_error("Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation_error(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation_error(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation_error(rejection.body_text())
    }
}

// ============================================================================
// Extractors
// ============================================================================

/// JSON body whose rejections use the `ApiError` envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejections use the `ApiError` envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string whose rejections use the `ApiError` envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ValidationErrors;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::validation_error("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::service_unavailable("x").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::internal_error("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_errors_become_details() {
        let mut errors = ValidationErrors::new();
        errors.add("blogTitle", "The blogTitle field is required.");

        let api_error = ApiError::from(ServiceError::ValidationError(errors));
        assert_eq!(api_error.error.code, "VALIDATION_ERROR");
        assert_eq!(api_error.error.message, VALIDATION_MESSAGE);
        assert_eq!(
            api_error.error.details,
            Some(serde_json::json!({"blogTitle": ["The blogTitle field is required."]}))
        );
    }

    #[test]
    fn test_internal_errors_are_not_leaked() {
        let api_error = ApiError::from(ServiceError::InternalError(anyhow::anyhow!(
            "database is locked"
        )));
        assert_eq!(api_error.error.code, "INTERNAL_ERROR");
        assert!(!api_error.error.message.contains("locked"));
    }

    #[test]
    fn test_error_serialization_omits_empty_details() {
        let value = serde_json::to_value(ApiError::not_found("Blog with ID 1 not found")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"error": {"code": "NOT_FOUND", "message": "Blog with ID 1 not found"}})
        );
    }

    #[test]
    fn test_request_stats() {
        let stats = RequestStats::new();
        assert_eq!(stats.avg_response_time_us(), 0.0);
        stats.record(100);
        stats.record(300);
        assert_eq!(stats.total_requests(), 2);
        assert_eq!(stats.avg_response_time_us(), 200.0);
    }
}
