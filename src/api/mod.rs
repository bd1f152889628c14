//! API layer - HTTP handlers and routing
//!
//! Route groups:
//! - `/users` - user registration and lookup
//! - `/user/{id}` - email accounts, plus the article comment and like
//!   routes nested below `/user/{id}/blog/{blog_id}/article/{article_id}`
//! - `/blogs` - blog CRUD
//! - `/articles` - article CRUD
//! - `/health` - liveness and database check

pub mod articles;
pub mod blogs;
pub mod comments;
pub mod email_accounts;
pub mod health;
pub mod likes;
pub mod middleware;
pub mod users;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, ApiJson, ApiPath, ApiQuery, AppState, RequestStats};

/// Build the API router
pub fn build_api_router() -> Router<AppState> {
    let article_routes = Router::new()
        .route("/add-comment", post(comments::add_comment))
        .route("/get-comments", get(comments::get_comments))
        .route("/post-like", post(likes::post_like))
        .route("/get-like", get(likes::get_like))
        .route("/get-likes", get(likes::get_likes))
        .route("/delete-like", delete(likes::delete_like));

    Router::new()
        .nest("/users", users::router())
        .route(
            "/user/{id}",
            get(email_accounts::get_email_account).post(email_accounts::add_email_account),
        )
        .nest("/user/{id}/blog/{blog_id}/article/{article_id}", article_routes)
        .nest("/blogs", blogs::router())
        .nest("/articles", articles::router())
        .route("/health", get(health::health))
}

/// CORS policy for the configured origin; `*` allows any origin
pub fn cors_layer(cors_origin: &str) -> CorsLayer {
    let origin = if cors_origin == "*" {
        AllowOrigin::any()
    } else {
        match cors_origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!("Invalid CORS origin '{}', cross-origin requests disabled", cors_origin);
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::LOCATION])
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    build_api_router()
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        // Request stats middleware (outermost layer, runs for all requests)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::request_stats_middleware,
        ))
        .with_state(state)
}
