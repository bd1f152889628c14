//! Blog API endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, ApiJson, ApiPath, AppState};
use crate::models::{CreateBlogInput, UpdateBlogInput};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add-blog", post(add_blog))
        .route("/get-blog/{id}", get(get_blog))
        .route("/get-all-blogs/{id}", get(list_blogs))
        .route("/delete-blog/{id}", delete(delete_blog))
        .route("/edit-blog/{id}", put(update_blog))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogCreatedResponse {
    pub blog_title: String,
    pub blog_author: String,
    pub blog_category: String,
}

async fn add_blog(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateBlogInput>,
) -> Result<impl IntoResponse, ApiError> {
    let blog = state.blog_service.add_blog(input).await?;

    let location = format!("/blogs/get-blog/{}", blog.blog_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(BlogCreatedResponse {
            blog_title: blog.blog_title,
            blog_author: blog.blog_author,
            blog_category: blog.blog_category,
        }),
    ))
}

async fn get_blog(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let blog = state.blog_service.get_blog(id).await?;
    Ok(Json(blog))
}

/// Blogs of an email account; an empty result is a 404
async fn list_blogs(
    State(state): State<AppState>,
    ApiPath(email_account_id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let blogs = state.blog_service.list_blogs(email_account_id).await?;
    if blogs.is_empty() {
        return Err(ApiError::not_found(format!(
            "No blogs found for email account {}",
            email_account_id
        )));
    }
    Ok(Json(blogs))
}

async fn delete_blog(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.blog_service.delete_blog(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_blog(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UpdateBlogInput>,
) -> Result<impl IntoResponse, ApiError> {
    state.blog_service.update_blog(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}
