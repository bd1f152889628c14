//! Article like API endpoints
//!
//! Mounted under `/user/{id}/blog/{blog_id}/article/{article_id}`; the
//! email account id identifies who likes the article.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, ApiJson, ApiPath, AppState};
use crate::models::CreateLikeInput;

type ArticlePath = (i64, i64, i64);

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub is_liked: bool,
}

pub async fn post_like(
    State(state): State<AppState>,
    ApiPath((email_account_id, blog_id, article_id)): ApiPath<ArticlePath>,
    ApiJson(input): ApiJson<CreateLikeInput>,
) -> Result<impl IntoResponse, ApiError> {
    let like = state
        .like_service
        .add_like(email_account_id, blog_id, article_id, input)
        .await?;

    let location = format!(
        "/user/{}/blog/{}/article/{}/get-like",
        email_account_id, blog_id, article_id
    );
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(LikeResponse {
            is_liked: like.is_liked,
        }),
    ))
}

pub async fn get_like(
    State(state): State<AppState>,
    ApiPath((email_account_id, blog_id, article_id)): ApiPath<ArticlePath>,
) -> Result<impl IntoResponse, ApiError> {
    let like = state
        .like_service
        .get_like(email_account_id, blog_id, article_id)
        .await?;
    Ok(Json(LikeResponse {
        is_liked: like.is_liked,
    }))
}

pub async fn get_likes(
    State(state): State<AppState>,
    ApiPath((_email_account_id, blog_id, article_id)): ApiPath<ArticlePath>,
) -> Result<impl IntoResponse, ApiError> {
    let count = state.like_service.count_likes(blog_id, article_id).await?;
    Ok(Json(count))
}

pub async fn delete_like(
    State(state): State<AppState>,
    ApiPath((email_account_id, blog_id, article_id)): ApiPath<ArticlePath>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .like_service
        .delete_like(email_account_id, blog_id, article_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
