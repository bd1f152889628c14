//! Article comment API endpoints
//!
//! Mounted under `/user/{id}/blog/{blog_id}/article/{article_id}`. The
//! leading email account id is part of the route but does not restrict
//! who may comment.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, ApiJson, ApiPath, AppState};
use crate::models::{ArticleComment, CreateCommentInput};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub commentator_name: String,
    pub comment: String,
    pub created_timestamp: DateTime<Utc>,
}

impl From<ArticleComment> for CommentResponse {
    fn from(comment: ArticleComment) -> Self {
        Self {
            commentator_name: comment.commentator_name,
            comment: comment.comment,
            created_timestamp: comment.created_timestamp,
        }
    }
}

pub async fn add_comment(
    State(state): State<AppState>,
    ApiPath((_email_account_id, blog_id, article_id)): ApiPath<(i64, i64, i64)>,
    ApiJson(input): ApiJson<CreateCommentInput>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .comment_service
        .add_comment(blog_id, article_id, input)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_comments(
    State(state): State<AppState>,
    ApiPath((_email_account_id, blog_id, article_id)): ApiPath<(i64, i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let comments = state
        .comment_service
        .list_comments(blog_id, article_id)
        .await?;
    let response: Vec<CommentResponse> = comments.into_iter().map(CommentResponse::from).collect();
    Ok(Json(response))
}
