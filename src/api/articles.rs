//! Article API endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, ApiJson, ApiPath, ApiQuery, AppState};
use crate::models::{
    ArticleCreatedResponse, ArticleDetail, ArticleSummary, CreateArticleInput, UpdateArticleInput,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add-article/{blog_id}", post(add_article))
        .route("/get-article/{id}", get(get_article))
        .route("/get-all-articles", get(list_articles))
        .route("/delete-article/{id}", delete(delete_article))
        .route("/edit-article/{id}", put(update_article))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListArticlesQuery {
    pub blog_id: i64,
}

async fn add_article(
    State(state): State<AppState>,
    ApiPath(blog_id): ApiPath<i64>,
    ApiJson(input): ApiJson<CreateArticleInput>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state.article_service.add_article(blog_id, input).await?;

    let location = format!("/articles/get-article/{}", article.article_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ArticleCreatedResponse::from(&article)),
    ))
}

async fn get_article(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state.article_service.get_article(id).await?;
    Ok(Json(ArticleDetail::from(article)))
}

/// Articles of a blog; an empty result is a 404
async fn list_articles(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListArticlesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let articles = state.article_service.list_articles(query.blog_id).await?;
    if articles.is_empty() {
        return Err(ApiError::not_found(format!(
            "No articles found for blog {}",
            query.blog_id
        )));
    }
    let summaries: Vec<ArticleSummary> = articles.into_iter().map(ArticleSummary::from).collect();
    Ok(Json(summaries))
}

async fn delete_article(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.article_service.delete_article(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_article(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<UpdateArticleInput>,
) -> Result<impl IntoResponse, ApiError> {
    state.article_service.update_article(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}
