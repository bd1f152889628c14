//! User API endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, ApiJson, ApiPath, AppState};
use crate::models::{CreateUserInput, EmailAccount};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add-user", post(add_user))
        .route("/get-user/{id}", get(get_user))
}

/// Body returned after registration: the name and the last address added
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreatedResponse {
    pub user_name: String,
    pub email_account: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailResponse {
    pub user_id: i64,
    pub user_name: String,
    pub email_accounts: Vec<EmailAccountSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAccountSummary {
    pub email_account_id: i64,
    pub email_address: String,
}

impl From<EmailAccount> for EmailAccountSummary {
    fn from(account: EmailAccount) -> Self {
        Self {
            email_account_id: account.email_account_id,
            email_address: account.email_address,
        }
    }
}

async fn add_user(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateUserInput>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, accounts) = state.user_service.add_user(input).await?;

    let response = UserCreatedResponse {
        user_name: user.user_name,
        email_account: accounts
            .last()
            .map(|account| account.email_address.clone())
            .unwrap_or_default(),
    };
    let location = format!("/users/get-user/{}", user.user_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(response),
    ))
}

async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.user_service.get_user(id).await?;
    Ok(Json(UserDetailResponse {
        user_id: detail.user.user_id,
        user_name: detail.user.user_name,
        email_accounts: detail
            .email_accounts
            .into_iter()
            .map(EmailAccountSummary::from)
            .collect(),
    }))
}
