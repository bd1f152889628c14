//! Email account API endpoints
//!
//! `POST /user/{id}` adds an address to user `id`; `GET /user/{id}` reads
//! email account `id`.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, ApiJson, ApiPath, AppState};
use crate::models::CreateEmailAccountInput;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAccountResponse {
    pub email_address: String,
}

pub async fn add_email_account(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(input): ApiJson<CreateEmailAccountInput>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .email_account_service
        .add_email_account(user_id, input)
        .await?;

    let location = format!("/user/{}", account.email_account_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(EmailAccountResponse {
            email_address: account.email_address,
        }),
    ))
}

pub async fn get_email_account(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.email_account_service.get_email_account(id).await?;
    Ok(Json(EmailAccountResponse {
        email_address: account.email_address,
    }))
}
