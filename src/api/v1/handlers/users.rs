/*
 * Responsibility
 * - POST /register, POST /login (認証不要)
 * - 入力チェックと認証は UserService、ここは HTTP への変換のみ
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::dto::users::{CredentialsRequest, TokenResponse, UserResponse},
    error::AppError,
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = state.users.register(&req.username, &req.password).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let issued = state.users.login(&req.username, &req.password).await?;

    Ok(Json(issued.into()))
}
