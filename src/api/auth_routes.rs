//! Login endpoint

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::auth;
use crate::domain::UserInfo;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// POST /api/auth/login
///
/// Unknown email and wrong password produce the same response, so the
/// endpoint never confirms which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .store
        .user_by_email(request.email.trim())
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !auth::verify_password(&request.password, &user.password)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = auth::issue_token(
        user.id,
        user.role,
        &user.email,
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
    )?;

    tracing::info!(user_id = user.id, role = %user.role, "login successful");

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}
