//! # 인증 라우트 핸들러
//!
//! - `POST /api/auth/register` → 201 사용자 (토큰 없음)
//! - `POST /api/auth/login`    → 200 `{ user, token }`
//! - `GET  /api/auth/me`       → 200 사용자 | 404

use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::{create_token, AuthUser},
    models::user::*,
    services::accounts,
    state::AppState,
    validation::ValidJson,
};
use axum::{extract::State, http::StatusCode, Json};

pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = accounts::register(&state.pool, req).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = accounts::authenticate(&state.pool, req)
        .await?
        .ok_or(AppError::Unauthorized("Invalid email or password".to_string()))?;

    let token = create_token(&user, &state.jwt_secret, state.jwt_ttl_hours)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(user.into()))
}
