//! # 학습 진행도 핸들러
//!
//! - `GET /api/study-progress` → 진행도 (없으면 0으로 생성)
//! - `PUT /api/study-progress` → 보낸 카운터만 덮어쓰기

use axum::{extract::State, Json};

use crate::{
    db::progress as db_progress,
    error::AppError,
    middleware::auth::AuthUser,
    models::{StudyProgress, UpdateStudyProgressRequest},
    state::AppState,
    validation::ValidJson,
};

pub async fn get_progress(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<StudyProgress>, AppError> {
    let progress = db_progress::get_or_create_progress(&state.pool, &auth.user_id).await?;
    Ok(Json(progress))
}

pub async fn update_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<UpdateStudyProgressRequest>,
) -> Result<Json<StudyProgress>, AppError> {
    let mut progress = db_progress::get_or_create_progress(&state.pool, &auth.user_id).await?;
    progress.apply(req);
    let progress = db_progress::save_progress(&state.pool, &progress).await?;
    Ok(Json(progress))
}
