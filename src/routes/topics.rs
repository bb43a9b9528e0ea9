//! # 토픽 라우트 핸들러
//!
//! - `GET    /api/topics`     → 목록 (최신순)
//! - `POST   /api/topics`     → 201 생성
//! - `GET    /api/topics/{id}` → 단건 | 404
//! - `PUT    /api/topics/{id}` → 부분 수정 | 404
//! - `DELETE /api/topics/{id}` → 삭제 | 404
//!
//! 토픽을 삭제해도 이를 참조하던 레코드는 남고, 참조만 비워집니다.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::deleted;
use crate::{
    db::topics as db_topics,
    error::AppError,
    middleware::auth::AuthUser,
    models::{CreateTopicRequest, Topic, UpdateTopicRequest, DEFAULT_TOPIC_COLOR},
    state::AppState,
    validation::ValidJson,
};

pub async fn list_topics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Topic>>, AppError> {
    let topics = db_topics::list_topics(&state.pool, &auth.user_id).await?;
    Ok(Json(topics))
}

pub async fn get_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Topic>, AppError> {
    let Path(id) = path?;
    db_topics::find_topic(&state.pool, &auth.user_id, &id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Topic"))
}

pub async fn create_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateTopicRequest>,
) -> Result<(StatusCode, Json<Topic>), AppError> {
    let topic = db_topics::create_topic(
        &state.pool,
        &auth.user_id,
        req.name.trim(),
        req.description.as_deref().unwrap_or_default(),
        req.color.as_deref().unwrap_or(DEFAULT_TOPIC_COLOR),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(topic)))
}

pub async fn update_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
    ValidJson(req): ValidJson<UpdateTopicRequest>,
) -> Result<Json<Topic>, AppError> {
    let Path(id) = path?;
    let mut topic = db_topics::find_topic(&state.pool, &auth.user_id, &id)
        .await?
        .ok_or(AppError::NotFound("Topic"))?;

    topic.apply(req);
    let topic = db_topics::update_topic(&state.pool, &topic).await?;
    Ok(Json(topic))
}

pub async fn delete_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = path?;
    if !db_topics::delete_topic(&state.pool, &auth.user_id, &id).await? {
        return Err(AppError::NotFound("Topic"));
    }
    Ok(deleted("Topic"))
}
