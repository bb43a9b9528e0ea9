//! # 일정 라우트 핸들러
//!
//! - `GET /api/schedule?date=YYYY-MM-DD` → 해당 UTC 날짜에 시작하는 일정 (시작 시각 오름차순)
//! - 생성과 수정 모두 `startTime < endTime`을 검사합니다. 역전된 구간은 400입니다.

use axum::{
    extract::{rejection::{PathRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::{deleted, ensure_topic};
use crate::{
    db::schedule as db_schedule,
    error::AppError,
    middleware::auth::AuthUser,
    models::{
        normalize_ref, CreateScheduleItemRequest, NewScheduleItem, ScheduleFilter, ScheduleItem,
        UpdateScheduleItemRequest,
    },
    state::AppState,
    validation::ValidJson,
};

pub async fn list_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<ScheduleFilter>, QueryRejection>,
) -> Result<Json<Vec<ScheduleItem>>, AppError> {
    let Query(filter) = query?;
    let range = filter
        .day_range()
        .map_err(|e| AppError::Validation(vec![e]))?;

    let items = db_schedule::list_schedule(
        &state.pool,
        &auth.user_id,
        range.as_ref().map(|(from, to)| (from.as_str(), to.as_str())),
    )
    .await?;
    Ok(Json(items))
}

pub async fn get_schedule_item(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ScheduleItem>, AppError> {
    let Path(id) = path?;
    db_schedule::find_schedule_item(&state.pool, &auth.user_id, &id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Schedule item"))
}

pub async fn create_schedule_item(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateScheduleItemRequest>,
) -> Result<(StatusCode, Json<ScheduleItem>), AppError> {
    let mut item = NewScheduleItem::from_request(req)?;
    item.topic_id = normalize_ref(item.topic_id);
    ensure_topic(&state, &auth.user_id, item.topic_id.as_deref()).await?;

    let item = db_schedule::create_schedule_item(&state.pool, &auth.user_id, &item).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_schedule_item(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
    ValidJson(mut req): ValidJson<UpdateScheduleItemRequest>,
) -> Result<Json<ScheduleItem>, AppError> {
    let Path(id) = path?;
    let mut item = db_schedule::find_schedule_item(&state.pool, &auth.user_id, &id)
        .await?
        .ok_or(AppError::NotFound("Schedule item"))?;

    if let Some(topic_id) = req.topic_id.take() {
        let topic_id = normalize_ref(topic_id);
        ensure_topic(&state, &auth.user_id, topic_id.as_deref()).await?;
        req.topic_id = Some(topic_id);
    }

    item.apply(req)?;
    let item = db_schedule::update_schedule_item(&state.pool, &item).await?;
    Ok(Json(item))
}

pub async fn delete_schedule_item(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = path?;
    if !db_schedule::delete_schedule_item(&state.pool, &auth.user_id, &id).await? {
        return Err(AppError::NotFound("Schedule item"));
    }
    Ok(deleted("Schedule item"))
}
