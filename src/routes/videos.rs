use axum::{
    extract::{rejection::{PathRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::{deleted, ensure_topic};
use crate::{
    db::videos as db_videos,
    error::AppError,
    middleware::auth::AuthUser,
    models::{normalize_ref, CreateVideoRequest, UpdateVideoRequest, Video, VideoFilter},
    state::AppState,
    validation::ValidJson,
};

/// `GET /api/videos?topicId=...`
pub async fn list_videos(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<VideoFilter>, QueryRejection>,
) -> Result<Json<Vec<Video>>, AppError> {
    let Query(filter) = query?;
    let topic_id = normalize_ref(filter.topic_id);
    let videos = db_videos::list_videos(&state.pool, &auth.user_id, topic_id.as_deref()).await?;
    Ok(Json(videos))
}

pub async fn get_video(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Video>, AppError> {
    let Path(id) = path?;
    db_videos::find_video(&state.pool, &auth.user_id, &id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Video"))
}

pub async fn create_video(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(mut req): ValidJson<CreateVideoRequest>,
) -> Result<(StatusCode, Json<Video>), AppError> {
    req.topic_id = normalize_ref(req.topic_id);
    ensure_topic(&state, &auth.user_id, req.topic_id.as_deref()).await?;

    let video = db_videos::create_video(&state.pool, &auth.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

pub async fn update_video(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
    ValidJson(mut req): ValidJson<UpdateVideoRequest>,
) -> Result<Json<Video>, AppError> {
    let Path(id) = path?;
    let mut video = db_videos::find_video(&state.pool, &auth.user_id, &id)
        .await?
        .ok_or(AppError::NotFound("Video"))?;

    if let Some(topic_id) = req.topic_id.take() {
        let topic_id = normalize_ref(topic_id);
        ensure_topic(&state, &auth.user_id, topic_id.as_deref()).await?;
        req.topic_id = Some(topic_id);
    }

    video.apply(req);
    let video = db_videos::update_video(&state.pool, &video).await?;
    Ok(Json(video))
}

pub async fn delete_video(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = path?;
    if !db_videos::delete_video(&state.pool, &auth.user_id, &id).await? {
        return Err(AppError::NotFound("Video"));
    }
    Ok(deleted("Video"))
}
