use axum::{
    extract::{rejection::{PathRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::{deleted, ensure_topic};
use crate::{
    db::notes as db_notes,
    error::AppError,
    middleware::auth::AuthUser,
    models::{normalize_ref, CreateNoteRequest, Note, NoteFilter, UpdateNoteRequest},
    state::AppState,
    validation::ValidJson,
};

/// `GET /api/notes?topicId=...`
pub async fn list_notes(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<NoteFilter>, QueryRejection>,
) -> Result<Json<Vec<Note>>, AppError> {
    let Query(filter) = query?;
    let topic_id = normalize_ref(filter.topic_id);
    let notes = db_notes::list_notes(&state.pool, &auth.user_id, topic_id.as_deref()).await?;
    Ok(Json(notes))
}

pub async fn get_note(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Note>, AppError> {
    let Path(id) = path?;
    db_notes::find_note(&state.pool, &auth.user_id, &id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Note"))
}

pub async fn create_note(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let topic_id = normalize_ref(req.topic_id);
    ensure_topic(&state, &auth.user_id, topic_id.as_deref()).await?;

    let note = db_notes::create_note(
        &state.pool,
        &auth.user_id,
        topic_id.as_deref(),
        req.title.trim(),
        &req.content,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update_note(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
    ValidJson(mut req): ValidJson<UpdateNoteRequest>,
) -> Result<Json<Note>, AppError> {
    let Path(id) = path?;
    let mut note = db_notes::find_note(&state.pool, &auth.user_id, &id)
        .await?
        .ok_or(AppError::NotFound("Note"))?;

    if let Some(topic_id) = req.topic_id.take() {
        let topic_id = normalize_ref(topic_id);
        ensure_topic(&state, &auth.user_id, topic_id.as_deref()).await?;
        req.topic_id = Some(topic_id);
    }

    note.apply(req);
    let note = db_notes::update_note(&state.pool, &note).await?;
    Ok(Json(note))
}

pub async fn delete_note(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = path?;
    if !db_notes::delete_note(&state.pool, &auth.user_id, &id).await? {
        return Err(AppError::NotFound("Note"));
    }
    Ok(deleted("Note"))
}
