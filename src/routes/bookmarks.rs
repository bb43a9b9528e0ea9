use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::deleted;
use crate::{
    db::bookmarks as db_bookmarks,
    error::AppError,
    middleware::auth::AuthUser,
    models::{Bookmark, CreateBookmarkRequest, NewBookmark, UpdateBookmarkRequest},
    state::AppState,
    validation::{Validate, ValidJson},
};

pub async fn list_bookmarks(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Bookmark>>, AppError> {
    let bookmarks = db_bookmarks::list_bookmarks(&state.pool, &auth.user_id).await?;
    Ok(Json(bookmarks))
}

pub async fn get_bookmark(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Bookmark>, AppError> {
    let Path(id) = path?;
    db_bookmarks::find_bookmark(&state.pool, &auth.user_id, &id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Bookmark"))
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<Bookmark>), AppError> {
    let new = NewBookmark::from(req);
    let bookmark = db_bookmarks::create_bookmark(&state.pool, &auth.user_id, &new).await?;
    tracing::debug!(resource = ?bookmark.target(), "Bookmark created");
    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// 병합한 결과의 위치 정보가 종류와 맞는지 다시 확인합니다.
/// (예: pdf 북마크를 video로 바꾸면서 pageNumber를 그대로 두면 400)
pub async fn update_bookmark(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
    ValidJson(req): ValidJson<UpdateBookmarkRequest>,
) -> Result<Json<Bookmark>, AppError> {
    let Path(id) = path?;
    let mut bookmark = db_bookmarks::find_bookmark(&state.pool, &auth.user_id, &id)
        .await?
        .ok_or(AppError::NotFound("Bookmark"))?;

    bookmark.apply(req);
    bookmark.validate()?;

    let bookmark = db_bookmarks::update_bookmark(&state.pool, &bookmark).await?;
    Ok(Json(bookmark))
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = path?;
    if !db_bookmarks::delete_bookmark(&state.pool, &auth.user_id, &id).await? {
        return Err(AppError::NotFound("Bookmark"));
    }
    Ok(deleted("Bookmark"))
}
