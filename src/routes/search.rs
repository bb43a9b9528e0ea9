//! # 검색 핸들러
//!
//! - `GET /api/search?q=...` → `{ topics, studyGuides, videos, notes }`
//!
//! `q`가 없거나 공백뿐이면 400입니다.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::{SearchQuery, SearchResults},
    services::search as search_service,
    state::AppState,
};

pub async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResults>, AppError> {
    let Query(params) = query?;
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::field("q", "Search query is required"))?;

    let results = search_service::search(&state.pool, &auth.user_id, query).await?;
    Ok(Json(results))
}
