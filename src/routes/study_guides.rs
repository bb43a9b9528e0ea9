//! # 학습 가이드(PDF) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/study-guides`            → 목록 (업로드 최신순)
//! - `POST   /api/study-guides`            → multipart 업로드 (`/upload`와 동일)
//! - `POST   /api/study-guides/upload`     → multipart 업로드 → 201
//! - `POST   /api/study-guides/migrate`    → 레거시 파일 레코드를 인라인 저장으로 이관
//! - `GET    /api/study-guides/{id}`       → 메타데이터
//! - `PUT    /api/study-guides/{id}`       → 메타데이터 수정 (PDF는 바꿀 수 없음)
//! - `DELETE /api/study-guides/{id}`       → 삭제
//! - `GET    /api/study-guides/{id}/file`  → PDF 바이트 (`Content-Type: application/pdf`)
//!
//! 업로드 라우트는 기본 본문 크기 제한을 끄고, `services::pdf::read_upload`가
//! 필드별로 바이트를 세면서 제한합니다 (`routes::router` 참고).

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::PathRejection, Multipart, Path, State,
    },
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use super::{deleted, ensure_topic};
use crate::{
    db::study_guides as db_guides,
    error::AppError,
    middleware::auth::AuthUser,
    models::{normalize_ref, MigrationReport, StudyGuide, UpdateStudyGuideRequest},
    services::pdf::{self, UploadError},
    state::AppState,
    validation::{Validate, ValidJson},
};

pub async fn list_study_guides(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<StudyGuide>>, AppError> {
    let guides = db_guides::list_study_guides(&state.pool, &auth.user_id).await?;
    Ok(Json(guides))
}

pub async fn get_study_guide(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<StudyGuide>, AppError> {
    let Path(id) = path?;
    db_guides::find_study_guide(&state.pool, &auth.user_id, &id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Study guide"))
}

/// PDF 업로드
///
/// 응답은 압축이 끝나고 레코드가 저장된 뒤에 보냅니다.
pub async fn upload_study_guide(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<StudyGuide>), AppError> {
    let multipart = multipart.map_err(|e| UploadError::Malformed(e.body_text()))?;

    let upload = pdf::read_upload(multipart, state.max_upload_bytes).await?;
    let (new_guide, bytes) = upload.into_parts()?;
    ensure_topic(&state, &auth.user_id, new_guide.topic_id.as_deref()).await?;

    let compressed = pdf::compress_blocking(bytes).await?;
    tracing::info!(
        original_size = compressed.original_size,
        compressed_size = compressed.compressed_size,
        "Compressed PDF upload ({:.2}% smaller)",
        compressed.ratio()
    );

    let guide = db_guides::create_study_guide(&state.pool, &auth.user_id, &new_guide, &compressed)
        .await
        .map_err(|e| UploadError::Failed(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(guide)))
}

pub async fn update_study_guide(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
    ValidJson(mut req): ValidJson<UpdateStudyGuideRequest>,
) -> Result<Json<StudyGuide>, AppError> {
    let Path(id) = path?;
    let mut guide = db_guides::find_study_guide(&state.pool, &auth.user_id, &id)
        .await?
        .ok_or(AppError::NotFound("Study guide"))?;

    if let Some(topic_id) = req.topic_id.take() {
        let topic_id = normalize_ref(topic_id);
        ensure_topic(&state, &auth.user_id, topic_id.as_deref()).await?;
        req.topic_id = Some(topic_id);
    }

    guide.apply(req);
    guide.validate()?;

    let guide = db_guides::update_study_guide(&state.pool, &guide).await?;
    Ok(Json(guide))
}

pub async fn delete_study_guide(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = path?;
    if !db_guides::delete_study_guide(&state.pool, &auth.user_id, &id).await? {
        return Err(AppError::NotFound("Study guide"));
    }
    Ok(deleted("Study guide"))
}

/// 저장된 PDF를 복원해 그대로 돌려줍니다.
pub async fn get_study_guide_file(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = path?;
    let guide = db_guides::find_study_guide(&state.pool, &auth.user_id, &id)
        .await?
        .ok_or(AppError::NotFound("Study guide"))?;
    let payload = db_guides::fetch_payload(&state.pool, &auth.user_id, &id)
        .await?
        .ok_or(AppError::NotFound("Study guide"))?;

    let bytes = pdf::load_pdf(payload).await?;

    let disposition = HeaderValue::from_str(&pdf::content_disposition(&guide.file_name))
        .map_err(|e| AppError::Internal(format!("Invalid Content-Disposition: {}", e)))?;

    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static(pdf::PDF_MIME)),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

pub async fn migrate_study_guides(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MigrationReport>, AppError> {
    let report = pdf::migrate_legacy(&state.pool, &auth.user_id).await?;
    Ok(Json(report))
}
