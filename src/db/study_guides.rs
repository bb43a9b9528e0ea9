//! # 학습 가이드 쿼리
//!
//! 메타데이터 조회는 페이로드 컬럼(`compressed_data`, `checksum`, `file_path`)을
//! 읽지 않습니다. 페이로드는 `fetch_payload`와 `store_payload`를 통해서만 다룹니다.
//! 저장 방식을 바꿀 때는 이 두 함수와 `StoredPayload`만 손보면 됩니다.

use std::path::PathBuf;

use crate::error::AppError;
use crate::models::{NewStudyGuide, StudyGuide};
use crate::services::pdf::CompressedPdf;
use sqlx::SqlitePool;

/// 레코드에 저장된 PDF 페이로드의 형태
#[derive(Debug)]
pub enum StoredPayload {
    /// 레코드 안에 gzip으로 저장된 바이트. 체크섬은 레거시 이관 이전 데이터에는 없을 수 있습니다.
    Inline {
        data: Vec<u8>,
        checksum: Option<String>,
    },
    /// DB 저장 이전에 업로드된 레코드: 디스크 경로만 있습니다.
    LegacyFile(PathBuf),
    /// 둘 다 없음
    Missing,
}

#[derive(sqlx::FromRow)]
struct PayloadRow {
    compressed_data: Option<Vec<u8>>,
    checksum: Option<String>,
    file_path: Option<String>,
}

impl From<PayloadRow> for StoredPayload {
    fn from(row: PayloadRow) -> Self {
        match (row.compressed_data, row.file_path) {
            (Some(data), _) => StoredPayload::Inline {
                data,
                checksum: row.checksum,
            },
            (None, Some(path)) if !path.trim().is_empty() => StoredPayload::LegacyFile(path.into()),
            _ => StoredPayload::Missing,
        }
    }
}

pub async fn list_study_guides(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<StudyGuide>, AppError> {
    let guides = sqlx::query_as::<_, StudyGuide>(
        r#"
        SELECT id, user_id, topic_id, title, file_name, original_size, compressed_size,
               total_pages, current_page, uploaded_at, updated_at
        FROM study_guides
        WHERE user_id = ?
        ORDER BY uploaded_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(guides)
}

pub async fn find_study_guide(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<StudyGuide>, AppError> {
    let guide = sqlx::query_as::<_, StudyGuide>(
        r#"
        SELECT id, user_id, topic_id, title, file_name, original_size, compressed_size,
               total_pages, current_page, uploaded_at, updated_at
        FROM study_guides
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(guide)
}

/// 메타데이터와 압축된 페이로드를 한 행으로 저장합니다.
pub async fn create_study_guide(
    pool: &SqlitePool,
    user_id: &str,
    guide: &NewStudyGuide,
    payload: &CompressedPdf,
) -> Result<StudyGuide, AppError> {
    let id = super::new_id();

    sqlx::query(
        r#"
        INSERT INTO study_guides (id, user_id, topic_id, title, file_name, compressed_data,
                                  original_size, compressed_size, checksum, total_pages)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(&guide.topic_id)
    .bind(&guide.title)
    .bind(&guide.file_name)
    .bind(&payload.data)
    .bind(payload.original_size)
    .bind(payload.compressed_size)
    .bind(&payload.checksum)
    .bind(guide.total_pages)
    .execute(pool)
    .await?;

    find_study_guide(pool, user_id, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created study guide".to_string()))
}

/// 메타데이터만 갱신합니다. 페이로드 컬럼은 건드리지 않습니다.
pub async fn update_study_guide(
    pool: &SqlitePool,
    guide: &StudyGuide,
) -> Result<StudyGuide, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE study_guides
        SET topic_id = ?, title = ?, total_pages = ?, current_page = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&guide.topic_id)
    .bind(&guide.title)
    .bind(guide.total_pages)
    .bind(guide.current_page)
    .bind(&guide.id)
    .bind(&guide.user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Study guide"));
    }

    find_study_guide(pool, &guide.user_id, &guide.id)
        .await?
        .ok_or(AppError::NotFound("Study guide"))
}

pub async fn delete_study_guide(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM study_guides WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 레코드의 페이로드를 읽습니다. 레코드가 없으면 None.
pub async fn fetch_payload(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<StoredPayload>, AppError> {
    let row = sqlx::query_as::<_, PayloadRow>(
        r#"
        SELECT compressed_data, checksum, file_path
        FROM study_guides
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(StoredPayload::from))
}

/// 인라인 페이로드를 저장하고 레거시 경로를 지웁니다.
pub async fn store_payload(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
    payload: &CompressedPdf,
) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE study_guides
        SET compressed_data = ?, original_size = ?, compressed_size = ?, checksum = ?,
            file_path = NULL, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&payload.data)
    .bind(payload.original_size)
    .bind(payload.compressed_size)
    .bind(&payload.checksum)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Study guide"));
    }
    Ok(())
}

/// 파일 경로만 있고 인라인 페이로드가 없는 레코드의 `(id, 경로)` 목록
pub async fn list_legacy_files(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<(String, PathBuf)>, AppError> {
    let rows = sqlx::query_as::<_, (String, String)>(
        r#"
        SELECT id, file_path
        FROM study_guides
        WHERE user_id = ? AND compressed_data IS NULL
          AND file_path IS NOT NULL AND file_path != ''
        ORDER BY uploaded_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(id, path)| (id, PathBuf::from(path))).collect())
}
