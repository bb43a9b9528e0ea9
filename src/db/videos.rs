use crate::error::AppError;
use crate::models::{CreateVideoRequest, Video};
use sqlx::SqlitePool;

pub async fn list_videos(
    pool: &SqlitePool,
    user_id: &str,
    topic_id: Option<&str>,
) -> Result<Vec<Video>, AppError> {
    let videos = sqlx::query_as::<_, Video>(
        r#"
        SELECT id, user_id, topic_id, title, description, url, platform,
               duration_seconds, thumbnail_url, created_at, updated_at
        FROM videos
        WHERE user_id = ? AND (? IS NULL OR topic_id = ?)
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .bind(topic_id)
    .bind(topic_id)
    .fetch_all(pool)
    .await?;

    Ok(videos)
}

pub async fn find_video(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<Video>, AppError> {
    let video = sqlx::query_as::<_, Video>(
        r#"
        SELECT id, user_id, topic_id, title, description, url, platform,
               duration_seconds, thumbnail_url, created_at, updated_at
        FROM videos
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(video)
}

/// 검증을 마친 생성 요청을 저장합니다. `topic_id`는 정규화되어 있어야 합니다.
pub async fn create_video(
    pool: &SqlitePool,
    user_id: &str,
    req: &CreateVideoRequest,
) -> Result<Video, AppError> {
    let id = super::new_id();

    sqlx::query(
        r#"
        INSERT INTO videos (id, user_id, topic_id, title, description, url, platform,
                            duration_seconds, thumbnail_url)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(&req.topic_id)
    .bind(req.title.trim())
    .bind(&req.description)
    .bind(&req.url)
    .bind(&req.platform)
    .bind(req.duration_seconds)
    .bind(&req.thumbnail_url)
    .execute(pool)
    .await?;

    find_video(pool, user_id, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created video".to_string()))
}

pub async fn update_video(pool: &SqlitePool, video: &Video) -> Result<Video, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE videos
        SET topic_id = ?, title = ?, description = ?, url = ?, platform = ?,
            duration_seconds = ?, thumbnail_url = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&video.topic_id)
    .bind(&video.title)
    .bind(&video.description)
    .bind(&video.url)
    .bind(&video.platform)
    .bind(video.duration_seconds)
    .bind(&video.thumbnail_url)
    .bind(&video.id)
    .bind(&video.user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Video"));
    }

    find_video(pool, &video.user_id, &video.id)
        .await?
        .ok_or(AppError::NotFound("Video"))
}

pub async fn delete_video(pool: &SqlitePool, user_id: &str, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM videos WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
