//! # 학습 진행도 쿼리
//!
//! 사용자당 한 행만 존재합니다 (`user_id UNIQUE`).

use crate::error::AppError;
use crate::models::StudyProgress;
use sqlx::SqlitePool;

/// 진행도를 조회합니다. 아직 없으면 0으로 채운 행을 만들어 반환합니다.
pub async fn get_or_create_progress(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<StudyProgress, AppError> {
    sqlx::query("INSERT OR IGNORE INTO study_progress (id, user_id) VALUES (?, ?)")
        .bind(super::new_id())
        .bind(user_id)
        .execute(pool)
        .await?;

    let progress = sqlx::query_as::<_, StudyProgress>(
        r#"
        SELECT id, user_id, total_topics, completed_topics, study_hours,
               videos_watched, bookmark_count, updated_at
        FROM study_progress
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(progress)
}

pub async fn save_progress(
    pool: &SqlitePool,
    progress: &StudyProgress,
) -> Result<StudyProgress, AppError> {
    sqlx::query(
        r#"
        UPDATE study_progress
        SET total_topics = ?, completed_topics = ?, study_hours = ?,
            videos_watched = ?, bookmark_count = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE user_id = ?
        "#,
    )
    .bind(progress.total_topics)
    .bind(progress.completed_topics)
    .bind(progress.study_hours)
    .bind(progress.videos_watched)
    .bind(progress.bookmark_count)
    .bind(&progress.user_id)
    .execute(pool)
    .await?;

    get_or_create_progress(pool, &progress.user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{memory_pool, users};
    use crate::models::UpdateStudyProgressRequest;

    #[tokio::test]
    async fn progress_is_created_lazily_once() {
        let pool = memory_pool().await.unwrap();
        let user = users::create_user(&pool, "a@x.com", "h", "A").await.unwrap();

        let first = get_or_create_progress(&pool, &user.id).await.unwrap();
        let second = get_or_create_progress(&pool, &user.id).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.bookmark_count, 0);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_counters() {
        let pool = memory_pool().await.unwrap();
        let user = users::create_user(&pool, "a@x.com", "h", "A").await.unwrap();

        let mut progress = get_or_create_progress(&pool, &user.id).await.unwrap();
        progress.apply(UpdateStudyProgressRequest {
            study_hours: Some(12),
            ..Default::default()
        });
        save_progress(&pool, &progress).await.unwrap();

        let mut progress = get_or_create_progress(&pool, &user.id).await.unwrap();
        progress.apply(UpdateStudyProgressRequest {
            videos_watched: Some(3),
            ..Default::default()
        });
        let saved = save_progress(&pool, &progress).await.unwrap();
        assert_eq!(saved.study_hours, 12);
        assert_eq!(saved.videos_watched, 3);
    }
}
