//! # 일정 쿼리
//!
//! 시각은 정규화된 UTC 문자열로 저장되므로 범위 조건과 정렬을
//! 문자열 비교로 처리합니다.

use crate::error::AppError;
use crate::models::{NewScheduleItem, ScheduleItem};
use sqlx::SqlitePool;

/// 시작 시각 오름차순. `day`가 주어지면 `[from, to)` 범위에서 시작하는 일정만 반환합니다.
pub async fn list_schedule(
    pool: &SqlitePool,
    user_id: &str,
    day: Option<(&str, &str)>,
) -> Result<Vec<ScheduleItem>, AppError> {
    let (from, to) = day.unzip();

    let items = sqlx::query_as::<_, ScheduleItem>(
        r#"
        SELECT id, user_id, topic_id, title, description, start_time, end_time,
               status, created_at, updated_at
        FROM schedule_items
        WHERE user_id = ?
          AND (? IS NULL OR start_time >= ?)
          AND (? IS NULL OR start_time < ?)
        ORDER BY start_time ASC, rowid ASC
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(from)
    .bind(to)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn find_schedule_item(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<ScheduleItem>, AppError> {
    let item = sqlx::query_as::<_, ScheduleItem>(
        r#"
        SELECT id, user_id, topic_id, title, description, start_time, end_time,
               status, created_at, updated_at
        FROM schedule_items
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

pub async fn create_schedule_item(
    pool: &SqlitePool,
    user_id: &str,
    item: &NewScheduleItem,
) -> Result<ScheduleItem, AppError> {
    let id = super::new_id();

    sqlx::query(
        r#"
        INSERT INTO schedule_items (id, user_id, topic_id, title, description,
                                    start_time, end_time, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(&item.topic_id)
    .bind(&item.title)
    .bind(&item.description)
    .bind(&item.start_time)
    .bind(&item.end_time)
    .bind(item.status)
    .execute(pool)
    .await?;

    find_schedule_item(pool, user_id, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created schedule item".to_string()))
}

pub async fn update_schedule_item(
    pool: &SqlitePool,
    item: &ScheduleItem,
) -> Result<ScheduleItem, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE schedule_items
        SET topic_id = ?, title = ?, description = ?, start_time = ?, end_time = ?,
            status = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&item.topic_id)
    .bind(&item.title)
    .bind(&item.description)
    .bind(&item.start_time)
    .bind(&item.end_time)
    .bind(item.status)
    .bind(&item.id)
    .bind(&item.user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Schedule item"));
    }

    find_schedule_item(pool, &item.user_id, &item.id)
        .await?
        .ok_or(AppError::NotFound("Schedule item"))
}

pub async fn delete_schedule_item(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM schedule_items WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
