//! # 토픽 쿼리
//!
//! 토픽을 지우면 이를 참조하던 학습 가이드, 영상, 일정, 노트의 `topic_id`가
//! `ON DELETE SET NULL`로 비워집니다. 종속 레코드는 지워지지 않습니다.

use crate::error::AppError;
use crate::models::Topic;
use sqlx::SqlitePool;

pub async fn list_topics(pool: &SqlitePool, user_id: &str) -> Result<Vec<Topic>, AppError> {
    let topics = sqlx::query_as::<_, Topic>(
        r#"
        SELECT id, user_id, name, description, color, created_at, updated_at
        FROM topics
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(topics)
}

pub async fn find_topic(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<Topic>, AppError> {
    let topic = sqlx::query_as::<_, Topic>(
        r#"
        SELECT id, user_id, name, description, color, created_at, updated_at
        FROM topics
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(topic)
}

/// 토픽 id가 이 사용자의 것인지 확인합니다.
pub async fn topic_belongs_to(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<bool, AppError> {
    let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM topics WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(found.is_some())
}

pub async fn create_topic(
    pool: &SqlitePool,
    user_id: &str,
    name: &str,
    description: &str,
    color: &str,
) -> Result<Topic, AppError> {
    let id = super::new_id();

    sqlx::query(
        r#"
        INSERT INTO topics (id, user_id, name, description, color)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(name)
    .bind(description)
    .bind(color)
    .execute(pool)
    .await?;

    find_topic(pool, user_id, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created topic".to_string()))
}

/// 병합이 끝난 토픽을 그대로 저장합니다.
pub async fn update_topic(pool: &SqlitePool, topic: &Topic) -> Result<Topic, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE topics
        SET name = ?, description = ?, color = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&topic.name)
    .bind(&topic.description)
    .bind(&topic.color)
    .bind(&topic.id)
    .bind(&topic.user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Topic"));
    }

    find_topic(pool, &topic.user_id, &topic.id)
        .await?
        .ok_or(AppError::NotFound("Topic"))
}

/// 삭제된 행이 있으면 true
pub async fn delete_topic(pool: &SqlitePool, user_id: &str, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM topics WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{memory_pool, notes, users};

    #[tokio::test]
    async fn topics_are_scoped_to_their_owner() {
        let pool = memory_pool().await.unwrap();
        let alice = users::create_user(&pool, "a@x.com", "h", "A").await.unwrap();
        let bob = users::create_user(&pool, "b@x.com", "h", "B").await.unwrap();

        let topic = create_topic(&pool, &alice.id, "Neuro", "", "#112233").await.unwrap();

        assert!(find_topic(&pool, &bob.id, &topic.id).await.unwrap().is_none());
        assert!(!topic_belongs_to(&pool, &bob.id, &topic.id).await.unwrap());
        assert!(!delete_topic(&pool, &bob.id, &topic.id).await.unwrap());
        assert!(list_topics(&pool, &bob.id).await.unwrap().is_empty());
        assert_eq!(list_topics(&pool, &alice.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn newest_topic_is_listed_first() {
        let pool = memory_pool().await.unwrap();
        let user = users::create_user(&pool, "a@x.com", "h", "A").await.unwrap();
        create_topic(&pool, &user.id, "First", "", "#111111").await.unwrap();
        create_topic(&pool, &user.id, "Second", "", "#222222").await.unwrap();

        let names: Vec<_> = list_topics(&pool, &user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn deleting_a_topic_clears_references() {
        let pool = memory_pool().await.unwrap();
        let user = users::create_user(&pool, "a@x.com", "h", "A").await.unwrap();
        let topic = create_topic(&pool, &user.id, "Cardio", "", "#3B82F6").await.unwrap();
        let note = notes::create_note(&pool, &user.id, Some(&topic.id), "Murmurs", "S3, S4")
            .await
            .unwrap();

        assert!(delete_topic(&pool, &user.id, &topic.id).await.unwrap());
        assert!(!delete_topic(&pool, &user.id, &topic.id).await.unwrap());

        let note = notes::find_note(&pool, &user.id, &note.id).await.unwrap().unwrap();
        assert_eq!(note.topic_id, None);
    }
}
