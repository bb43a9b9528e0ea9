use crate::error::AppError;
use crate::models::Note;
use sqlx::SqlitePool;

/// `topic_id`가 주어지면 해당 토픽의 노트만 반환합니다.
pub async fn list_notes(
    pool: &SqlitePool,
    user_id: &str,
    topic_id: Option<&str>,
) -> Result<Vec<Note>, AppError> {
    let notes = sqlx::query_as::<_, Note>(
        r#"
        SELECT id, user_id, topic_id, title, content, created_at, updated_at
        FROM notes
        WHERE user_id = ? AND (? IS NULL OR topic_id = ?)
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .bind(topic_id)
    .bind(topic_id)
    .fetch_all(pool)
    .await?;

    Ok(notes)
}

pub async fn find_note(pool: &SqlitePool, user_id: &str, id: &str) -> Result<Option<Note>, AppError> {
    let note = sqlx::query_as::<_, Note>(
        r#"
        SELECT id, user_id, topic_id, title, content, created_at, updated_at
        FROM notes
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(note)
}

pub async fn create_note(
    pool: &SqlitePool,
    user_id: &str,
    topic_id: Option<&str>,
    title: &str,
    content: &str,
) -> Result<Note, AppError> {
    let id = super::new_id();

    sqlx::query(
        r#"
        INSERT INTO notes (id, user_id, topic_id, title, content)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(topic_id)
    .bind(title)
    .bind(content)
    .execute(pool)
    .await?;

    find_note(pool, user_id, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created note".to_string()))
}

pub async fn update_note(pool: &SqlitePool, note: &Note) -> Result<Note, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE notes
        SET topic_id = ?, title = ?, content = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&note.topic_id)
    .bind(&note.title)
    .bind(&note.content)
    .bind(&note.id)
    .bind(&note.user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Note"));
    }

    find_note(pool, &note.user_id, &note.id)
        .await?
        .ok_or(AppError::NotFound("Note"))
}

pub async fn delete_note(pool: &SqlitePool, user_id: &str, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM notes WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{memory_pool, topics, users};

    #[tokio::test]
    async fn topic_filter_narrows_the_list() {
        let pool = memory_pool().await.unwrap();
        let user = users::create_user(&pool, "a@x.com", "h", "A").await.unwrap();
        let topic = topics::create_topic(&pool, &user.id, "Renal", "", "#abc").await.unwrap();

        create_note(&pool, &user.id, Some(&topic.id), "GFR", "filtration").await.unwrap();
        create_note(&pool, &user.id, None, "Loose", "no topic").await.unwrap();

        assert_eq!(list_notes(&pool, &user.id, None).await.unwrap().len(), 2);
        let filtered = list_notes(&pool, &user.id, Some(&topic.id)).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "GFR");
    }

    #[tokio::test]
    async fn update_touches_only_the_owner_row() {
        let pool = memory_pool().await.unwrap();
        let alice = users::create_user(&pool, "a@x.com", "h", "A").await.unwrap();
        let bob = users::create_user(&pool, "b@x.com", "h", "B").await.unwrap();
        let mut note = create_note(&pool, &alice.id, None, "t", "c").await.unwrap();

        note.user_id = bob.id.clone();
        note.title = "hijacked".into();
        assert!(matches!(update_note(&pool, &note).await, Err(AppError::NotFound(_))));

        let stored = find_note(&pool, &alice.id, &note.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "t");
    }
}
