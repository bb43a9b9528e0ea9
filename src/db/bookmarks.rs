use crate::error::AppError;
use crate::models::{Bookmark, NewBookmark};
use sqlx::SqlitePool;

pub async fn list_bookmarks(pool: &SqlitePool, user_id: &str) -> Result<Vec<Bookmark>, AppError> {
    let bookmarks = sqlx::query_as::<_, Bookmark>(
        r#"
        SELECT id, user_id, resource_type, resource_id, title, description,
               page_number, timestamp_label, created_at, updated_at
        FROM bookmarks
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(bookmarks)
}

pub async fn find_bookmark(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<Bookmark>, AppError> {
    let bookmark = sqlx::query_as::<_, Bookmark>(
        r#"
        SELECT id, user_id, resource_type, resource_id, title, description,
               page_number, timestamp_label, created_at, updated_at
        FROM bookmarks
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(bookmark)
}

pub async fn create_bookmark(
    pool: &SqlitePool,
    user_id: &str,
    new: &NewBookmark,
) -> Result<Bookmark, AppError> {
    let id = super::new_id();

    sqlx::query(
        r#"
        INSERT INTO bookmarks (id, user_id, resource_type, resource_id, title, description,
                               page_number, timestamp_label)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(new.target.kind)
    .bind(&new.target.id)
    .bind(&new.title)
    .bind(&new.description)
    .bind(new.page_number)
    .bind(&new.timestamp_label)
    .execute(pool)
    .await?;

    find_bookmark(pool, user_id, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created bookmark".to_string()))
}

pub async fn update_bookmark(pool: &SqlitePool, bookmark: &Bookmark) -> Result<Bookmark, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE bookmarks
        SET resource_type = ?, resource_id = ?, title = ?, description = ?,
            page_number = ?, timestamp_label = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(bookmark.resource_type)
    .bind(&bookmark.resource_id)
    .bind(&bookmark.title)
    .bind(&bookmark.description)
    .bind(bookmark.page_number)
    .bind(&bookmark.timestamp_label)
    .bind(&bookmark.id)
    .bind(&bookmark.user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Bookmark"));
    }

    find_bookmark(pool, &bookmark.user_id, &bookmark.id)
        .await?
        .ok_or(AppError::NotFound("Bookmark"))
}

pub async fn delete_bookmark(pool: &SqlitePool, user_id: &str, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM bookmarks WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
