use crate::error::AppError;
use crate::models::user::User;
use sqlx::SqlitePool;

/// 새 사용자를 저장합니다. 이메일은 호출 전에 정규화되어 있어야 합니다.
///
/// 이메일 UNIQUE 제약 위반은 `Conflict`로 바꿉니다.
/// (중복 확인과 삽입 사이에 다른 요청이 끼어든 경우)
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    name: &str,
) -> Result<User, AppError> {
    let id = super::new_id();

    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, name)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .execute(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::Conflict("User with this email already exists".to_string())
        }
        other => AppError::Database(other),
    })?;

    find_by_id(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created user".to_string()))
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, name, created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, name, created_at, updated_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let pool = memory_pool().await.unwrap();
        create_user(&pool, "a@x.com", "hash", "A").await.unwrap();

        let err = create_user(&pool, "a@x.com", "hash", "B").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn lookup_by_email_and_id() {
        let pool = memory_pool().await.unwrap();
        let user = create_user(&pool, "a@x.com", "hash", "A").await.unwrap();

        let by_email = find_by_email(&pool, "a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert!(find_by_id(&pool, "missing").await.unwrap().is_none());
        assert!(user.created_at.ends_with('Z'));
    }
}
