//! # 계정 서비스
//!
//! 비밀번호는 Argon2id(무작위 솔트)로 해싱합니다.
//! 해싱과 검증은 CPU를 오래 쓰므로 blocking 스레드에서 실행합니다.
//!
//! 로그인 실패는 에러가 아니라 `None`입니다. 호출하는 쪽은 "없는 이메일"과
//! "틀린 비밀번호"를 구별하지 않고 똑같이 401로 응답합니다.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;
use sqlx::SqlitePool;

use crate::db::users as db_users;
use crate::error::AppError;
use crate::models::user::{normalize_email, LoginRequest, RegisterRequest, User};

pub async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
}

/// 저장된 해시와 비교합니다. 해시 형식이 깨져 있으면 내부 에러입니다.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&password_hash)
            .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
}

/// 새 사용자를 만듭니다. 이미 등록된 이메일이면 `Conflict`.
pub async fn register(pool: &SqlitePool, req: RegisterRequest) -> Result<User, AppError> {
    let email = normalize_email(&req.email);

    if db_users::find_by_email(pool, &email).await?.is_some() {
        return Err(AppError::Conflict("User with this email already exists".to_string()));
    }

    let password_hash = hash_password(req.password).await?;
    let user = db_users::create_user(pool, &email, &password_hash, req.name.trim()).await?;

    tracing::info!("Registered user {}", user.id);
    Ok(user)
}

/// 자격 증명이 맞으면 사용자를, 아니면 None을 반환합니다.
pub async fn authenticate(pool: &SqlitePool, req: LoginRequest) -> Result<Option<User>, AppError> {
    let Some(user) = db_users::find_by_email(pool, &normalize_email(&req.email)).await? else {
        return Ok(None);
    };

    if verify_password(req.password, user.password_hash.clone()).await? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;

    fn registration(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: "secret1".into(),
            name: "A".into(),
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn stored_hash_is_not_the_password() {
        let pool = memory_pool().await.unwrap();
        let user = register(&pool, registration("a@x.com")).await.unwrap();
        assert_ne!(user.password_hash, "secret1");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn email_is_case_insensitive() {
        let pool = memory_pool().await.unwrap();
        register(&pool, registration(" A@X.com")).await.unwrap();

        let err = register(&pool, registration("a@x.COM")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let user = authenticate(&pool, login("A@x.com", "secret1")).await.unwrap();
        assert_eq!(user.unwrap().email, "a@x.com");
    }

    #[tokio::test]
    async fn bad_credentials_are_not_errors() {
        let pool = memory_pool().await.unwrap();
        register(&pool, registration("a@x.com")).await.unwrap();

        assert!(authenticate(&pool, login("a@x.com", "wrong!")).await.unwrap().is_none());
        assert!(authenticate(&pool, login("nobody@x.com", "secret1")).await.unwrap().is_none());
    }
}
