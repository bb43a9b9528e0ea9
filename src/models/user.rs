//! # 사용자 모델 정의
//!
//! 계정 엔티티와 가입/로그인 요청, 그리고 비밀번호 해시가 빠진 응답 표현입니다.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{email_address, not_blank};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// API로 노출되는 사용자 표현. 비밀번호 해시 필드 자체가 없습니다.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(custom(function = "email_address"))]
    pub email: String,
    /// 최소 6자 (바이트가 아닌 문자 수)
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(custom(function = "email_address"))]
    pub email: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// 이메일은 앞뒤 공백을 제거하고 소문자로 저장/조회합니다.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
