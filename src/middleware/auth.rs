//! # 토큰 발급과 접근 게이트
//!
//! 로그인에 성공하면 `{userId, email, name}`을 담은 서명 토큰(HS256)을 발급합니다.
//! 토큰은 고정된 시간 뒤 만료되며 갱신(refresh)은 없습니다.
//!
//! 보호된 핸들러는 인자에 `AuthUser`를 받기만 하면 됩니다.
//! - `Authorization` 헤더나 토큰이 없음 → 401 "Access token required"
//! - 토큰이 잘못됐거나 만료됨 → 403 "Invalid or expired token"
//!
//! 검증 실패의 구체적인 이유는 응답에 드러내지 않습니다.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// 검증된 요청자. 소유권은 항상 여기서 가져옵니다.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = bearer_token(auth_header)?;
        let claims = verify_token(token, &state.jwt_secret)?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
        })
    }
}

/// `Bearer <token>`에서 토큰을 꺼냅니다. 토큰 부분이 비어 있으면 없는 것으로 봅니다.
fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().map(str::trim).unwrap_or_default();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidToken);
    }
    Ok(token)
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Access token required",
            ),
            AuthError::InvalidToken => (
                StatusCode::FORBIDDEN,
                "invalid_token",
                "Invalid or expired token",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// 토큰 발급 실패
#[derive(Debug, Error)]
pub enum TokenError {
    /// 만료 시각을 계산할 수 없는 유효 시간
    #[error("token lifetime of {0} hours is out of range")]
    LifetimeOutOfRange(i64),

    #[error(transparent)]
    Encode(#[from] jsonwebtoken::errors::Error),
}

pub fn create_token(user: &User, secret: &str, ttl_hours: i64) -> Result<String, TokenError> {
    let now = Utc::now();
    let expires_at = Duration::try_hours(ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or(TokenError::LifetimeOutOfRange(ttl_hours))?;

    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// 서명과 만료를 확인합니다. 실패 이유는 구별하지 않습니다.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("Token rejected: {}", e);
        AuthError::InvalidToken
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".into(),
            email: "a@x.com".into(),
            password_hash: String::new(),
            name: "A".into(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn token_carries_identity() {
        let token = create_token(&user(), "secret", 1).unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.name, "A");
    }

    #[test]
    fn wrong_secret_and_expired_tokens_are_rejected_alike() {
        let token = create_token(&user(), "secret", 1).unwrap();
        assert!(matches!(verify_token(&token, "other"), Err(AuthError::InvalidToken)));

        // 기본 leeway(60초)를 넘도록 두 시간 전에 만료된 토큰
        let expired = create_token(&user(), "secret", -2).unwrap();
        assert!(matches!(verify_token(&expired, "secret"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn unrepresentable_lifetimes_fail_instead_of_panicking() {
        for ttl in [10_000_000_000, i64::MAX, i64::MIN] {
            assert!(matches!(
                create_token(&user(), "s", ttl),
                Err(TokenError::LifetimeOutOfRange(t)) if t == ttl
            ));
        }
        assert!(create_token(&user(), "s", 87_600).is_ok());
    }

    #[test]
    fn header_parsing() {
        assert_eq!(bearer_token("Bearer abc").unwrap(), "abc");
        assert!(matches!(bearer_token("Bearer "), Err(AuthError::MissingToken)));
        assert!(matches!(bearer_token("Basic abc"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn rejections_use_distinct_statuses() {
        assert_eq!(AuthError::MissingToken.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidToken.into_response().status(), StatusCode::FORBIDDEN);
    }
}
