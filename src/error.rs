//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 응답 본문 형식은 항상 같습니다:
//! `{ "error": { "code": "...", "message": "...", "details": [...]? } }`

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::pdf::UploadError;
use crate::validation::{field_errors, FieldError};

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    ///
    /// 다른 사용자의 리소스도 "없음"으로 응답합니다.
    /// 403을 쓰면 해당 id의 존재 여부가 새어 나가기 때문입니다.
    /// 필드는 엔티티 이름입니다 (예: "Topic" → "Topic not found").
    #[error("{0} not found")]
    NotFound(&'static str),

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 스키마 검증 실패 (HTTP 400). 필드별 에러 목록을 함께 반환합니다.
    #[error("Invalid request data")]
    Validation(Vec<FieldError>),

    /// 인증 실패 (HTTP 401): 로그인 시 이메일/비밀번호 불일치
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 리소스 충돌 (HTTP 409): 이미 등록된 이메일
    #[error("Conflict: {0}")]
    Conflict(String),

    /// PDF 업로드/조회 파이프라인 에러 (상태 코드는 종류별로 다름)
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 파일 입출력 오류 (HTTP 500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// 필드 하나짜리 검증 에러를 만드는 편의 함수
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(field_errors(&errors))
    }
}

/// 쿼리 문자열 파싱 실패도 JSON 에러 봉투로 응답합니다.
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::field("query", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::field("path", rejection.body_text())
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, IO, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let mut details = None;

        let (status, code, message) = match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Validation(ref errors) => {
                details = Some(errors.clone());
                (
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    "Invalid request data".to_string(),
                )
            }
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Upload(ref e) => {
                let status = e.status();
                if status.is_server_error() {
                    tracing::error!("Upload pipeline error: {:?}", e);
                }
                (status, e.code(), e.public_message().to_string())
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "An IO error occurred".to_string(),
                )
            }
        };

        let body = match details {
            Some(details) => json!({
                "error": { "code": code, "message": message, "details": details }
            }),
            None => json!({
                "error": { "code": code, "message": message }
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(AppError::NotFound("Topic").to_string(), "Topic not found");
    }

    #[test]
    fn internal_errors_map_to_500() {
        let response = AppError::Internal("secret detail".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_errors_map_to_400() {
        let response = AppError::field("name", "is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validator_errors_become_field_details() {
        let mut errors = validator::ValidationErrors::new();
        errors.add(
            "duration_seconds",
            crate::validation::invalid("range", "must be zero or positive"),
        );
        match AppError::from(errors) {
            AppError::Validation(details) => {
                assert_eq!(details, vec![FieldError::new("durationSeconds", "must be zero or positive")]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn upload_status_comes_from_the_upload_error() {
        let too_large = AppError::from(UploadError::TooLarge).into_response();
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let not_pdf = AppError::from(UploadError::NotPdf).into_response();
        assert_eq!(not_pdf.status(), StatusCode::BAD_REQUEST);
    }
}
