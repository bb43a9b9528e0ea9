//! # 입력 검증(Validation) 계층
//!
//! 모든 변경 요청(POST/PUT)은 저장소에 닿기 전에 여기서 검증됩니다.
//!
//! - 컴파일 타임: 요청 본문은 엔드포인트별 구조체로 역직렬화됩니다.
//!   (`deny_unknown_fields`로 모르는 필드, 누락된 필수 필드를 거부)
//! - 런타임: 각 구조체가 `validator::Validate`를 derive해서 값의 형식과 범위를 검사합니다.
//!   여러 필드에 걸친 규칙(일정 구간, 북마크 위치 등)은 `schema` 함수로 표현합니다.
//!
//! 검증 실패는 항상 필드별 에러 목록과 함께 400으로 응답합니다. 500이 되지 않습니다.

use std::borrow::Cow;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::Uri,
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Serialize};
use validator::{ValidateEmail, ValidateUrl, ValidationError, ValidationErrors};

pub use validator::Validate;

use crate::error::AppError;

/// 필드 하나에 대한 검증 에러
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// 문제가 된 필드 이름 (JSON 키 이름, 예: "startTime")
    pub field: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// 메시지가 붙은 검증 에러
pub fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// `schema` 함수용: 어느 필드의 문제인지 `field` 파라미터로 기록합니다.
pub fn rule_violation(field: &'static str, message: &'static str) -> ValidationError {
    let mut err = invalid("rule", message);
    err.add_param(Cow::Borrowed("field"), &field);
    err
}

/// `ValidationErrors`를 응답용 `{field, message}` 목록으로 펼칩니다.
///
/// 필드 이름은 JSON 키(camelCase)로 바꾸고, 순서는 필드 이름순으로 고정합니다.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, list)| {
            let field = field.to_string();
            list.iter()
                .map(|err| {
                    let name = err
                        .params
                        .get("field")
                        .and_then(|v| v.as_str())
                        .map(str::to_string)
                        .unwrap_or_else(|| camel_case(&field));
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed {} check", err.code));
                    FieldError::new(&name, message)
                })
                .collect::<Vec<_>>()
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// 공백을 제외하고 비어 있지 않은 문자열
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(invalid("blank", "must not be empty"))
    } else {
        Ok(())
    }
}

/// 앞뒤 공백을 뺀 값이 이메일 형식이고, 도메인에 점이 있어야 합니다.
pub fn email_address(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let dotted_domain = value
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.') && !domain.ends_with('.'));
    if dotted_domain && value.validate_email() {
        Ok(())
    } else {
        Err(invalid("email", "must be a valid email address"))
    }
}

/// `#RGB` 또는 `#RRGGBB`
pub fn hex_color(value: &str) -> Result<(), ValidationError> {
    let ok = value
        .strip_prefix('#')
        .is_some_and(|hex| (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if ok {
        Ok(())
    } else {
        Err(invalid("color", "must be a hex color like #3B82F6"))
    }
}

/// 호스트를 가진 절대 http/https URL
pub fn http_url(value: &str) -> Result<(), ValidationError> {
    let http = value.parse::<Uri>().is_ok_and(|uri| {
        matches!(uri.scheme_str(), Some("http") | Some("https"))
            && uri.host().is_some_and(|host| !host.is_empty())
    });
    if http && value.validate_url() {
        Ok(())
    } else {
        Err(invalid("url", "must be an absolute http(s) URL"))
    }
}

/// RFC 3339 날짜/시간
pub fn datetime(value: &str) -> Result<(), ValidationError> {
    match parse_datetime(value) {
        Some(_) => Ok(()),
        None => Err(invalid("datetime", "must be an ISO-8601 datetime")),
    }
}

/// RFC 3339 문자열을 UTC 시각으로 파싱합니다.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 저장 형식: 밀리초 정밀도의 UTC 문자열 (예: "2026-03-01T09:00:00.000Z")
///
/// 모든 시각을 같은 형식으로 저장하면 문자열 비교가 곧 시간 비교가 됩니다.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 검증된 JSON 본문 추출기
///
/// `Json<T>`로 역직렬화한 뒤 `T::validate()`를 실행합니다.
/// 역직렬화 실패(문법 오류, 누락/미지 필드, 타입 불일치)도
/// 422가 아닌 400 검증 에러로 통일합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value.validate()?;
        Ok(ValidJson(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::BadRequest("Expected a JSON request body".to_string())
        }
        other => AppError::field("body", other.body_text()),
    }
}
