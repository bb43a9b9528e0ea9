//! # 영상 모델 정의
//!
//! 외부 강의 영상 링크와 그 생성/수정 요청입니다.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::double_option;
use crate::validation::{http_url, invalid, not_blank};

/// 영상 엔티티. 영상 자체를 호스팅하지 않고 외부 링크만 저장합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub user_id: String,
    pub topic_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    /// "youtube", "khan-academy", "osmosis" 등 자유 문자열
    pub platform: Option<String>,
    pub duration_seconds: Option<i64>,
    pub thumbnail_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateVideoRequest {
    pub topic_id: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(custom(function = "http_url"))]
    pub url: String,
    pub platform: Option<String>,
    #[validate(range(min = 0, message = "must be at least 0"))]
    pub duration_seconds: Option<i64>,
    #[validate(custom(function = "http_url"))]
    pub thumbnail_url: Option<String>,
}

/// `null`로 지울 수 있는 필드는 `Some(Some(_))`일 때만 `schema` 함수에서 검사합니다.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "check_clearable_fields", skip_on_field_errors = false))]
pub struct UpdateVideoRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub topic_id: Option<Option<String>>,
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[validate(custom(function = "http_url"))]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub platform: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub duration_seconds: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub thumbnail_url: Option<Option<String>>,
}

fn check_clearable_fields(req: &UpdateVideoRequest) -> Result<(), ValidationError> {
    if let Some(Some(thumbnail)) = &req.thumbnail_url {
        http_url(thumbnail).map_err(|err| on_field(err, "thumbnailUrl"))?;
    }
    if matches!(req.duration_seconds, Some(Some(d)) if d < 0) {
        return Err(on_field(invalid("range", "must be at least 0"), "durationSeconds"));
    }
    Ok(())
}

fn on_field(mut err: ValidationError, field: &'static str) -> ValidationError {
    err.add_param(std::borrow::Cow::Borrowed("field"), &field);
    err
}

impl Video {
    pub fn apply(&mut self, patch: UpdateVideoRequest) {
        if let Some(topic_id) = patch.topic_id {
            self.topic_id = topic_id;
        }
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(platform) = patch.platform {
            self.platform = platform;
        }
        if let Some(duration_seconds) = patch.duration_seconds {
            self.duration_seconds = duration_seconds;
        }
        if let Some(thumbnail_url) = patch.thumbnail_url {
            self.thumbnail_url = thumbnail_url;
        }
    }
}

/// `GET /api/videos?topicId=...`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFilter {
    pub topic_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_fields_are_checked() {
        let req: CreateVideoRequest = serde_json::from_value(serde_json::json!({
            "title": "Heart sounds",
            "url": "youtube.com/watch",
            "thumbnailUrl": "https://img.youtube.com/vi/x/0.jpg",
            "durationSeconds": -1
        }))
        .unwrap();
        let errors = crate::validation::field_errors(&req.validate().unwrap_err());
        let fields: Vec<_> = errors.into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["durationSeconds", "url"]);
    }

    #[test]
    fn cleared_fields_skip_checks_but_set_ones_do_not() {
        let cleared: UpdateVideoRequest = serde_json::from_value(serde_json::json!({
            "thumbnailUrl": null,
            "durationSeconds": null
        }))
        .unwrap();
        assert!(cleared.validate().is_ok());

        let bad: UpdateVideoRequest = serde_json::from_value(serde_json::json!({
            "thumbnailUrl": "not a url",
            "title": "  Murmurs "
        }))
        .unwrap();
        let errors = crate::validation::field_errors(&bad.validate().unwrap_err());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "thumbnailUrl");
    }

    #[test]
    fn client_supplied_user_id_is_rejected() {
        let result = serde_json::from_value::<CreateVideoRequest>(serde_json::json!({
            "title": "t",
            "url": "https://example.com",
            "userId": "someone-else"
        }));
        assert!(result.is_err());
    }
}
