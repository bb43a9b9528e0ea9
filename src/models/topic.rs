//! # 토픽 모델 정의
//!
//! 토픽(Topic)은 사용자가 정의하는 학습 분류입니다.
//! 학습 가이드, 영상, 일정, 노트가 선택적으로 토픽을 참조하며,
//! 참조가 없으면 프론트엔드에서 "General"로 표시됩니다.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{hex_color, not_blank};

/// 색상을 지정하지 않았을 때의 기본값 (파란색)
pub const DEFAULT_TOPIC_COLOR: &str = "#3B82F6";

/// 토픽 엔티티: DB의 `topics` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    /// 소유자 id. 항상 토큰에서 가져오며 요청 본문을 신뢰하지 않습니다.
    pub user_id: String,
    pub name: String,
    pub description: String,
    /// `#RRGGBB` 형식의 표시 색상
    pub color: String,
    pub created_at: String,
    pub updated_at: String,
}

/// 토픽 생성 요청: `POST /api/topics`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateTopicRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    /// 없으면 빈 문자열
    pub description: Option<String>,
    /// 없으면 `DEFAULT_TOPIC_COLOR`
    #[validate(custom(function = "hex_color"))]
    pub color: Option<String>,
}

/// 토픽 수정 요청: `PUT /api/topics/:id`
///
/// 모든 필드가 Option입니다. 보낸 필드만 기존 값 위에 덮어씁니다(shallow merge).
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTopicRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "hex_color"))]
    pub color: Option<String>,
}

impl Topic {
    /// 수정 요청을 현재 값 위에 병합합니다.
    pub fn apply(&mut self, patch: UpdateTopicRequest) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic() -> Topic {
        Topic {
            id: "t1".into(),
            user_id: "u1".into(),
            name: "Cardiology".into(),
            description: String::new(),
            color: DEFAULT_TOPIC_COLOR.into(),
            created_at: "2026-01-01T00:00:00.000Z".into(),
            updated_at: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    #[test]
    fn renamed_topics_are_trimmed_like_new_ones() {
        let mut t = topic();
        t.apply(UpdateTopicRequest {
            name: Some("  Renal  ".into()),
            ..Default::default()
        });
        assert_eq!(t.name, "Renal");
    }

    #[test]
    fn blank_names_and_bad_colors_are_rejected() {
        let patch = UpdateTopicRequest {
            name: Some("   ".into()),
            color: Some("blue".into()),
            ..Default::default()
        };
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("color"));

        let create = CreateTopicRequest {
            name: "Renal".into(),
            description: None,
            color: None,
        };
        assert!(create.validate().is_ok());
    }
}
