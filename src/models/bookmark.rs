//! # 북마크 모델 정의
//!
//! 북마크는 PDF, 영상, 노트 중 하나를 `(종류, id)` 쌍으로 가리키는 저장된 포인터입니다.
//! 대상의 존재 여부(참조 무결성)는 검사하지 않지만, 종류는 타입으로 표현되어
//! 알 수 없는 종류나 종류와 맞지 않는 위치 정보는 생성 시점에 거부됩니다.
//!
//! | 종류 | 위치 정보 |
//! |------|-----------|
//! | pdf | `pageNumber` |
//! | video | `timestampLabel` (예: "12:34") |
//! | note | 없음 |

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::double_option;
use crate::validation::{not_blank, rule_violation};

/// 북마크가 가리킬 수 있는 리소스 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ResourceKind {
    Pdf,
    Video,
    Note,
}

/// 종류가 붙은 리소스 참조
///
/// 북마크의 대상은 항상 이 타입을 거쳐 만들어지고, 위치 정보 검사도 여기서 합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: String,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, id: &str) -> Self {
        Self {
            kind,
            id: id.trim().to_string(),
        }
    }

    /// 위치 정보가 이 종류의 리소스에 맞는지 검사합니다.
    pub fn check_position(
        &self,
        page_number: Option<i64>,
        timestamp_label: Option<&str>,
    ) -> Result<(), ValidationError> {
        if page_number.is_some() && self.kind != ResourceKind::Pdf {
            return Err(rule_violation("pageNumber", "only pdf bookmarks have a page number"));
        }
        if timestamp_label.is_some() && self.kind != ResourceKind::Video {
            return Err(rule_violation("timestampLabel", "only video bookmarks have a timestamp"));
        }
        if page_number.is_some_and(|page| page < 1) {
            return Err(rule_violation("pageNumber", "must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_stored_position"))]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    pub resource_type: ResourceKind,
    pub resource_id: String,
    pub title: String,
    pub description: Option<String>,
    pub page_number: Option<i64>,
    pub timestamp_label: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// 병합된 결과의 위치 정보가 종류와 맞는지 검사합니다.
/// (예: pdf 북마크를 video로 바꾸면서 pageNumber를 그대로 두면 거부)
fn check_stored_position(bookmark: &Bookmark) -> Result<(), ValidationError> {
    bookmark
        .target()
        .check_position(bookmark.page_number, bookmark.timestamp_label.as_deref())
}

impl Bookmark {
    pub fn target(&self) -> ResourceRef {
        ResourceRef {
            kind: self.resource_type,
            id: self.resource_id.clone(),
        }
    }

    fn retarget(&mut self, target: ResourceRef) {
        self.resource_type = target.kind;
        self.resource_id = target.id;
    }

    pub fn apply(&mut self, patch: UpdateBookmarkRequest) {
        if patch.resource_type.is_some() || patch.resource_id.is_some() {
            let current = self.target();
            let kind = patch.resource_type.unwrap_or(current.kind);
            let id = patch.resource_id.as_deref().unwrap_or(&current.id);
            self.retarget(ResourceRef::new(kind, id));
        }
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(page_number) = patch.page_number {
            self.page_number = page_number;
        }
        if let Some(timestamp_label) = patch.timestamp_label {
            self.timestamp_label = timestamp_label;
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "check_requested_position"))]
pub struct CreateBookmarkRequest {
    pub resource_type: ResourceKind,
    #[validate(custom(function = "not_blank"))]
    pub resource_id: String,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    pub description: Option<String>,
    pub page_number: Option<i64>,
    pub timestamp_label: Option<String>,
}

fn check_requested_position(req: &CreateBookmarkRequest) -> Result<(), ValidationError> {
    req.target()
        .check_position(req.page_number, req.timestamp_label.as_deref())
}

impl CreateBookmarkRequest {
    pub fn target(&self) -> ResourceRef {
        ResourceRef::new(self.resource_type, &self.resource_id)
    }
}

/// 검증을 통과한 생성 요청. 대상은 `ResourceRef`로 묶여 있습니다.
#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub target: ResourceRef,
    pub title: String,
    pub description: Option<String>,
    pub page_number: Option<i64>,
    pub timestamp_label: Option<String>,
}

impl From<CreateBookmarkRequest> for NewBookmark {
    fn from(req: CreateBookmarkRequest) -> Self {
        Self {
            target: req.target(),
            title: req.title.trim().to_string(),
            description: req.description,
            page_number: req.page_number,
            timestamp_label: req.timestamp_label,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateBookmarkRequest {
    pub resource_type: Option<ResourceKind>,
    #[validate(custom(function = "not_blank"))]
    pub resource_id: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub page_number: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub timestamp_label: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{field_errors, FieldError};

    fn pdf_bookmark() -> Bookmark {
        Bookmark {
            id: "b1".into(),
            user_id: "u1".into(),
            resource_type: ResourceKind::Pdf,
            resource_id: "g1".into(),
            title: "Chapter 2".into(),
            description: None,
            page_number: Some(12),
            timestamp_label: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn unknown_kind_fails_at_construction() {
        let result = serde_json::from_value::<CreateBookmarkRequest>(serde_json::json!({
            "resourceType": "podcast",
            "resourceId": "x",
            "title": "t"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn position_must_match_kind() {
        let req: CreateBookmarkRequest = serde_json::from_value(serde_json::json!({
            "resourceType": "video",
            "resourceId": "v1",
            "title": "Murmur at 3:10",
            "pageNumber": 3,
            "timestampLabel": "3:10"
        }))
        .unwrap();
        let errors = field_errors(&req.validate().unwrap_err());
        let fields: Vec<_> = errors.into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["pageNumber"]);
    }

    #[test]
    fn pages_start_at_one() {
        let target = ResourceRef::new(ResourceKind::Pdf, "g1");
        assert!(target.check_position(Some(1), None).is_ok());
        assert!(target.check_position(Some(0), None).is_err());
        assert!(target.check_position(None, Some("1:00")).is_err());
    }

    #[test]
    fn new_bookmarks_are_built_from_a_trimmed_target() {
        let req: CreateBookmarkRequest = serde_json::from_value(serde_json::json!({
            "resourceType": "note",
            "resourceId": " n1 ",
            "title": " Loop diuretics "
        }))
        .unwrap();
        let new = NewBookmark::from(req);
        assert_eq!(new.target, ResourceRef { kind: ResourceKind::Note, id: "n1".into() });
        assert_eq!(new.title, "Loop diuretics");
    }

    #[test]
    fn merged_bookmark_is_rechecked_against_its_new_kind() {
        let mut bookmark = pdf_bookmark();
        assert_eq!(
            bookmark.target(),
            ResourceRef { kind: ResourceKind::Pdf, id: "g1".into() }
        );
        assert!(bookmark.validate().is_ok());

        bookmark.apply(UpdateBookmarkRequest {
            resource_type: Some(ResourceKind::Video),
            ..Default::default()
        });
        assert_eq!(bookmark.resource_id, "g1");
        assert_eq!(
            field_errors(&bookmark.validate().unwrap_err()),
            vec![FieldError::new("pageNumber", "only pdf bookmarks have a page number")]
        );
    }
}
