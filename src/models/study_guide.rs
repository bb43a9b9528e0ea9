//! # 학습 가이드(StudyGuide) 모델 정의
//!
//! 학습 가이드는 업로드된 PDF 한 개와 그 페이지 진행 정보입니다.
//! PDF 바이트 자체는 이 구조체에 싣지 않습니다. 압축된 페이로드는
//! `db::study_guides::fetch_payload`로만 읽으며, API 응답에도 포함되지 않습니다.

use serde::{Deserialize, Serialize};

use validator::{Validate, ValidationError};

use super::double_option;
use crate::validation::{not_blank, rule_violation};

/// 학습 가이드 메타데이터: `study_guides` 테이블에서 페이로드 컬럼을 뺀 나머지
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_pages"))]
pub struct StudyGuide {
    pub id: String,
    pub user_id: String,
    pub topic_id: Option<String>,
    pub title: String,
    /// 업로드 당시의 원본 파일 이름 (Content-Disposition에 사용)
    pub file_name: String,
    /// 압축 전 크기(바이트). 레거시 레코드는 None
    pub original_size: Option<i64>,
    /// 압축 후 크기(바이트)
    pub compressed_size: Option<i64>,
    /// 클라이언트가 알려준 전체 페이지 수. 서버는 PDF를 해석하지 않습니다.
    pub total_pages: Option<i64>,
    pub current_page: i64,
    pub uploaded_at: String,
    pub updated_at: String,
}

/// 업로드 파이프라인이 검증을 마친 뒤 저장소에 넘기는 값
#[derive(Debug, Clone)]
pub struct NewStudyGuide {
    pub topic_id: Option<String>,
    pub title: String,
    pub file_name: String,
    pub total_pages: Option<i64>,
}

/// 학습 가이드 메타데이터 수정 요청: `PUT /api/study-guides/:id`
///
/// 페이로드(PDF)는 여기서 바꿀 수 없습니다.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "check_total_pages", skip_on_field_errors = false))]
pub struct UpdateStudyGuideRequest {
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub topic_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub total_pages: Option<Option<i64>>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub current_page: Option<i64>,
}

fn check_total_pages(req: &UpdateStudyGuideRequest) -> Result<(), ValidationError> {
    match req.total_pages {
        Some(Some(total)) if total < 1 => Err(rule_violation("totalPages", "must be at least 1")),
        _ => Ok(()),
    }
}

/// 병합 후 검사: 현재 페이지는 전체 페이지 수를 넘을 수 없습니다.
fn check_pages(guide: &StudyGuide) -> Result<(), ValidationError> {
    match guide.total_pages {
        Some(total) if guide.current_page > total => {
            Err(rule_violation("currentPage", "must not exceed totalPages"))
        }
        _ => Ok(()),
    }
}

impl StudyGuide {
    /// 수정 요청을 병합합니다. topicId는 호출 전에 정규화되어 있어야 합니다.
    pub fn apply(&mut self, patch: UpdateStudyGuideRequest) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(topic_id) = patch.topic_id {
            self.topic_id = topic_id;
        }
        if let Some(total_pages) = patch.total_pages {
            self.total_pages = total_pages;
        }
        if let Some(current_page) = patch.current_page {
            self.current_page = current_page;
        }
    }
}

/// `POST /api/study-guides/migrate` 응답
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub message: String,
    pub migrated_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guide() -> StudyGuide {
        StudyGuide {
            id: "g1".into(),
            user_id: "u1".into(),
            topic_id: Some("t1".into()),
            title: "Cardio".into(),
            file_name: "cardio.pdf".into(),
            original_size: Some(10),
            compressed_size: Some(8),
            total_pages: Some(10),
            current_page: 1,
            uploaded_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn patch_can_clear_topic_and_move_page() {
        let mut g = guide();
        let patch: UpdateStudyGuideRequest =
            serde_json::from_str(r#"{"topicId":null,"currentPage":4}"#).unwrap();
        g.apply(patch);
        assert_eq!(g.topic_id, None);
        assert_eq!(g.current_page, 4);
        assert_eq!(g.total_pages, Some(10));
    }

    #[test]
    fn current_page_beyond_total_is_rejected() {
        let mut g = guide();
        g.current_page = 11;
        let errors = crate::validation::field_errors(&g.validate().unwrap_err());
        assert_eq!(errors[0].field, "currentPage");
        g.total_pages = None;
        assert!(g.validate().is_ok());
    }

    #[test]
    fn zero_page_counts_are_rejected_but_clearing_is_not() {
        let zero: UpdateStudyGuideRequest =
            serde_json::from_str(r#"{"totalPages":0,"currentPage":0}"#).unwrap();
        let errors = crate::validation::field_errors(&zero.validate().unwrap_err());
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["currentPage", "totalPages"]);

        let cleared: UpdateStudyGuideRequest =
            serde_json::from_str(r#"{"totalPages":null,"title":" Renal "}"#).unwrap();
        assert!(cleared.validate().is_ok());
        let mut g = guide();
        g.apply(cleared);
        assert_eq!(g.title, "Renal");
        assert_eq!(g.total_pages, None);
    }

    #[test]
    fn payload_fields_are_not_accepted_in_updates() {
        let result = serde_json::from_str::<UpdateStudyGuideRequest>(r#"{"compressedData":"AAAA"}"#);
        assert!(result.is_err());
    }
}
