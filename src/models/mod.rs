//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 하나의 엔티티와 그 요청 타입(생성/수정)을 담당합니다:
//! - `user`: 사용자와 인증 요청/응답
//! - `topic`: 학습 토픽
//! - `study_guide`: PDF 학습 가이드 메타데이터
//! - `video`: 외부 영상 링크
//! - `schedule`: 학습 일정
//! - `bookmark`: PDF/영상/노트를 가리키는 북마크
//! - `note`: 노트
//! - `progress`: 사용자별 학습 진행도
//! - `search`: 통합 검색 결과
//!
//! JSON 필드 이름은 프론트엔드에 맞춰 camelCase를 사용하고,
//! DB 컬럼은 snake_case를 사용합니다 (`sqlx::FromRow`는 Rust 필드 이름을 그대로 씁니다).

pub mod bookmark;
pub mod note;
pub mod progress;
pub mod schedule;
pub mod search;
pub mod study_guide;
pub mod topic;
pub mod user;
pub mod video;

pub use bookmark::*;
pub use note::*;
pub use progress::*;
pub use schedule::*;
pub use search::*;
pub use study_guide::*;
pub use topic::*;
pub use user::*;
pub use video::*;

use serde::{Deserialize, Deserializer};

/// 부분 업데이트에서 "필드 누락"과 "명시적 null"을 구분하기 위한 역직렬화 함수
///
/// `#[serde(default, deserialize_with = "double_option")]`와 함께 사용합니다.
/// - 필드 누락 → `None` (변경 안 함)
/// - `null` → `Some(None)` (값 지우기)
/// - 값 → `Some(Some(v))`
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// 빈 문자열 topicId는 "토픽 없음"으로 취급합니다. (폼에서 선택을 비웠을 때)
pub fn normalize_ref(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        description: Option<Option<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"description":null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"description":"x"}"#).unwrap();

        assert_eq!(absent.description, None);
        assert_eq!(null.description, Some(None));
        assert_eq!(value.description, Some(Some("x".to_string())));
    }

    #[test]
    fn blank_refs_become_none() {
        assert_eq!(normalize_ref(Some("  ".into())), None);
        assert_eq!(normalize_ref(Some(" t1 ".into())), Some("t1".into()));
        assert_eq!(normalize_ref(None), None);
    }
}
