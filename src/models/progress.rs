//! # 학습 진행도 모델
//!
//! 사용자당 하나뿐인 집계 레코드입니다. 다른 엔티티의 CRUD로 자동 갱신되지 않고,
//! `PUT /api/study-progress`로 클라이언트가 직접 값을 써넣습니다.
//! 처음 조회할 때 0으로 채워진 레코드가 생성됩니다.

use serde::{Deserialize, Serialize};

use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudyProgress {
    pub id: String,
    pub user_id: String,
    pub total_topics: i64,
    pub completed_topics: i64,
    pub study_hours: i64,
    pub videos_watched: i64,
    pub bookmark_count: i64,
    pub updated_at: String,
}

/// 진행도 부분 수정 요청. 보낸 카운터만 덮어씁니다.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateStudyProgressRequest {
    #[validate(range(min = 0, message = "must be at least 0"))]
    pub total_topics: Option<i64>,
    #[validate(range(min = 0, message = "must be at least 0"))]
    pub completed_topics: Option<i64>,
    #[validate(range(min = 0, message = "must be at least 0"))]
    pub study_hours: Option<i64>,
    #[validate(range(min = 0, message = "must be at least 0"))]
    pub videos_watched: Option<i64>,
    #[validate(range(min = 0, message = "must be at least 0"))]
    pub bookmark_count: Option<i64>,
}

impl StudyProgress {
    pub fn apply(&mut self, patch: UpdateStudyProgressRequest) {
        if let Some(value) = patch.total_topics {
            self.total_topics = value;
        }
        if let Some(value) = patch.completed_topics {
            self.completed_topics = value;
        }
        if let Some(value) = patch.study_hours {
            self.study_hours = value;
        }
        if let Some(value) = patch.videos_watched {
            self.videos_watched = value;
        }
        if let Some(value) = patch.bookmark_count {
            self.bookmark_count = value;
        }
    }
}
