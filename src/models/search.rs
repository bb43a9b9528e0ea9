use serde::{Deserialize, Serialize};

use super::{Note, StudyGuide, Topic, Video};

/// `GET /api/search?q=...`
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// 종류별로 묶인 검색 결과
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub topics: Vec<Topic>,
    pub study_guides: Vec<StudyGuide>,
    pub videos: Vec<Video>,
    pub notes: Vec<Note>,
}
