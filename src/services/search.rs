//! # 통합 검색
//!
//! 네 종류의 목록을 동시에 불러온 뒤, 메모리에서 대소문자 구분 없는
//! 부분 문자열 일치로 거릅니다. 순위와 페이지네이션은 없습니다.
//! 검색 한 번이 사용자의 전체 레코드 수에 비례하는 비용을 씁니다.
//!
//! | 종류 | 검사하는 필드 |
//! |------|---------------|
//! | Topic | name, description |
//! | StudyGuide | title, fileName |
//! | Video | title, description |
//! | Note | title, content |

use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::models::{Note, SearchResults, StudyGuide, Topic, Video};

pub async fn search(pool: &SqlitePool, user_id: &str, query: &str) -> Result<SearchResults, AppError> {
    let (topics, study_guides, videos, notes) = tokio::try_join!(
        db::topics::list_topics(pool, user_id),
        db::study_guides::list_study_guides(pool, user_id),
        db::videos::list_videos(pool, user_id, None),
        db::notes::list_notes(pool, user_id, None),
    )?;

    Ok(filter_results(query, topics, study_guides, videos, notes))
}

pub fn filter_results(
    query: &str,
    topics: Vec<Topic>,
    study_guides: Vec<StudyGuide>,
    videos: Vec<Video>,
    notes: Vec<Note>,
) -> SearchResults {
    let needle = query.trim().to_lowercase();
    let hit = |field: &str| field.to_lowercase().contains(&needle);
    let hit_opt = |field: &Option<String>| field.as_deref().is_some_and(hit);

    SearchResults {
        topics: topics
            .into_iter()
            .filter(|t| hit(&t.name) || hit(&t.description))
            .collect(),
        study_guides: study_guides
            .into_iter()
            .filter(|g| hit(&g.title) || hit(&g.file_name))
            .collect(),
        videos: videos
            .into_iter()
            .filter(|v| hit(&v.title) || hit_opt(&v.description))
            .collect(),
        notes: notes
            .into_iter()
            .filter(|n| hit(&n.title) || hit(&n.content))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{memory_pool, notes, topics, users};

    #[tokio::test]
    async fn note_content_match_returns_only_that_note() {
        let pool = memory_pool().await.unwrap();
        let user = users::create_user(&pool, "a@x.com", "h", "A").await.unwrap();
        topics::create_topic(&pool, &user.id, "Neuro", "brain", "#112233").await.unwrap();
        notes::create_note(&pool, &user.id, None, "Lecture 3", "Frank-Starling curve").await.unwrap();
        notes::create_note(&pool, &user.id, None, "Lecture 4", "Baroreceptors").await.unwrap();

        let results = search(&pool, &user.id, "STARLING").await.unwrap();
        assert!(results.topics.is_empty());
        assert!(results.study_guides.is_empty());
        assert!(results.videos.is_empty());
        assert_eq!(results.notes.len(), 1);
        assert_eq!(results.notes[0].title, "Lecture 3");
    }

    #[tokio::test]
    async fn other_users_records_are_never_searched() {
        let pool = memory_pool().await.unwrap();
        let alice = users::create_user(&pool, "a@x.com", "h", "A").await.unwrap();
        let bob = users::create_user(&pool, "b@x.com", "h", "B").await.unwrap();
        topics::create_topic(&pool, &alice.id, "Pharmacology", "", "#abc").await.unwrap();

        let results = search(&pool, &bob.id, "pharma").await.unwrap();
        assert!(results.topics.is_empty());
    }
}
