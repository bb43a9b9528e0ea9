use serde::{Deserialize, Serialize};
use validator::Validate;

use super::double_option;
use crate::validation::not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub user_id: String,
    pub topic_id: Option<String>,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateNoteRequest {
    pub topic_id: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateNoteRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub topic_id: Option<Option<String>>,
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub content: Option<String>,
}

impl Note {
    pub fn apply(&mut self, patch: UpdateNoteRequest) {
        if let Some(topic_id) = patch.topic_id {
            self.topic_id = topic_id;
        }
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
    }
}

/// `GET /api/notes?topicId=...`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFilter {
    pub topic_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retitled_notes_are_trimmed() {
        let mut note = Note {
            id: "n1".into(),
            user_id: "u1".into(),
            topic_id: None,
            title: "GFR".into(),
            content: "Inulin clearance".into(),
            created_at: "2026-01-01T00:00:00.000Z".into(),
            updated_at: "2026-01-01T00:00:00.000Z".into(),
        };
        note.apply(UpdateNoteRequest {
            title: Some(" Renal clearance\n".into()),
            ..Default::default()
        });
        assert_eq!(note.title, "Renal clearance");
        assert_eq!(note.content, "Inulin clearance");
    }

    #[test]
    fn blank_content_is_rejected() {
        let req = CreateNoteRequest {
            topic_id: None,
            title: "GFR".into(),
            content: " \t".into(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("content"));
    }
}
