//! Lesson records as held by the content store

use crate::BlockDocument;
use serde::{Deserialize, Deserializer, Serialize};

/// A lesson with its authoring metadata and block content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    pub id: String,

    #[serde(default)]
    pub tutorial_id: String,

    pub title: String,

    #[serde(default)]
    pub order: u32,

    /// Estimated duration in minutes
    #[serde(default)]
    pub duration: u32,

    #[serde(default)]
    pub is_published: bool,

    #[serde(default, deserialize_with = "nullable_document")]
    pub content: BlockDocument,
}

/// Fields a caller supplies when creating or updating a lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDraft {
    pub title: String,

    #[serde(default)]
    pub order: u32,

    #[serde(default)]
    pub duration: u32,

    #[serde(default)]
    pub is_published: bool,

    #[serde(default, deserialize_with = "nullable_document")]
    pub content: BlockDocument,
}

impl LessonRecord {
    pub fn from_draft(id: impl Into<String>, tutorial_id: impl Into<String>, draft: LessonDraft) -> Self {
        Self {
            id: id.into(),
            tutorial_id: tutorial_id.into(),
            title: draft.title,
            order: draft.order,
            duration: draft.duration,
            is_published: draft.is_published,
            content: draft.content,
        }
    }

    /// Overwrite the editable fields, keeping identity
    pub fn apply_draft(&mut self, draft: LessonDraft) {
        self.title = draft.title;
        self.order = draft.order;
        self.duration = draft.duration;
        self.is_published = draft.is_published;
        self.content = draft.content;
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_published {
            "Published"
        } else {
            "Draft"
        }
    }
}

impl LessonDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            order: 0,
            duration: 0,
            is_published: false,
            content: BlockDocument::empty(),
        }
    }

    pub fn with_content(mut self, content: BlockDocument) -> Self {
        self.content = content;
        self
    }
}

fn nullable_document<'de, D>(deserializer: D) -> Result<BlockDocument, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BlockDocument>::deserialize(deserializer)?.unwrap_or_default())
}
