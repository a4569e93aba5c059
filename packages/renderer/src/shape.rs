//! # Content Shapes
//!
//! Tutorial views have been stored three different ways over time. The
//! shape is sniffed from the JSON, first match wins:
//!
//! 1. `content` object with `sections` or `narrative`: authored document
//! 2. non-empty `lessons` array: block-based lessons
//! 3. `content` string: pre-rendered markup
//!
//! Anything else has no content.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tutorly_model::Block;

/// A lesson inside the block-based shape
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LessonView {
    pub title: String,
    pub blocks: Vec<Block>,
    /// Entries that weren't blocks at all; shown as comments
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacySection {
    pub title: String,
    #[serde(alias = "content", alias = "body")]
    pub text: String,
    #[serde(alias = "videoUrl")]
    pub video: String,
    pub code: String,
    #[serde(alias = "codeLanguage")]
    pub language: String,
    #[serde(alias = "outputHtml", alias = "output_html")]
    pub output: String,
    #[serde(alias = "tip")]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyDocument {
    pub title: String,
    #[serde(alias = "intro")]
    pub introduction: String,
    #[serde(alias = "videoUrl")]
    pub video: String,
    pub narrative: String,
    pub sections: Vec<LegacySection>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentShape {
    LegacySections(LegacyDocument),
    Lessons(Vec<LessonView>),
    RawHtml(String),
    Empty,
}

impl ContentShape {
    pub fn resolve(view: &Value) -> Self {
        let content = view.get("content");

        let authored = content
            .filter(|c| c.is_object() && (c.get("sections").is_some() || c.get("narrative").is_some()));
        if let Some(authored) = authored {
            let mut document = legacy_document(authored);
            if document.title.is_empty() {
                document.title = string_field(view, "title");
            }
            return ContentShape::LegacySections(document);
        }

        if let Some(Value::Array(lessons)) = view.get("lessons") {
            if !lessons.is_empty() {
                return ContentShape::Lessons(lessons.iter().map(lesson_view).collect());
            }
        }

        if let Some(Value::String(html)) = content {
            return ContentShape::RawHtml(html.clone());
        }

        ContentShape::Empty
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContentShape::LegacySections(_) => "legacy-sections",
            ContentShape::Lessons(_) => "lessons",
            ContentShape::RawHtml(_) => "raw-html",
            ContentShape::Empty => "empty",
        }
    }
}

/// Decode an authored document field by field so one malformed field
/// doesn't lose the rest
fn legacy_document(value: &Value) -> LegacyDocument {
    if let Ok(document) = serde_json::from_value::<LegacyDocument>(value.clone()) {
        return document;
    }

    let sections = match value.get("sections") {
        Some(Value::Array(items)) => items.iter().map(legacy_section).collect(),
        _ => Vec::new(),
    };

    LegacyDocument {
        title: first_string(value, &["title"]),
        introduction: first_string(value, &["introduction", "intro"]),
        video: first_string(value, &["video", "videoUrl"]),
        narrative: first_string(value, &["narrative"]),
        sections,
    }
}

fn legacy_section(value: &Value) -> LegacySection {
    if let Ok(section) = serde_json::from_value::<LegacySection>(value.clone()) {
        return section;
    }

    LegacySection {
        title: first_string(value, &["title"]),
        text: first_string(value, &["text", "content", "body"]),
        video: first_string(value, &["video", "videoUrl"]),
        code: first_string(value, &["code"]),
        language: first_string(value, &["language", "codeLanguage"]),
        output: first_string(value, &["output", "outputHtml", "output_html"]),
        note: first_string(value, &["note", "tip"]),
    }
}

/// Lesson content is either a bare block array or a whole BlockDocument
fn lesson_view(lesson: &Value) -> LessonView {
    let entries = match lesson.get("content") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(Value::Object(doc)) => match doc.get("blocks") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    };

    let mut view = LessonView {
        title: string_field(lesson, "title"),
        ..Default::default()
    };
    for entry in entries {
        match Block::from_value(entry.clone()) {
            Ok(block) => view.blocks.push(block),
            Err(_) => view.skipped += 1,
        }
    }
    view
}

/// First of `keys` that holds a string
fn first_string(value: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
