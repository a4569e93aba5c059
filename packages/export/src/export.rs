use crate::{lesson_to_text, to_html, ExportError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{info, instrument, warn};
use tutorly_model::LessonRecord;
use tutorly_store::ContentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Html,
    Text,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Html, ExportFormat::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
            ExportFormat::Text => "text",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
            ExportFormat::Text => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "html" => Ok(ExportFormat::Html),
            "text" | "txt" => Ok(ExportFormat::Text),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// A finished export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exported {
    pub data: String,
    pub filename: String,
}

/// Why an export didn't happen, in a form a UI can show
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("Failed to export lesson {lesson_id} as {format}: {message}")]
pub struct ExportFailure {
    pub lesson_id: String,
    pub format: ExportFormat,
    pub message: String,
}

/// Fetch a lesson and convert it
#[instrument(skip(store))]
pub async fn export_lesson<S>(
    store: &S,
    lesson_id: &str,
    format: ExportFormat,
) -> Result<Exported, ExportFailure>
where
    S: ContentStore + ?Sized,
{
    let result = match store.get_lesson(lesson_id).await {
        Ok(lesson) => export_record(&lesson, format),
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(exported) => {
            info!(filename = %exported.filename, bytes = exported.data.len(), "Lesson exported");
            Ok(exported)
        }
        Err(e) => {
            warn!(error = %e, "Lesson export failed");
            Err(ExportFailure {
                lesson_id: lesson_id.to_string(),
                format,
                message: e.to_string(),
            })
        }
    }
}

/// Convert a lesson already in hand
pub fn export_record(lesson: &LessonRecord, format: ExportFormat) -> Result<Exported, ExportError> {
    let data = match format {
        ExportFormat::Json => serde_json::to_string_pretty(lesson)?,
        ExportFormat::Html => to_html(lesson),
        ExportFormat::Text => lesson_to_text(lesson),
    };

    Ok(Exported {
        data,
        filename: export_filename(&lesson.title, format),
    })
}

fn separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").unwrap())
}

/// Lower-cased title with every run of non-alphanumerics collapsed to `_`
pub fn export_filename(title: &str, format: ExportFormat) -> String {
    let stem = separators().replace_all(title, "_").to_lowercase();
    let stem = if stem.is_empty() || stem == "_" {
        "lesson".to_string()
    } else {
        stem
    };
    format!("{}.{}", stem, format.extension())
}
