//! # Tutorly Export
//!
//! Turns lessons into files people can keep: pretty JSON, a standalone
//! printable HTML page, or a plain-text transcript.
//!
//! Conversions are total. Every block produces some output, blocks
//! without a text form produce an empty string, and unknown blocks become
//! an HTML comment.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tutorly_export::{export_lesson, ExportFormat};
//!
//! let exported = export_lesson(&store, "12", ExportFormat::Html).await?;
//! std::fs::write(&exported.filename, exported.data)?;
//! ```

mod error;
mod export;
mod html;
mod text;

pub use error::ExportError;
pub use export::{export_filename, export_lesson, export_record, ExportFailure, ExportFormat, Exported};
pub use html::{blocks_to_html, to_html, to_html_with_options, HtmlOptions};
pub use text::{lesson_to_text, strip_tags, to_text};
