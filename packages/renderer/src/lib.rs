//! # Tutorly Renderer
//!
//! Read-only rendering of tutorials for learners.
//!
//! ```text
//! tutorial JSON ──► ContentShape::resolve ──► DisplayNode tree ──► to_html()
//!                    sections / lessons /       (quiz state kept
//!                    raw html / empty            in QuizState)
//! ```
//!
//! Rendering never fails. Malformed or unknown blocks turn into invisible
//! comment nodes and an empty view turns into a visible placeholder.

mod blocks;
mod display;
mod html;
mod quiz;
mod render;
mod shape;
mod video;

pub use blocks::{render_block, render_blocks};
pub use display::DisplayNode;
pub use quiz::{QuizOutcome, QuizState};
pub use render::{render_document, render_tutorial, EMPTY_LESSON_MESSAGE, NO_CONTENT_MESSAGE};
pub use shape::{ContentShape, LegacyDocument, LegacySection, LessonView};
pub use video::embed_url;
