//! # Tutorly Model
//!
//! Canonical in-memory representation of lesson content.
//!
//! A lesson's body is a [`BlockDocument`]: an ordered list of typed
//! [`Block`]s plus a timestamp and a format version. Blocks are a tagged
//! union over a closed set of types; anything outside that set is kept
//! verbatim as [`BlockData::Unknown`] so documents survive a round-trip
//! through code that doesn't understand them.
//!
//! ```text
//! LessonRecord ── content ──► BlockDocument ── blocks ──► [Block]
//!                                                          │
//!                                                     BlockData::{Paragraph, Code, ..., Unknown}
//! ```

mod block;
mod document;
mod error;
mod lesson;

pub use block::{
    is_valid_block, Block, BlockData, BlockType, CodeData, DelimiterData, EmbedData, HeaderData,
    ImageData, ImageFile, ListData, ListItem, ListStyle, NestedListItem, ParagraphData, QuizData,
    QuoteData, TableData, TextData, VideoData,
};
pub use document::{BlockDocument, CURRENT_VERSION};
pub use error::{ModelError, ModelResult};
pub use lesson::{LessonDraft, LessonRecord};
