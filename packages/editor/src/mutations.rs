//! # Block Mutations
//!
//! Copy-on-write operations used by authoring UIs. Every function takes the
//! current document by reference and returns a new one; the input is never
//! touched, so callers can compare old and new documents for change
//! detection and keep snapshots for undo.
//!
//! ## Semantics
//!
//! - `remove_at` / `insert_at` / `move_at` reject indexes outside the
//!   document with [`MutationError::IndexOutOfRange`].
//! - `move_at` at an edge (first block up, last block down) returns an
//!   unchanged copy instead of failing.
//! - `update_field` addresses `type`, `id` or anything under `data` with a
//!   dotted path and fails with [`MutationError::BlockNotFound`] when the
//!   block doesn't exist.
//! - Quiz options only grow through [`append_quiz_option`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tutorly_model::{Block, BlockData, BlockDocument, BlockType};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Index {index} out of range for document with {len} blocks")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No block at index {index} (document has {len} blocks)")]
    BlockNotFound { index: usize, len: usize },

    #[error("Invalid field path: {0}")]
    InvalidPath(String),

    #[error("Invalid value for {path}: {reason}")]
    InvalidValue { path: String, reason: String },

    #[error("Block {index} is not a quiz")]
    NotAQuiz { index: usize },

    #[error("Option {option} out of range for quiz with {len} options")]
    OptionOutOfRange { option: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

pub fn append(doc: &BlockDocument, block: Block) -> BlockDocument {
    let mut next = doc.clone();
    next.blocks.push(block);
    next
}

pub fn insert_at(
    doc: &BlockDocument,
    index: usize,
    block: Block,
) -> Result<BlockDocument, MutationError> {
    if index > doc.blocks.len() {
        return Err(MutationError::IndexOutOfRange {
            index,
            len: doc.blocks.len(),
        });
    }
    let mut next = doc.clone();
    next.blocks.insert(index, block);
    Ok(next)
}

pub fn remove_at(doc: &BlockDocument, index: usize) -> Result<BlockDocument, MutationError> {
    check_range(doc, index)?;
    let mut next = doc.clone();
    next.blocks.remove(index);
    Ok(next)
}

pub fn move_at(
    doc: &BlockDocument,
    index: usize,
    direction: Direction,
) -> Result<BlockDocument, MutationError> {
    check_range(doc, index)?;
    let mut next = doc.clone();

    let target = match direction {
        Direction::Up if index > 0 => index - 1,
        Direction::Down if index + 1 < doc.blocks.len() => index + 1,
        _ => return Ok(next),
    };

    next.blocks.swap(index, target);
    Ok(next)
}

/// Set the field at `path` on block `index`.
///
/// Accepted paths: `type`, `id`, `data`, and `data.<key>[.<key>...]`.
/// Numeric segments index into existing arrays. Missing object keys are
/// created on the way down.
pub fn update_field(
    doc: &BlockDocument,
    index: usize,
    path: &str,
    value: Value,
) -> Result<BlockDocument, MutationError> {
    let block = doc.blocks.get(index).ok_or(MutationError::BlockNotFound {
        index,
        len: doc.blocks.len(),
    })?;

    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(MutationError::InvalidPath(path.to_string()));
    }
    match (segments[0], segments.len()) {
        ("type", 1) | ("id", 1) | ("data", _) => {}
        _ => return Err(MutationError::InvalidPath(path.to_string())),
    }

    let mut raw = block.to_value();
    set_path(&mut raw, &segments, value, path)?;

    let updated = Block::from_value(raw).map_err(|e| MutationError::InvalidValue {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    // A known block must stay decodable; only already-unknown blocks may stay unknown
    if !block.is_unknown()
        && updated.is_unknown()
        && updated.type_name().parse::<BlockType>().is_ok()
    {
        return Err(MutationError::InvalidValue {
            path: path.to_string(),
            reason: format!("data no longer fits a {} block", updated.type_name()),
        });
    }

    let mut next = doc.clone();
    next.blocks[index] = updated;
    Ok(next)
}

fn set_path(
    target: &mut Value,
    segments: &[&str],
    value: Value,
    path: &str,
) -> Result<(), MutationError> {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return Ok(());
    };

    if target.is_null() {
        *target = Value::Object(Map::new());
    }

    match target {
        Value::Object(map) => {
            if rest.is_empty() {
                map.insert(head.to_string(), value);
                return Ok(());
            }
            let child = map.entry(head.to_string()).or_insert(Value::Null);
            set_path(child, rest, value, path)
        }
        Value::Array(items) => {
            let slot = head
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get_mut(i))
                .ok_or_else(|| MutationError::InvalidPath(path.to_string()))?;
            set_path(slot, rest, value, path)
        }
        _ => Err(MutationError::InvalidPath(path.to_string())),
    }
}

pub fn update_quiz_option(
    doc: &BlockDocument,
    block_index: usize,
    option_index: usize,
    value: impl Into<String>,
) -> Result<BlockDocument, MutationError> {
    let value = value.into();
    with_quiz(doc, block_index, |quiz| {
        let len = quiz.options.len();
        let slot = quiz
            .options
            .get_mut(option_index)
            .ok_or(MutationError::OptionOutOfRange {
                option: option_index,
                len,
            })?;
        *slot = value;
        Ok(())
    })
}

pub fn append_quiz_option(
    doc: &BlockDocument,
    block_index: usize,
    value: impl Into<String>,
) -> Result<BlockDocument, MutationError> {
    let value = value.into();
    with_quiz(doc, block_index, |quiz| {
        quiz.options.push(value);
        Ok(())
    })
}

/// Remove an option, keeping `correctAnswer` pointing at the same option
/// where it still exists.
pub fn remove_quiz_option(
    doc: &BlockDocument,
    block_index: usize,
    option_index: usize,
) -> Result<BlockDocument, MutationError> {
    with_quiz(doc, block_index, |quiz| {
        if option_index >= quiz.options.len() {
            return Err(MutationError::OptionOutOfRange {
                option: option_index,
                len: quiz.options.len(),
            });
        }
        quiz.options.remove(option_index);
        if quiz.correct_answer > option_index {
            quiz.correct_answer -= 1;
        } else if quiz.correct_answer == option_index {
            quiz.correct_answer = 0;
        }
        Ok(())
    })
}

fn with_quiz<F>(doc: &BlockDocument, index: usize, edit: F) -> Result<BlockDocument, MutationError>
where
    F: FnOnce(&mut tutorly_model::QuizData) -> Result<(), MutationError>,
{
    let len = doc.blocks.len();
    let mut next = doc.clone();
    let block = next
        .blocks
        .get_mut(index)
        .ok_or(MutationError::BlockNotFound { index, len })?;

    match &mut block.data {
        BlockData::Quiz(quiz) => edit(quiz)?,
        _ => return Err(MutationError::NotAQuiz { index }),
    }
    Ok(next)
}

fn check_range(doc: &BlockDocument, index: usize) -> Result<(), MutationError> {
    if index >= doc.blocks.len() {
        return Err(MutationError::IndexOutOfRange {
            index,
            len: doc.blocks.len(),
        });
    }
    Ok(())
}

/// Serializable description of a block edit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    Append {
        block: Block,
    },

    #[serde(rename_all = "camelCase")]
    InsertAt {
        index: usize,
        block: Block,
    },

    RemoveAt {
        index: usize,
    },

    MoveAt {
        index: usize,
        direction: Direction,
    },

    UpdateField {
        index: usize,
        path: String,
        value: Value,
    },

    #[serde(rename_all = "camelCase")]
    UpdateQuizOption {
        block_index: usize,
        option_index: usize,
        value: String,
    },

    #[serde(rename_all = "camelCase")]
    AppendQuizOption {
        block_index: usize,
        value: String,
    },

    #[serde(rename_all = "camelCase")]
    RemoveQuizOption {
        block_index: usize,
        option_index: usize,
    },
}

impl Mutation {
    /// Apply to `doc`, producing the next document
    pub fn apply(&self, doc: &BlockDocument) -> Result<BlockDocument, MutationError> {
        match self {
            Mutation::Append { block } => Ok(append(doc, block.clone())),
            Mutation::InsertAt { index, block } => insert_at(doc, *index, block.clone()),
            Mutation::RemoveAt { index } => remove_at(doc, *index),
            Mutation::MoveAt { index, direction } => move_at(doc, *index, *direction),
            Mutation::UpdateField { index, path, value } => {
                update_field(doc, *index, path, value.clone())
            }
            Mutation::UpdateQuizOption {
                block_index,
                option_index,
                value,
            } => update_quiz_option(doc, *block_index, *option_index, value.clone()),
            Mutation::AppendQuizOption { block_index, value } => {
                append_quiz_option(doc, *block_index, value.clone())
            }
            Mutation::RemoveQuizOption {
                block_index,
                option_index,
            } => remove_quiz_option(doc, *block_index, *option_index),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Append { .. } => "append",
            Mutation::InsertAt { .. } => "insert_at",
            Mutation::RemoveAt { .. } => "remove_at",
            Mutation::MoveAt { .. } => "move_at",
            Mutation::UpdateField { .. } => "update_field",
            Mutation::UpdateQuizOption { .. } => "update_quiz_option",
            Mutation::AppendQuizOption { .. } => "append_quiz_option",
            Mutation::RemoveQuizOption { .. } => "remove_quiz_option",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> BlockDocument {
        BlockDocument::with_blocks(vec![
            Block::paragraph("one"),
            Block::paragraph("two"),
            Block::paragraph("three"),
        ])
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::MoveAt {
            index: 2,
            direction: Direction::Up,
        };

        let json = serde_json::to_string(&mutation).unwrap();
        assert_eq!(json, r#"{"op":"moveAt","index":2,"direction":"up"}"#);

        let deserialized: Mutation = serde_json::from_str(&json).unwrap();
        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_move_at_edges_are_noops() {
        let doc = sample();
        assert_eq!(move_at(&doc, 0, Direction::Up).unwrap(), doc);
        assert_eq!(move_at(&doc, 2, Direction::Down).unwrap(), doc);
    }

    #[test]
    fn test_move_at_out_of_range() {
        let doc = sample();
        assert_eq!(
            move_at(&doc, 3, Direction::Up),
            Err(MutationError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_update_field_rejects_unknown_top_level() {
        let doc = sample();
        assert!(matches!(
            update_field(&doc, 0, "time", json!(1)),
            Err(MutationError::InvalidPath(_))
        ));
        assert!(matches!(
            update_field(&doc, 0, "data..text", json!("x")),
            Err(MutationError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_update_field_type_changes_variant() {
        let doc = sample();
        let next = update_field(&doc, 1, "type", json!("text")).unwrap();
        assert_eq!(next.blocks[1].type_name(), "text");
        assert_eq!(next.blocks[1].to_value()["data"]["text"], json!("two"));
    }

    #[test]
    fn test_update_field_into_array_index() {
        let doc = BlockDocument::with_blocks(vec![Block::quiz("Q?", &["a", "b"], 0)]);
        let next = update_field(&doc, 0, "data.options.1", json!("B")).unwrap();
        assert_eq!(next.blocks[0].to_value()["data"]["options"], json!(["a", "B"]));

        assert!(matches!(
            update_field(&doc, 0, "data.options.5", json!("x")),
            Err(MutationError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_remove_quiz_option_keeps_answer() {
        let doc = BlockDocument::with_blocks(vec![Block::quiz("Q?", &["a", "b", "c"], 2)]);
        let next = remove_quiz_option(&doc, 0, 0).unwrap();

        let BlockData::Quiz(quiz) = &next.blocks[0].data else {
            panic!("Expected quiz");
        };
        assert_eq!(quiz.options, vec!["b", "c"]);
        assert_eq!(quiz.correct_option(), Some("c"));
    }
}
