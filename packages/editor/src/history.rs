//! # Undo/Redo History
//!
//! Because mutations are copy-on-write, history is a pair of snapshot
//! stacks rather than a log of inverse operations.
//!
//! - Applying a mutation pushes the previous document onto the undo stack
//! - Undo swaps the current document with the top of the undo stack
//! - Redo reverses an undo
//! - Any new edit clears the redo stack
//! - Batches group several edits into one undo step
//!
//! ```rust,ignore
//! let mut history = History::new(document);
//! history.apply(&Mutation::RemoveAt { index: 0 })?;
//! history.undo();
//! history.redo();
//! ```

use crate::{Mutation, MutationError};
use tutorly_model::BlockDocument;

/// A document state that can be returned to
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub document: BlockDocument,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct History {
    current: BlockDocument,
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
    /// Set while a batch is open and its starting snapshot has been taken
    batch: Option<BatchState>,
}

#[derive(Debug)]
struct BatchState {
    recorded: bool,
    description: Option<String>,
}

impl History {
    /// History with the default limit of 100 undo levels
    pub fn new(document: BlockDocument) -> Self {
        Self::with_max_levels(document, 100)
    }

    pub fn with_max_levels(document: BlockDocument, max_levels: usize) -> Self {
        Self {
            current: document,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            batch: None,
        }
    }

    pub fn current(&self) -> &BlockDocument {
        &self.current
    }

    /// Apply a mutation and record the previous state
    pub fn apply(&mut self, mutation: &Mutation) -> Result<&BlockDocument, MutationError> {
        let next = mutation.apply(&self.current)?;
        self.commit(next, Some(mutation.name().to_string()));
        Ok(&self.current)
    }

    /// Record a document produced outside the mutation API, such as a
    /// widget save. Identical documents are not recorded.
    pub fn replace(&mut self, document: BlockDocument, description: Option<String>) {
        if document == self.current {
            return;
        }
        self.commit(document, description);
    }

    fn commit(&mut self, next: BlockDocument, description: Option<String>) {
        let previous = std::mem::replace(&mut self.current, next);

        let record = match &mut self.batch {
            Some(batch) if batch.recorded => None,
            Some(batch) => {
                batch.recorded = true;
                Some(batch.description.clone().or(description))
            }
            None => Some(description),
        };

        if let Some(description) = record {
            self.push_undo(HistoryEntry {
                document: previous,
                description,
            });
        }

        self.redo_stack.clear();
    }

    fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }
    }

    /// Start grouping edits into a single undo step
    pub fn begin_batch(&mut self, description: Option<String>) {
        self.batch = Some(BatchState {
            recorded: false,
            description,
        });
    }

    pub fn end_batch(&mut self) {
        self.batch = None;
    }

    pub fn undo(&mut self) -> Option<&BlockDocument> {
        self.batch = None;
        let entry = self.undo_stack.pop()?;
        let undone = std::mem::replace(&mut self.current, entry.document);
        self.redo_stack.push(HistoryEntry {
            document: undone,
            description: entry.description,
        });
        Some(&self.current)
    }

    pub fn redo(&mut self) -> Option<&BlockDocument> {
        self.batch = None;
        let entry = self.redo_stack.pop()?;
        let redone = std::mem::replace(&mut self.current, entry.document);
        self.undo_stack.push(HistoryEntry {
            document: redone,
            description: entry.description,
        });
        Some(&self.current)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Description of the step `undo` would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last()?.description.as_deref()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.batch = None;
    }
}
