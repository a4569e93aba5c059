//! # Block Document
//!
//! The persisted unit of lesson content. Block order is render order;
//! nothing in the workspace reorders blocks implicitly.

use crate::{Block, ModelResult};
use serde::{Deserialize, Serialize};

/// Format version stamped on newly created documents
pub const CURRENT_VERSION: &str = "2.28.2";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDocument {
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub time: i64,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub blocks: Vec<Block>,
}

fn default_version() -> String {
    CURRENT_VERSION.to_string()
}

impl BlockDocument {
    /// Fresh document with no blocks, stamped now
    pub fn empty() -> Self {
        Self {
            time: chrono::Utc::now().timestamp_millis(),
            version: default_version(),
            blocks: Vec::new(),
        }
    }

    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Self::empty()
        }
    }

    pub fn from_json(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks whose type is outside the closed set
    pub fn unknown_blocks(&self) -> impl Iterator<Item = (usize, &Block)> {
        self.blocks.iter().enumerate().filter(|(_, b)| b.is_unknown())
    }
}

impl Default for BlockDocument {
    fn default() -> Self {
        Self::empty()
    }
}
