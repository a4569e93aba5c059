//! # Blocks
//!
//! A block is `{ id?, type, data }` on the wire. In memory the `type`/`data`
//! pair becomes one [`BlockData`] variant so every consumer matches
//! exhaustively over the closed set of block types.
//!
//! Every typed data struct carries an `extra` map that captures fields this
//! crate does not name, so editor-specific metadata is written back
//! unchanged.

use crate::ModelError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Closed set of block type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Paragraph,
    Header,
    List,
    Code,
    Quote,
    Image,
    Video,
    Table,
    Delimiter,
    Embed,
    Quiz,
    Text,
}

impl BlockType {
    pub const ALL: [BlockType; 12] = [
        BlockType::Paragraph,
        BlockType::Header,
        BlockType::List,
        BlockType::Code,
        BlockType::Quote,
        BlockType::Image,
        BlockType::Video,
        BlockType::Table,
        BlockType::Delimiter,
        BlockType::Embed,
        BlockType::Quiz,
        BlockType::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Header => "header",
            BlockType::List => "list",
            BlockType::Code => "code",
            BlockType::Quote => "quote",
            BlockType::Image => "image",
            BlockType::Video => "video",
            BlockType::Table => "table",
            BlockType::Delimiter => "delimiter",
            BlockType::Embed => "embed",
            BlockType::Quiz => "quiz",
            BlockType::Text => "text",
        }
    }
}

impl FromStr for BlockType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::UnknownBlockType(s.to_string()))
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphData {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderData {
    pub text: String,
    pub level: u8,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for HeaderData {
    fn default() -> Self {
        Self {
            text: String::new(),
            level: 1,
            extra: Map::new(),
        }
    }
}

impl HeaderData {
    /// Heading level clamped to the HTML range
    pub fn clamped_level(&self) -> u8 {
        self.level.clamp(1, 6)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
}

/// List entries are plain strings in older documents and
/// `{ content, items }` objects once nesting is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    Text(String),
    Nested(NestedListItem),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestedListItem {
    pub content: String,
    pub items: Vec<ListItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ListItem {
    pub fn content(&self) -> &str {
        match self {
            ListItem::Text(text) => text,
            ListItem::Nested(item) => &item.content,
        }
    }

    pub fn children(&self) -> &[ListItem] {
        match self {
            ListItem::Text(_) => &[],
            ListItem::Nested(item) => &item.items,
        }
    }
}

impl From<&str> for ListItem {
    fn from(text: &str) -> Self {
        ListItem::Text(text.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListData {
    pub style: ListStyle,
    pub items: Vec<ListItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeData {
    pub code: String,
    pub language: String,
    pub caption: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteData {
    pub text: String,
    pub caption: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageFile {
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageData {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<ImageFile>,
    pub alt: String,
    pub caption: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageData {
    /// Image location, preferring the top-level `url` over uploader output
    pub fn source_url(&self) -> &str {
        if !self.url.is_empty() {
            return &self.url;
        }
        self.file.as_ref().map(|f| f.url.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoData {
    pub url: String,
    pub caption: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableData {
    pub with_headings: bool,
    pub content: Vec<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimiterData {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedData {
    pub service: String,
    pub source: String,
    pub embed: String,
    pub caption: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuizData {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub explanation: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuizData {
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_answer).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextData {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Type-specific payload of a block
#[derive(Debug, Clone, PartialEq)]
pub enum BlockData {
    Paragraph(ParagraphData),
    Header(HeaderData),
    List(ListData),
    Code(CodeData),
    Quote(QuoteData),
    Image(ImageData),
    Video(VideoData),
    Table(TableData),
    Delimiter(DelimiterData),
    Embed(EmbedData),
    Quiz(QuizData),
    Text(TextData),
    /// A type outside the closed set, or a known type whose data could not
    /// be decoded. Kept verbatim.
    Unknown { kind: String, data: Value },
}

impl BlockData {
    pub fn block_type(&self) -> Option<BlockType> {
        let ty = match self {
            BlockData::Paragraph(_) => BlockType::Paragraph,
            BlockData::Header(_) => BlockType::Header,
            BlockData::List(_) => BlockType::List,
            BlockData::Code(_) => BlockType::Code,
            BlockData::Quote(_) => BlockType::Quote,
            BlockData::Image(_) => BlockType::Image,
            BlockData::Video(_) => BlockType::Video,
            BlockData::Table(_) => BlockType::Table,
            BlockData::Delimiter(_) => BlockType::Delimiter,
            BlockData::Embed(_) => BlockType::Embed,
            BlockData::Quiz(_) => BlockType::Quiz,
            BlockData::Text(_) => BlockType::Text,
            BlockData::Unknown { .. } => return None,
        };
        Some(ty)
    }

    fn decode(kind: &str, data: Value) -> BlockData {
        let Ok(ty) = kind.parse::<BlockType>() else {
            return BlockData::Unknown {
                kind: kind.to_string(),
                data,
            };
        };

        let typed = match ty {
            BlockType::Paragraph => decode_as(&data).map(BlockData::Paragraph),
            BlockType::Header => decode_as(&data).map(BlockData::Header),
            BlockType::List => decode_as(&data).map(BlockData::List),
            BlockType::Code => decode_as(&data).map(BlockData::Code),
            BlockType::Quote => decode_as(&data).map(BlockData::Quote),
            BlockType::Image => decode_as(&data).map(BlockData::Image),
            BlockType::Video => decode_as(&data).map(BlockData::Video),
            BlockType::Table => decode_as(&data).map(BlockData::Table),
            BlockType::Delimiter => decode_as(&data).map(BlockData::Delimiter),
            BlockType::Embed => decode_as(&data).map(BlockData::Embed),
            BlockType::Quiz => decode_as(&data).map(BlockData::Quiz),
            BlockType::Text => decode_as(&data).map(BlockData::Text),
        };

        typed.unwrap_or(BlockData::Unknown {
            kind: kind.to_string(),
            data,
        })
    }

    fn encode(&self) -> (String, Value) {
        let encoded = match self {
            BlockData::Paragraph(d) => serde_json::to_value(d),
            BlockData::Header(d) => serde_json::to_value(d),
            BlockData::List(d) => serde_json::to_value(d),
            BlockData::Code(d) => serde_json::to_value(d),
            BlockData::Quote(d) => serde_json::to_value(d),
            BlockData::Image(d) => serde_json::to_value(d),
            BlockData::Video(d) => serde_json::to_value(d),
            BlockData::Table(d) => serde_json::to_value(d),
            BlockData::Delimiter(d) => serde_json::to_value(d),
            BlockData::Embed(d) => serde_json::to_value(d),
            BlockData::Quiz(d) => serde_json::to_value(d),
            BlockData::Text(d) => serde_json::to_value(d),
            BlockData::Unknown { kind, data } => return (kind.clone(), data.clone()),
        };
        let kind = self.block_type().map(|t| t.as_str()).unwrap_or_default();
        (
            kind.to_string(),
            encoded.unwrap_or_else(|_| Value::Object(Map::new())),
        )
    }
}

fn decode_as<T: DeserializeOwned>(data: &Value) -> Option<T> {
    if !data.is_object() {
        return None;
    }
    serde_json::from_value(data.clone()).ok()
}

/// Wire form of a block
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// A single typed unit of lesson content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBlock", into = "RawBlock")]
pub struct Block {
    /// Identifier assigned by the editing widget, if any
    pub id: Option<String>,
    pub data: BlockData,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        Block {
            id: raw.id,
            data: BlockData::decode(&raw.kind, raw.data),
        }
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        let (kind, data) = block.data.encode();
        RawBlock {
            id: block.id,
            kind,
            data,
        }
    }
}

impl Block {
    pub fn new(data: BlockData) -> Self {
        Self { id: None, data }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn block_type(&self) -> Option<BlockType> {
        self.data.block_type()
    }

    /// The `type` tag as written on the wire
    pub fn type_name(&self) -> &str {
        match &self.data {
            BlockData::Unknown { kind, .. } => kind,
            other => other.block_type().map(|t| t.as_str()).unwrap_or_default(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.data, BlockData::Unknown { .. })
    }

    /// JSON form of this block (`{ id?, type, data }`)
    pub fn to_value(&self) -> Value {
        let raw = RawBlock::from(self.clone());
        serde_json::to_value(raw).unwrap_or(Value::Null)
    }

    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockData::Paragraph(ParagraphData {
            text: text.into(),
            ..Default::default()
        }))
    }

    pub fn header(text: impl Into<String>, level: u8) -> Self {
        Self::new(BlockData::Header(HeaderData {
            text: text.into(),
            level,
            ..Default::default()
        }))
    }

    pub fn code(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self::new(BlockData::Code(CodeData {
            code: code.into(),
            language: language.into(),
            ..Default::default()
        }))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(BlockData::Text(TextData {
            text: text.into(),
            ..Default::default()
        }))
    }

    pub fn list(style: ListStyle, items: &[&str]) -> Self {
        Self::new(BlockData::List(ListData {
            style,
            items: items.iter().map(|i| ListItem::from(*i)).collect(),
            ..Default::default()
        }))
    }

    pub fn image(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self::new(BlockData::Image(ImageData {
            url: url.into(),
            alt: alt.into(),
            ..Default::default()
        }))
    }

    pub fn quiz(question: impl Into<String>, options: &[&str], correct_answer: usize) -> Self {
        Self::new(BlockData::Quiz(QuizData {
            question: question.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer,
            ..Default::default()
        }))
    }

    pub fn delimiter() -> Self {
        Self::new(BlockData::Delimiter(DelimiterData::default()))
    }
}

/// Shape check on a raw JSON block: `type` must be a string and `data`
/// an object. Unknown type names are still valid.
pub fn is_valid_block(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let has_type = obj.get("type").map(Value::is_string).unwrap_or(false);
    let has_data = obj.get("data").map(Value::is_object).unwrap_or(false);
    has_type && has_data
}
