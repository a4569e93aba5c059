use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only display tree produced by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DisplayNode {
    /// HTML element
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        children: Vec<DisplayNode>,
    },

    /// Plain text, escaped on output
    Text { content: String },

    /// Authored inline markup, emitted as-is
    Markup { html: String },

    /// Invisible node; used for content the renderer can't show
    Comment { content: String },

    /// Visible notice that there is nothing to show
    Placeholder { message: String },

    /// Interactive single-select question. Selection state lives in
    /// [`crate::QuizState`], keyed by `id`.
    #[serde(rename_all = "camelCase")]
    Quiz {
        id: String,
        question: String,
        options: Vec<String>,
        correct_answer: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
}

impl DisplayNode {
    pub fn element(tag: impl Into<String>) -> Self {
        DisplayNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        DisplayNode::Text {
            content: content.into(),
        }
    }

    pub fn markup(html: impl Into<String>) -> Self {
        DisplayNode::Markup { html: html.into() }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        DisplayNode::Comment {
            content: content.into(),
        }
    }

    pub fn placeholder(message: impl Into<String>) -> Self {
        DisplayNode::Placeholder {
            message: message.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let DisplayNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    /// Append to the `class` attribute
    pub fn with_class(mut self, class: &str) -> Self {
        if let DisplayNode::Element {
            ref mut attributes, ..
        } = self
        {
            let classes = attributes.entry("class".to_string()).or_default();
            if !classes.is_empty() {
                classes.push(' ');
            }
            classes.push_str(class);
        }
        self
    }

    pub fn with_child(mut self, child: DisplayNode) -> Self {
        if let DisplayNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<DisplayNode>) -> Self {
        if let DisplayNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            DisplayNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            DisplayNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn children(&self) -> &[DisplayNode] {
        match self {
            DisplayNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Whether the node shows anything to the reader
    pub fn is_visible(&self) -> bool {
        !matches!(self, DisplayNode::Comment { .. })
    }

    /// Depth-first walk over this node and everything below it
    pub fn descendants(&self) -> Vec<&DisplayNode> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.descendants());
        }
        out
    }

    /// Elements below this node (inclusive) with the given tag
    pub fn find_by_tag<'a>(&'a self, tag: &str) -> Vec<&'a DisplayNode> {
        self.descendants()
            .into_iter()
            .filter(|n| n.tag() == Some(tag))
            .collect()
    }

    /// Concatenated text of every text-like node, for assertions and
    /// search indexing
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in self.descendants() {
            match node {
                DisplayNode::Text { content } => out.push_str(content),
                DisplayNode::Markup { html } => out.push_str(html),
                DisplayNode::Placeholder { message } => out.push_str(message),
                DisplayNode::Quiz {
                    question, options, ..
                } => {
                    out.push_str(question);
                    for option in options {
                        out.push(' ');
                        out.push_str(option);
                    }
                }
                _ => {}
            }
        }
        out
    }
}
