//! Markup tree model and parser seam.
//!
//! # Responsibility
//! - Define the block/inline/list node shapes a memo parses into.
//! - Expose the parser as a trait so the core never depends on one
//!   concrete markup dialect.
//!
//! # Invariants
//! - Trees are derived state: recomputed from `Entry::memo` after every
//!   load and memo edit, never serialized into the container.

use serde::Serialize;

pub mod markdown;

/// Inline node inside a paragraph, heading or list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkupInline {
    Text { text: String },
    Code { text: String },
    Math { text: String, display: bool },
    Emphasis { children: Vec<MarkupInline> },
    Strong { children: Vec<MarkupInline> },
    Strike { children: Vec<MarkupInline> },
    HardBreak,
    Link { url: String, children: Vec<MarkupInline> },
    Image { url: String, alt: String },
}

/// Block-level node of a derived markup tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkupBlock {
    Paragraph {
        children: Vec<MarkupInline>,
    },
    Heading {
        level: u8,
        children: Vec<MarkupInline>,
    },
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    Quote {
        children: Vec<MarkupBlock>,
    },
    OrderedList {
        start: u64,
        items: Vec<MarkupListItem>,
    },
    UnorderedList {
        items: Vec<MarkupListItem>,
    },
    Rule,
}

/// List node: either a nested sublist or a leaf item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarkupListItem {
    Ordered {
        start: u64,
        items: Vec<MarkupListItem>,
    },
    Unordered {
        items: Vec<MarkupListItem>,
    },
    Item {
        /// Task-list checkbox state; `None` for plain items.
        checked: Option<bool>,
        children: Vec<MarkupInline>,
    },
}

/// External parser collaborator: memo text in, block tree out.
///
/// Implementations must be total; empty input yields an empty tree.
pub trait MarkupParser {
    fn parse(&self, text: &str) -> Vec<MarkupBlock>;
}
