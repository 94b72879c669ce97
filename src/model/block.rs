//! Block-level types.

use super::{RichText, Table};
use serde::{Deserialize, Serialize};

/// A structural unit of page content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text
    Paragraph(TextBlock),

    /// A heading, optionally collapsible
    Heading {
        /// Heading level (1-3)
        level: u8,
        /// Whether the heading folds its children
        is_toggle: bool,
        /// Heading text
        text: RichText,
        /// Nested blocks
        #[serde(default)]
        children: Vec<Block>,
    },

    /// A bulleted list item
    BulletItem(TextBlock),

    /// A numbered list item
    NumberedItem(TextBlock),

    /// A to-do item
    Todo {
        /// Whether the item is ticked
        checked: bool,
        /// Item text
        text: RichText,
        /// Nested blocks
        #[serde(default)]
        children: Vec<Block>,
    },

    /// A collapsible toggle item
    Toggle(TextBlock),

    /// A block quote
    Quote(TextBlock),

    /// A code block
    Code(CodeBlock),

    /// A horizontal divider
    Divider,

    /// A table
    Table(Table),

    /// A callout box
    Callout {
        /// Emoji or icon token
        icon: Option<String>,
        /// Callout text
        text: RichText,
        /// Nested blocks
        #[serde(default)]
        children: Vec<Block>,
    },

    /// A multi-column layout
    ColumnList {
        /// Columns, left to right
        columns: Vec<Column>,
    },

    /// A block of a kind outside the known set
    Unknown(UnknownBlock),
}

impl Block {
    /// Create a paragraph block.
    pub fn paragraph(text: impl Into<RichText>) -> Self {
        Block::Paragraph(TextBlock::new(text))
    }

    /// Create an empty paragraph.
    pub fn empty_paragraph() -> Self {
        Block::Paragraph(TextBlock::default())
    }

    /// Create a heading block. The level is clamped to 1-3.
    pub fn heading(level: u8, text: impl Into<RichText>) -> Self {
        Block::Heading {
            level: level.clamp(1, 3),
            is_toggle: false,
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Create a bulleted list item.
    pub fn bullet(text: impl Into<RichText>) -> Self {
        Block::BulletItem(TextBlock::new(text))
    }

    /// Create a numbered list item.
    pub fn numbered(text: impl Into<RichText>) -> Self {
        Block::NumberedItem(TextBlock::new(text))
    }

    /// Create a to-do item.
    pub fn todo(checked: bool, text: impl Into<RichText>) -> Self {
        Block::Todo {
            checked,
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Create a toggle item.
    pub fn toggle(text: impl Into<RichText>) -> Self {
        Block::Toggle(TextBlock::new(text))
    }

    /// Create a quote block.
    pub fn quote(text: impl Into<RichText>) -> Self {
        Block::Quote(TextBlock::new(text))
    }

    /// Create a code block.
    pub fn code(language: impl Into<String>, body: impl Into<String>) -> Self {
        Block::Code(CodeBlock::new(language, body))
    }

    /// Create a callout block.
    pub fn callout(icon: Option<String>, text: impl Into<RichText>) -> Self {
        Block::Callout {
            icon,
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Create an unknown block preserving `kind` and `payload`.
    pub fn unknown(kind: impl Into<String>, payload: impl Into<String>) -> Self {
        Block::Unknown(UnknownBlock {
            kind: kind.into(),
            payload: payload.into(),
        })
    }

    /// Attach children and return self. Blocks that cannot nest are returned unchanged.
    pub fn with_children(mut self, blocks: Vec<Block>) -> Self {
        if let Some(children) = self.children_mut() {
            *children = blocks;
        }
        self
    }

    /// The block's own line of rich text, if it has one.
    pub fn text(&self) -> Option<&RichText> {
        match self {
            Block::Paragraph(b)
            | Block::BulletItem(b)
            | Block::NumberedItem(b)
            | Block::Toggle(b)
            | Block::Quote(b) => Some(&b.text),
            Block::Heading { text, .. } | Block::Todo { text, .. } | Block::Callout { text, .. } => {
                Some(text)
            }
            _ => None,
        }
    }

    /// Nested child blocks. Column layouts expose no direct children.
    pub fn children(&self) -> &[Block] {
        match self {
            Block::Paragraph(b)
            | Block::BulletItem(b)
            | Block::NumberedItem(b)
            | Block::Toggle(b)
            | Block::Quote(b) => &b.children,
            Block::Heading { children, .. }
            | Block::Todo { children, .. }
            | Block::Callout { children, .. } => children,
            _ => &[],
        }
    }

    /// Mutable access to nested children for blocks that can nest.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Block::Paragraph(b)
            | Block::BulletItem(b)
            | Block::NumberedItem(b)
            | Block::Toggle(b)
            | Block::Quote(b) => Some(&mut b.children),
            Block::Heading { children, .. }
            | Block::Todo { children, .. }
            | Block::Callout { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Check if this block is a numbered list item.
    pub fn is_numbered(&self) -> bool {
        matches!(self, Block::NumberedItem(_))
    }

    /// Check if this block is an unknown block.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Block::Unknown(_))
    }

    /// Get plain text content of the block and its descendants.
    pub fn plain_text(&self) -> String {
        let own = match self {
            Block::Code(code) => code.body.clone(),
            Block::Table(table) => table.plain_text(),
            Block::ColumnList { columns } => columns
                .iter()
                .map(|c| blocks_plain_text(&c.children))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Divider | Block::Unknown(_) => String::new(),
            _ => self.text().map(|t| t.plain_text()).unwrap_or_default(),
        };

        let nested = blocks_plain_text(self.children());
        match (own.is_empty(), nested.is_empty()) {
            (_, true) => own,
            (true, false) => nested,
            (false, false) => format!("{}\n{}", own, nested),
        }
    }
}

pub(crate) fn blocks_plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::plain_text)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rich text line plus nested children, shared by most block kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// The block's own text
    pub text: RichText,

    /// Nested blocks
    #[serde(default)]
    pub children: Vec<Block>,
}

impl TextBlock {
    /// Create a text block without children.
    pub fn new(text: impl Into<RichText>) -> Self {
        Self {
            text: text.into(),
            children: Vec::new(),
        }
    }
}

/// A fenced code block. The body is plain text, never rich text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Language token (`plain text` when unspecified)
    pub language: String,

    /// Source text, newlines preserved
    pub body: String,
}

impl CodeBlock {
    /// Language token used when a code block declares none.
    pub const PLAIN_TEXT: &'static str = "plain text";

    /// Create a new code block.
    pub fn new(language: impl Into<String>, body: impl Into<String>) -> Self {
        let language = language.into();
        Self {
            language: if language.trim().is_empty() {
                Self::PLAIN_TEXT.to_string()
            } else {
                language
            },
            body: body.into(),
        }
    }

    /// Check if the block carries no language.
    pub fn is_plain_text(&self) -> bool {
        self.language == Self::PLAIN_TEXT
    }
}

/// One column of a multi-column layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Blocks in this column
    pub children: Vec<Block>,
}

impl Column {
    /// Create a column from blocks.
    pub fn new(children: Vec<Block>) -> Self {
        Self { children }
    }
}

/// A block of unrecognized kind, carried opaquely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownBlock {
    /// Original block kind name
    pub kind: String,

    /// Structurally faithful serialization of the original fields
    pub payload: String,
}
