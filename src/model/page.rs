//! Page-level types.

use super::block::blocks_plain_text;
use super::{Block, Properties};
use serde::{Deserialize, Serialize};

/// A page: typed properties plus an ordered block tree.
///
/// Every conversion produces a fresh `Page`; nothing mutates a page across
/// pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page properties, in insertion order
    #[serde(default)]
    pub properties: Properties,

    /// Top-level content blocks
    #[serde(default)]
    pub children: Vec<Block>,
}

impl Page {
    /// Create a new empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a page from properties and blocks.
    pub fn with_content(properties: Properties, children: Vec<Block>) -> Self {
        Self {
            properties,
            children,
        }
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: Block) {
        self.children.push(block);
    }

    /// Page title, taken from the title property.
    pub fn title(&self) -> Option<&str> {
        self.properties.title()
    }

    /// Get plain text content of the page body.
    pub fn plain_text(&self) -> String {
        blocks_plain_text(&self.children)
    }

    /// Check if the page has neither properties nor blocks.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.children.is_empty()
    }

    /// Get the number of top-level blocks.
    pub fn block_count(&self) -> usize {
        self.children.len()
    }

    /// Count all blocks, including nested ones and column contents.
    pub fn total_block_count(&self) -> usize {
        fn count(blocks: &[Block]) -> usize {
            blocks
                .iter()
                .map(|b| {
                    let nested = match b {
                        Block::ColumnList { columns } => {
                            columns.iter().map(|c| count(&c.children)).sum()
                        }
                        _ => count(b.children()),
                    };
                    1 + nested
                })
                .sum()
        }
        count(&self.children)
    }
}
