//! Document tree model.
//!
//! This module defines the clean, content-only representation of a page
//! that sits between snapshots and markup text. The normalizer produces it,
//! the renderer consumes it, and the parser produces it again.

mod block;
mod page;
mod property;
mod rich_text;
mod table;

pub use block::{Block, CodeBlock, Column, TextBlock, UnknownBlock};
pub use page::Page;
pub use property::{DateValue, FileRef, Properties, PropertyValue};
pub use rich_text::{DateMention, InlineContent, Mention, RichText, TextRun, TextStyle};
pub use table::{Alignment, Table, TableRow};
