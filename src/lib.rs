//! # ntnmark
//!
//! Conversion between Notion pages and an extended Markdown dialect.
//!
//! A raw page snapshot is normalized into a typed document tree, which can be
//! rendered to markup and parsed back. Properties travel as typed YAML front
//! matter; Notion-only blocks (toggles, callouts, columns, mentions, colours)
//! use a small set of extension tokens, and anything unrecognized is kept in an
//! escape token so it survives the round trip.
//!
//! ## Quick Start
//!
//! ```
//! use ntnmark::{from_markup, snapshot_to_markup, Snapshot};
//!
//! fn main() -> ntnmark::Result<()> {
//!     let snapshot = Snapshot::from_json(r#"{
//!         "properties": {"Name": {"type": "title", "title": [{"type": "text", "text": {"content": "Plan"}}]}},
//!         "children": [
//!             {"type": "to_do", "to_do": {"checked": false, "rich_text": [{"type": "text", "text": {"content": "Ship it"}}]}}
//!         ]
//!     }"#)?;
//!
//!     let markup = snapshot_to_markup(&snapshot)?;
//!     assert_eq!(markup, "---\nntn:title:Name: Plan\n---\n- [ ] Ship it\n");
//!
//!     let page = from_markup(&markup)?;
//!     assert_eq!(page.title(), Some("Plan"));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typed front matter**: `ntn:<type>:<name>` keys re-hydrate every property type
//! - **Stable round trip**: `parse(render(page))` reproduces the page tree
//! - **Pluggable dialects**: extension tokens come from a [`dialect::Dialect`]
//! - **Parallel normalization**: batches of snapshots are normalized with Rayon

pub mod dialect;
pub mod error;
pub mod ids;
pub mod inline;
pub mod model;
pub mod parser;
pub mod render;
pub mod snapshot;

// Re-export commonly used types
pub use dialect::{Dialect, DialectRegistry, NotionDialect};
pub use error::{Error, Result};
pub use ids::extract_page_id;
pub use model::{
    Alignment, Block, CodeBlock, Column, DateMention, DateValue, FileRef, InlineContent, Mention,
    Page, Properties, PropertyValue, RichText, Table, TableRow, TextBlock, TextRun, TextStyle,
    UnknownBlock,
};
pub use parser::{ErrorMode, MarkupParser, ParseOptions, ParseOutcome, ParseWarning};
pub use render::{JsonFormat, MarkupRenderer, RenderOptions};
pub use snapshot::{normalize_batch, Snapshot};

use std::sync::Arc;

/// Normalize a raw page snapshot into a page tree.
///
/// # Example
///
/// ```
/// use ntnmark::{normalize, Block, Snapshot};
///
/// let snapshot = Snapshot::from_json(r#"[{"type": "divider", "divider": {}}]"#).unwrap();
/// let page = normalize(&snapshot).unwrap();
/// assert_eq!(page.children, vec![Block::Divider]);
/// ```
pub fn normalize(snapshot: &Snapshot) -> Result<Page> {
    snapshot::normalize(snapshot)
}

/// Render a page to markup with default options.
///
/// # Example
///
/// ```
/// use ntnmark::{to_markup, Block, Page, Properties};
///
/// let page = Page::with_content(Properties::new(), vec![Block::heading(2, "Notes")]);
/// assert_eq!(to_markup(&page).unwrap(), "## Notes\n");
/// ```
pub fn to_markup(page: &Page) -> Result<String> {
    render::to_markup(page, &RenderOptions::default())
}

/// Parse markup into a page with default (strict) options.
///
/// # Example
///
/// ```
/// use ntnmark::{from_markup, Block};
///
/// let page = from_markup("- [>] Details\n    hidden\n").unwrap();
/// assert_eq!(
///     page.children,
///     vec![Block::toggle("Details").with_children(vec![Block::paragraph("hidden")])]
/// );
/// ```
pub fn from_markup(text: &str) -> Result<Page> {
    parser::from_markup(text, &ParseOptions::default())
}

/// Normalize a snapshot and render it to markup in one step.
pub fn snapshot_to_markup(snapshot: &Snapshot) -> Result<String> {
    let page = normalize(snapshot)?;
    to_markup(&page)
}

/// Builder for converting between snapshots, pages and markup.
///
/// # Example
///
/// ```
/// use ntnmark::{Block, Converter, Page, Properties};
///
/// let converter = Converter::new().with_indent_width(2).lenient();
/// let page = Page::with_content(
///     Properties::new(),
///     vec![Block::bullet("a").with_children(vec![Block::bullet("b")])],
/// );
///
/// let markup = converter.render(&page)?;
/// assert_eq!(markup, "- a\n  - b\n");
/// assert_eq!(converter.parse(&markup)?, page);
/// # Ok::<(), ntnmark::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Converter {
    /// Create a new converter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `dialect` for both rendering and parsing.
    pub fn with_dialect(mut self, dialect: Arc<dyn Dialect>) -> Self {
        self.parse_options = self.parse_options.with_dialect(dialect.clone());
        self.render_options = self.render_options.with_dialect(dialect);
        self
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Include or omit front matter in rendered output.
    pub fn with_front_matter(mut self, include: bool) -> Self {
        self.render_options = self.render_options.with_front_matter(include);
        self
    }

    /// Set the rendered indent width.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.render_options = self.render_options.with_indent_width(width);
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Replace the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Get the render options.
    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    /// Get the parse options.
    pub fn parse_options(&self) -> &ParseOptions {
        &self.parse_options
    }

    /// Normalize a snapshot into a page tree.
    pub fn normalize(&self, snapshot: &Snapshot) -> Result<Page> {
        snapshot::normalize(snapshot)
    }

    /// Render a page to markup.
    pub fn render(&self, page: &Page) -> Result<String> {
        render::to_markup(page, &self.render_options)
    }

    /// Render a page to JSON.
    pub fn render_json(&self, page: &Page, format: JsonFormat) -> Result<String> {
        render::to_json(page, format)
    }

    /// Parse markup into a page.
    pub fn parse(&self, text: &str) -> Result<Page> {
        parser::from_markup(text, &self.parse_options)
    }

    /// Parse markup, keeping the warnings raised along the way.
    pub fn parse_with_warnings(&self, text: &str) -> Result<ParseOutcome> {
        MarkupParser::new(self.parse_options.clone()).parse(text)
    }

    /// Normalize a snapshot and render it to markup.
    pub fn convert(&self, snapshot: &Snapshot) -> Result<String> {
        let page = self.normalize(snapshot)?;
        self.render(&page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converter_builder() {
        let converter = Converter::new()
            .lenient()
            .with_front_matter(false)
            .with_indent_width(2);

        assert_eq!(converter.parse_options().error_mode, ErrorMode::Lenient);
        assert!(!converter.render_options().include_front_matter);
        assert_eq!(converter.render_options().indent_width, 2);
    }

    #[test]
    fn test_converter_shares_dialect() {
        let dialect: Arc<dyn Dialect> = Arc::new(NotionDialect::new());
        let converter = Converter::new().with_dialect(dialect);
        assert_eq!(converter.render_options().dialect.name(), "notion");
        assert_eq!(converter.parse_options().dialect.name(), "notion");
    }

    #[test]
    fn test_convert_chain() {
        let snapshot = Snapshot::from_json(
            r#"{"properties": {}, "children": [
                {"type": "heading_1", "heading_1": {"rich_text": [{"type": "text", "text": {"content": "Hi"}}]}}
            ]}"#,
        )
        .unwrap();

        let converter = Converter::new();
        assert_eq!(converter.convert(&snapshot).unwrap(), "# Hi\n");
        assert_eq!(snapshot_to_markup(&snapshot).unwrap(), "# Hi\n");
    }

    #[test]
    fn test_lenient_parse_with_warnings() {
        let outcome = Converter::new()
            .lenient()
            .parse_with_warnings("---\nntn:number:Score: lots\n---\ntext\n")
            .unwrap();
        assert!(outcome.page.properties.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_strict_parse_error() {
        let err = from_markup("---\nntn:number:Score: lots\n---\ntext\n").unwrap_err();
        assert!(matches!(err, Error::UnparsableFrontMatter { .. }));
    }
}
