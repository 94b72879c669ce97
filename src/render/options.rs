//! Rendering options and configuration.

use crate::dialect::{default_dialect, Dialect};
use std::sync::Arc;

/// Options for rendering a page to markup.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Dialect used for extended block tokens
    pub dialect: Arc<dyn Dialect>,

    /// Spaces per nesting level
    pub indent_width: usize,

    /// Emit the front matter block when the page has properties
    pub include_front_matter: bool,

    /// Character to use for bulleted list markers (`-`, `*` or `+`)
    pub list_marker: char,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dialect.
    pub fn with_dialect(mut self, dialect: Arc<dyn Dialect>) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the indent width. Zero is raised to one.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width.max(1);
        self
    }

    /// Enable or disable front matter.
    pub fn with_front_matter(mut self, include: bool) -> Self {
        self.include_front_matter = include;
        self
    }

    /// Set the list marker character. Anything but `-`, `*` or `+` is ignored.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        if matches!(marker, '-' | '*' | '+') {
            self.list_marker = marker;
        }
        self
    }

    /// Indentation string for a nesting depth.
    pub(crate) fn indent(&self, depth: usize) -> String {
        " ".repeat(self.indent_width * depth)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            indent_width: 4,
            include_front_matter: true,
            list_marker: '-',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert_eq!(options.indent_width, 4);
        assert!(options.include_front_matter);
        assert_eq!(options.list_marker, '-');
        assert_eq!(options.dialect.name(), "notion");
    }

    #[test]
    fn test_builder_pattern() {
        let options = RenderOptions::new()
            .with_indent_width(2)
            .with_front_matter(false)
            .with_list_marker('*');

        assert_eq!(options.indent(3), "      ");
        assert!(!options.include_front_matter);
        assert_eq!(options.list_marker, '*');
    }

    #[test]
    fn test_invalid_values_ignored() {
        let options = RenderOptions::new()
            .with_indent_width(0)
            .with_list_marker('•');
        assert_eq!(options.indent_width, 1);
        assert_eq!(options.list_marker, '-');
    }
}
