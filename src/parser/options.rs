//! Parsing options and configuration.

use crate::dialect::{default_dialect, Dialect};
use std::sync::Arc;

/// Options for parsing markup into a page.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Dialect used to recognize extended block tokens
    pub dialect: Arc<dyn Dialect>,

    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Columns a tab counts for when measuring indentation
    pub tab_width: usize,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dialect.
    pub fn with_dialect(mut self, dialect: Arc<dyn Dialect>) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (record front matter failures as warnings).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the tab width. Zero is raised to one.
    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width.max(1);
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            error_mode: ErrorMode::Strict,
            tab_width: 4,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Report front matter failures as errors
    #[default]
    Strict,
    /// Drop undecodable front matter and continue
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new().lenient().with_tab_width(0);

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.tab_width, 1);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.tab_width, 4);
        assert_eq!(options.dialect.name(), "notion");
    }
}
