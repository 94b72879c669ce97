//! Extended-markup dialects.
//!
//! A dialect decides how the block-level extensions of the markup are spelled:
//! toggle markers, callout and column containers, the escape token for unknown
//! blocks, and the front matter key convention. The renderer and the parser
//! both receive a dialect through their options, so a different spelling can be
//! substituted at call time without touching the document model.
//!
//! # Example
//!
//! ```
//! use ntnmark::dialect::DialectRegistry;
//!
//! let registry = DialectRegistry::with_defaults();
//! let dialect = registry.get("notion").unwrap();
//! assert_eq!(dialect.property_key("select", "Status"), "ntn:select:Status");
//! ```

mod notion;

pub use notion::NotionDialect;

use crate::model::UnknownBlock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A line that closes the open block scopes without producing a block.
///
/// Emitted between siblings that would otherwise read back as one block or as
/// parent and child.
pub(crate) const BLOCK_BREAK: &str = "<!-- -->";

/// How block-level extended tokens are rendered and recognized.
///
/// Implementations must be consistent: everything a dialect renders, the same
/// dialect must recognize.
pub trait Dialect: Send + Sync + fmt::Debug {
    /// Get the name of this dialect.
    fn name(&self) -> &str;

    /// Marker placed between a list or heading prefix and the text of a toggle.
    fn toggle_marker(&self) -> &str;

    /// Opening line of a callout container.
    fn callout_open(&self, icon: Option<&str>) -> String;

    /// Recognize a callout opener, returning its icon (if any).
    fn parse_callout_open(&self, line: &str) -> Option<Option<String>>;

    /// Closing line of a callout container.
    fn callout_close(&self) -> &str;

    /// Opening line of a multi-column layout.
    fn column_list_open(&self) -> &str;

    /// Closing line of a multi-column layout.
    fn column_list_close(&self) -> &str;

    /// Opening line of a single column.
    fn column_open(&self) -> &str;

    /// Closing line of a single column.
    fn column_close(&self) -> &str;

    /// Render an unknown block as a single escape line.
    fn encode_unknown(&self, block: &UnknownBlock) -> String;

    /// Recognize an unknown-block escape line.
    fn decode_unknown(&self, line: &str) -> Option<UnknownBlock>;

    /// Prefix shared by all front matter keys this dialect emits.
    fn front_matter_prefix(&self) -> &str;

    /// Check if `line` opens with a front matter key, bare or YAML-quoted.
    fn starts_key_line(&self, line: &str) -> bool {
        let unquoted = line
            .strip_prefix('\'')
            .or_else(|| line.strip_prefix('"'))
            .unwrap_or(line);
        unquoted.starts_with(self.front_matter_prefix())
    }

    /// Front matter key for a property of type `tag` named `name`.
    fn property_key(&self, tag: &str, name: &str) -> String {
        format!("{}{}:{}", self.front_matter_prefix(), tag, name)
    }

    /// Split a front matter key into `(type tag, property name)`.
    ///
    /// The property name may itself contain the separator; only the first
    /// one after the type tag splits.
    fn parse_property_key<'a>(&self, key: &'a str) -> Option<(&'a str, &'a str)> {
        let rest = key.strip_prefix(self.front_matter_prefix())?;
        let (tag, name) = rest.split_once(':')?;
        if tag.is_empty() {
            return None;
        }
        Some((tag, name))
    }
}

/// Registry for markup dialects, keyed by lowercase name.
pub struct DialectRegistry {
    by_name: HashMap<String, Arc<dyn Dialect>>,
}

impl DialectRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the built-in dialects.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(NotionDialect::new()));
        registry
    }

    /// Register a dialect, replacing any dialect of the same name.
    pub fn register(&mut self, dialect: Arc<dyn Dialect>) {
        self.by_name.insert(dialect.name().to_lowercase(), dialect);
    }

    /// Get a dialect by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Dialect>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if a dialect is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_lowercase())
    }

    /// Get all registered dialect names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// The dialect used when none is configured.
pub fn default_dialect() -> Arc<dyn Dialect> {
    Arc::new(NotionDialect::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_defaults() {
        let registry = DialectRegistry::with_defaults();
        assert!(registry.contains("notion"));
        assert!(registry.contains("Notion"));
        assert!(!registry.contains("gfm"));
        assert_eq!(registry.names(), vec!["notion"]);
    }

    #[test]
    fn test_registry_get() {
        let registry = DialectRegistry::with_defaults();
        let dialect = registry.get("NOTION");
        assert!(dialect.is_some());
        assert_eq!(dialect.unwrap().name(), "notion");
        assert!(DialectRegistry::new().get("notion").is_none());
    }

    #[test]
    fn test_property_key_roundtrip() {
        let dialect = NotionDialect::new();
        let key = dialect.property_key("date", "Due: soon");
        assert_eq!(key, "ntn:date:Due: soon");
        assert_eq!(dialect.parse_property_key(&key), Some(("date", "Due: soon")));
        assert_eq!(dialect.parse_property_key("title"), None);
        assert_eq!(dialect.parse_property_key("ntn::x"), None);
    }
}
