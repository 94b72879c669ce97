//! Snapshot normalization.
//!
//! A snapshot is the raw page tree returned by the hosted service: the same
//! block and property shapes as a [`Page`], plus identifiers, timestamps and
//! bookkeeping at every node. Normalizing keeps content, formatting and typed
//! properties and discards everything else.
//!
//! # Example
//!
//! ```
//! use ntnmark::snapshot::{normalize, Snapshot};
//!
//! let snapshot = Snapshot::from_json(r#"[
//!     {"object": "block", "id": "1", "type": "paragraph",
//!      "paragraph": {"rich_text": [{"type": "text", "text": {"content": "Hi"}}]}}
//! ]"#).unwrap();
//!
//! let page = normalize(&snapshot).unwrap();
//! assert_eq!(page.plain_text(), "Hi");
//! ```

mod blocks;
mod properties;
mod rich_text;

use crate::error::{Error, Result};
use crate::model::{Page, Properties};
use rayon::prelude::*;
use serde_json::Value;

/// A raw service snapshot. Read-only input to [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    root: Value,
}

impl Snapshot {
    /// Wrap an already-parsed JSON value.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parse snapshot JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self::from_value(serde_json::from_str(text)?))
    }

    /// Parse snapshot JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_value(serde_json::from_slice(bytes)?))
    }

    /// The underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.root
    }
}

impl From<Value> for Snapshot {
    fn from(root: Value) -> Self {
        Self::from_value(root)
    }
}

/// Normalize a snapshot into a page.
///
/// The root may be a page object (`properties` plus `children`), a block
/// list response (`results`), or a bare array of blocks.
pub fn normalize(snapshot: &Snapshot) -> Result<Page> {
    match &snapshot.root {
        Value::Array(nodes) => Ok(Page::with_content(
            Properties::new(),
            blocks::blocks(nodes)?,
        )),
        Value::Object(map) => {
            let properties = match map.get("properties") {
                Some(Value::Object(collection)) => properties::properties(collection)?,
                Some(Value::Null) | None => Properties::new(),
                Some(other) => {
                    return Err(Error::malformed(format!(
                        "page properties should be an object, found {}",
                        other
                    )))
                }
            };

            let nodes = map
                .get("children")
                .or_else(|| map.get("results"))
                .map(|v| {
                    v.as_array()
                        .ok_or_else(|| Error::malformed("page children should be an array"))
                })
                .transpose()?;

            let children = match nodes {
                Some(nodes) => blocks::blocks(nodes)?,
                None => Vec::new(),
            };

            Ok(Page::with_content(properties, children))
        }
        other => Err(Error::malformed(format!(
            "snapshot root should be a page object or a block array, found {}",
            other
        ))),
    }
}

/// Normalize many snapshots in parallel. Results keep the input order.
pub fn normalize_batch(snapshots: &[Snapshot]) -> Vec<Result<Page>> {
    snapshots.par_iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, PropertyValue};
    use serde_json::json;

    fn paragraph(text: &str) -> Value {
        json!({"object": "block", "type": "paragraph",
               "paragraph": {"rich_text": [{"type": "text", "text": {"content": text}}]}})
    }

    #[test]
    fn test_page_object() {
        let snapshot = Snapshot::from_value(json!({
            "object": "page",
            "id": "abc",
            "created_time": "2024-01-01T00:00:00.000Z",
            "properties": {
                "title": {"id": "title", "type": "title",
                          "title": [{"type": "text", "text": {"content": "Doc"}, "plain_text": "Doc"}]}
            },
            "children": [paragraph("Body")]
        }));

        let page = normalize(&snapshot).unwrap();
        assert_eq!(page.title(), Some("Doc"));
        assert_eq!(
            page.properties.get("title"),
            Some(&PropertyValue::Title("Doc".into()))
        );
        assert_eq!(page.children, vec![Block::paragraph("Body")]);
    }

    #[test]
    fn test_bare_block_array() {
        let snapshot = Snapshot::from_value(json!([paragraph("a"), paragraph("b")]));
        let page = normalize(&snapshot).unwrap();
        assert!(page.properties.is_empty());
        assert_eq!(page.block_count(), 2);
    }

    #[test]
    fn test_list_response() {
        let snapshot = Snapshot::from_value(json!({
            "object": "list", "results": [paragraph("r")], "has_more": false
        }));
        assert_eq!(normalize(&snapshot).unwrap().block_count(), 1);
    }

    #[test]
    fn test_invalid_roots() {
        assert!(matches!(
            normalize(&Snapshot::from_value(json!("text"))),
            Err(Error::MalformedSnapshot(_))
        ));
        assert!(matches!(
            normalize(&Snapshot::from_value(json!({"children": {}}))),
            Err(Error::MalformedSnapshot(_))
        ));
        assert!(matches!(Snapshot::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_normalize_batch_keeps_order() {
        let snapshots: Vec<Snapshot> = (0..20)
            .map(|i| Snapshot::from_value(json!([paragraph(&format!("p{}", i))])))
            .chain(std::iter::once(Snapshot::from_value(json!(42))))
            .collect();

        let results = normalize_batch(&snapshots);
        assert_eq!(results.len(), 21);
        for (i, result) in results.iter().take(20).enumerate() {
            assert_eq!(result.as_ref().unwrap().plain_text(), format!("p{}", i));
        }
        assert!(results[20].is_err());
    }
}
