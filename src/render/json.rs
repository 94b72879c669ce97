//! JSON rendering for pages.

use crate::error::{Error, Result};
use crate::model::Page;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a page to JSON, the interchange shape for page creation.
pub fn to_json(page: &Page, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(page),
        JsonFormat::Compact => serde_json::to_string(page),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Read a page back from its JSON form.
pub fn from_json(json: &str) -> Result<Page> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Properties, PropertyValue};

    fn sample() -> Page {
        Page::with_content(
            Properties::new().with("Name", PropertyValue::Title("Test".into())),
            vec![Block::paragraph("Hello"), Block::Divider],
        )
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"Name\""));
        assert!(json.contains("Test"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_json_roundtrip() {
        let page = sample();
        let json = to_json(&page, JsonFormat::Compact).unwrap();
        assert_eq!(from_json(&json).unwrap(), page);
    }
}
