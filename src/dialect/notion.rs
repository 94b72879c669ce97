//! The default dialect.

use super::Dialect;
use crate::model::UnknownBlock;
use html_escape::{decode_html_entities, encode_double_quoted_attribute};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

const UNKNOWN_PREFIX: &str = "<!-- NOTION_BLOCK: ";
const UNKNOWN_SUFFIX: &str = " -->";

static CALLOUT_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^<aside(?:\s+icon="([^"]*)")?\s*>$"#).unwrap());

/// Dialect with `<aside>` callouts, `<notion-columns>` layouts and
/// `ntn:<type>:<name>` front matter keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotionDialect;

impl NotionDialect {
    /// Create the dialect.
    pub fn new() -> Self {
        Self
    }
}

#[derive(Deserialize)]
struct EscapedBlock {
    #[serde(rename = "type")]
    kind: String,
    payload: String,
}

impl Dialect for NotionDialect {
    fn name(&self) -> &str {
        "notion"
    }

    fn toggle_marker(&self) -> &str {
        "[>]"
    }

    fn callout_open(&self, icon: Option<&str>) -> String {
        match icon {
            Some(icon) => format!("<aside icon=\"{}\">", encode_double_quoted_attribute(icon)),
            None => "<aside>".to_string(),
        }
    }

    fn parse_callout_open(&self, line: &str) -> Option<Option<String>> {
        let caps = CALLOUT_OPEN.captures(line)?;
        Some(
            caps.get(1)
                .map(|m| decode_html_entities(m.as_str()).into_owned()),
        )
    }

    fn callout_close(&self) -> &str {
        "</aside>"
    }

    fn column_list_open(&self) -> &str {
        "<notion-columns>"
    }

    fn column_list_close(&self) -> &str {
        "</notion-columns>"
    }

    fn column_open(&self) -> &str {
        "<notion-column>"
    }

    fn column_close(&self) -> &str {
        "</notion-column>"
    }

    fn encode_unknown(&self, block: &UnknownBlock) -> String {
        let body = serde_json::json!({
            "type": block.kind,
            "payload": block.payload,
        });
        format!("{}{}{}", UNKNOWN_PREFIX, body, UNKNOWN_SUFFIX)
    }

    fn decode_unknown(&self, line: &str) -> Option<UnknownBlock> {
        let body = line
            .strip_prefix(UNKNOWN_PREFIX)?
            .strip_suffix(UNKNOWN_SUFFIX)?;
        match serde_json::from_str::<EscapedBlock>(body) {
            Ok(escaped) => Some(UnknownBlock {
                kind: escaped.kind,
                payload: escaped.payload,
            }),
            Err(e) => {
                log::warn!("Ignoring malformed unknown-block escape: {}", e);
                None
            }
        }
    }

    fn front_matter_prefix(&self) -> &str {
        "ntn:"
    }
}
