//! Rich text items from snapshot JSON.

use crate::model::{DateMention, InlineContent, Mention, RichText, TextRun, TextStyle};
use serde_json::Value;

/// Convert a snapshot rich text array. Missing or non-array input yields empty text.
pub(crate) fn rich_text(items: Option<&Value>) -> RichText {
    let mut spans = Vec::new();
    for item in items.and_then(Value::as_array).into_iter().flatten() {
        if let Some(span) = rich_text_item(item) {
            spans.push(span);
        }
    }
    RichText(spans).normalized()
}

/// Concatenate the plain text of a snapshot rich text array.
///
/// Prefers each item's `plain_text`, which preserves newlines the structured
/// fields sometimes lose.
pub(crate) fn plain_text(items: Option<&Value>) -> String {
    items
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .map(|item| {
            str_at(item, &["plain_text"])
                .or_else(|| str_at(item, &["text", "content"]))
                .or_else(|| str_at(item, &["equation", "expression"]))
                .unwrap_or_default()
        })
        .collect()
}

fn rich_text_item(item: &Value) -> Option<InlineContent> {
    let style = annotations(item.get("annotations"));

    match item.get("type").and_then(Value::as_str) {
        Some("text") => {
            let text = str_at(item, &["text", "content"]).unwrap_or_default();
            let link = str_at(item, &["text", "link", "url"]).map(str::to_string);
            if text.is_empty() {
                return None;
            }
            Some(InlineContent::Text(TextRun {
                text: text.to_string(),
                style,
                link,
            }))
        }
        Some("equation") => Some(InlineContent::Mention(Mention::Equation {
            expression: str_at(item, &["equation", "expression"])
                .unwrap_or_default()
                .to_string(),
        })),
        Some("mention") => match mention(item) {
            Some(m) => Some(InlineContent::Mention(m)),
            None => fallback(item, style),
        },
        _ => fallback(item, style),
    }
}

fn mention(item: &Value) -> Option<Mention> {
    let mention = item.get("mention")?;
    match mention.get("type").and_then(Value::as_str)? {
        "user" => {
            let id = str_at(mention, &["user", "id"])?.to_string();
            let name = str_at(mention, &["user", "name"])
                .map(str::to_string)
                .or_else(|| {
                    str_at(item, &["plain_text"])
                        .map(|p| p.strip_prefix('@').unwrap_or(p).to_string())
                        .filter(|p| !p.is_empty())
                });
            Some(Mention::User { id, name })
        }
        "page" => Some(Mention::Page {
            id: str_at(mention, &["page", "id"])?.to_string(),
        }),
        "database" => Some(Mention::Database {
            id: str_at(mention, &["database", "id"])?.to_string(),
        }),
        "date" => Some(Mention::Date(DateMention {
            start: str_at(mention, &["date", "start"])?.to_string(),
            end: str_at(mention, &["date", "end"]).map(str::to_string),
            timezone: str_at(mention, &["date", "time_zone"]).map(str::to_string),
        })),
        other => {
            log::debug!("Mention type '{}' kept as literal text", other);
            None
        }
    }
}

/// Unsupported items degrade to their plain text.
fn fallback(item: &Value, style: TextStyle) -> Option<InlineContent> {
    let text = str_at(item, &["plain_text"])
        .or_else(|| str_at(item, &["text", "content"]))
        .filter(|t| !t.is_empty())?;
    Some(InlineContent::Text(TextRun {
        text: text.to_string(),
        style,
        link: str_at(item, &["href"]).map(str::to_string),
    }))
}

fn annotations(value: Option<&Value>) -> TextStyle {
    let Some(value) = value else {
        return TextStyle::default();
    };
    let flag = |key: &str| value.get(key).and_then(Value::as_bool).unwrap_or(false);

    if flag("code") {
        return TextStyle {
            code: true,
            ..Default::default()
        };
    }

    TextStyle {
        bold: flag("bold"),
        italic: flag("italic"),
        strikethrough: flag("strikethrough"),
        underline: flag("underline"),
        code: false,
        color: value
            .get("color")
            .and_then(Value::as_str)
            .filter(|c| *c != "default")
            .map(str::to_string),
    }
}

/// Follow a path of object keys to a string value.
pub(crate) fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |v, key| v.get(*key))
        .and_then(Value::as_str)
}
