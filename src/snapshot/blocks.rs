//! Block tree normalization.

use super::rich_text::{plain_text, rich_text, str_at};
use crate::error::{Error, Result};
use crate::model::{
    Block, CodeBlock, Column, Mention, RichText, Table, TableRow, TextBlock, UnknownBlock,
};
use serde_json::Value;

/// Service bookkeeping fields that never carry content.
const BOOKKEEPING: &[&str] = &[
    "id",
    "object",
    "parent",
    "created_time",
    "last_edited_time",
    "created_by",
    "last_edited_by",
    "has_children",
    "archived",
    "in_trash",
    "request_id",
];

/// Normalize a sequence of snapshot block nodes.
pub(crate) fn blocks(nodes: &[Value]) -> Result<Vec<Block>> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        out.extend(block(node)?);
    }
    Ok(out)
}

/// Normalize one node. Grouping wrappers expand to several blocks.
fn block(node: &Value) -> Result<Vec<Block>> {
    let kind = node
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::malformed("block has no type tag"))?;

    let single = match kind {
        "bulleted_list" | "numbered_list" => {
            log::debug!("Flattening '{}' grouping wrapper", kind);
            return blocks(&children_of(node, kind));
        }
        "paragraph" => Block::Paragraph(text_block(node, kind)?),
        "bulleted_list_item" => Block::BulletItem(text_block(node, kind)?),
        "numbered_list_item" => Block::NumberedItem(text_block(node, kind)?),
        "toggle" => Block::Toggle(text_block(node, kind)?),
        "quote" => Block::Quote(text_block(node, kind)?),
        "heading_1" | "heading_2" | "heading_3" => {
            let content = content(node, kind)?;
            Block::Heading {
                level: kind.as_bytes()[kind.len() - 1] - b'0',
                is_toggle: content
                    .get("is_toggleable")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                text: rich_text(content.get("rich_text")),
                children: blocks(&children_of(node, kind))?,
            }
        }
        "to_do" => {
            let content = content(node, kind)?;
            Block::Todo {
                checked: content
                    .get("checked")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                text: rich_text(content.get("rich_text")),
                children: blocks(&children_of(node, kind))?,
            }
        }
        "callout" => {
            let content = content(node, kind)?;
            Block::Callout {
                icon: content.get("icon").and_then(icon),
                text: rich_text(content.get("rich_text")),
                children: blocks(&children_of(node, kind))?,
            }
        }
        "code" => {
            let content = content(node, kind)?;
            Block::Code(CodeBlock::new(
                str_at(content, &["language"]).unwrap_or(CodeBlock::PLAIN_TEXT),
                plain_text(content.get("rich_text")),
            ))
        }
        "divider" => Block::Divider,
        "table" => Block::Table(table(node)?),
        "column_list" => Block::ColumnList {
            columns: columns(node)?,
        },
        "link_to_page" => match link_target(content(node, kind)?) {
            Some(mention) => Block::paragraph(RichText::new().with_mention(mention)),
            None => unknown(node, kind)?,
        },
        "column" => {
            log::warn!("Column block outside a column list, wrapping it in one");
            Block::ColumnList {
                columns: vec![Column::new(blocks(&children_of(node, kind))?)],
            }
        }
        other => {
            log::warn!("Unrecognized block kind '{}', preserving it opaquely", other);
            unknown(node, other)?
        }
    };

    Ok(vec![single])
}

fn unknown(node: &Value, kind: &str) -> Result<Block> {
    Ok(Block::Unknown(UnknownBlock {
        kind: kind.to_string(),
        payload: serde_json::to_string(&strip_bookkeeping(node))?,
    }))
}

/// A link to a page or database reads as a paragraph holding the mention.
fn link_target(content: &Value) -> Option<Mention> {
    match content.get("type").and_then(Value::as_str)? {
        "page_id" => Some(Mention::Page {
            id: str_at(content, &["page_id"])?.to_string(),
        }),
        "database_id" => Some(Mention::Database {
            id: str_at(content, &["database_id"])?.to_string(),
        }),
        _ => None,
    }
}

/// The type-keyed content object every known kind requires.
fn content<'a>(node: &'a Value, kind: &str) -> Result<&'a Value> {
    node.get(kind)
        .filter(|v| v.is_object())
        .ok_or_else(|| Error::malformed(format!("{} block has no '{}' content", kind, kind)))
}

fn text_block(node: &Value, kind: &str) -> Result<TextBlock> {
    let content = content(node, kind)?;
    Ok(TextBlock {
        text: rich_text(content.get("rich_text")),
        children: blocks(&children_of(node, kind))?,
    })
}

/// Children may sit at `node.children` or `node.<kind>.children`; both are read.
fn children_of(node: &Value, kind: &str) -> Vec<Value> {
    let top = node.get("children").and_then(Value::as_array);
    let nested = node
        .get(kind)
        .and_then(|c| c.get("children"))
        .and_then(Value::as_array);
    top.into_iter()
        .chain(nested)
        .flatten()
        .cloned()
        .collect()
}

fn has_children(node: &Value, kind: &str) -> bool {
    node.get("children").map_or(false, Value::is_array)
        || node
            .get(kind)
            .and_then(|c| c.get("children"))
            .map_or(false, Value::is_array)
}

fn icon(value: &Value) -> Option<String> {
    let token = match value.get("type").and_then(Value::as_str)? {
        "emoji" => str_at(value, &["emoji"]),
        "external" => str_at(value, &["external", "url"]),
        "file" => str_at(value, &["file", "url"]),
        "custom_emoji" => str_at(value, &["custom_emoji", "url"])
            .or_else(|| str_at(value, &["custom_emoji", "name"])),
        _ => None,
    };
    token.map(str::to_string)
}

fn table(node: &Value) -> Result<Table> {
    let content = content(node, "table")?;
    let rows = children_of(node, "table");
    if rows.is_empty() {
        return Err(Error::malformed("table block has no rows"));
    }

    let mut table = Table::new();
    table.has_header_row = content
        .get("has_column_header")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    for row in &rows {
        let cells = row
            .get("table_row")
            .and_then(|r| r.get("cells"))
            .and_then(Value::as_array)
            .ok_or_else(|| Error::malformed("table row has no cells"))?;
        table.add_row(TableRow::new(
            cells.iter().map(|cell| rich_text(Some(cell))).collect(),
        ));
    }

    Ok(table)
}

fn columns(node: &Value) -> Result<Vec<Column>> {
    if !has_children(node, "column_list") {
        return Err(Error::malformed("column_list block has no columns"));
    }

    let mut columns = Vec::new();
    for child in children_of(node, "column_list") {
        match child.get("type").and_then(Value::as_str) {
            Some("column") => columns.push(Column::new(blocks(&children_of(&child, "column"))?)),
            _ => {
                log::warn!("Non-column child in column list, giving it its own column");
                columns.push(Column::new(block(&child)?));
            }
        }
    }
    Ok(columns)
}

/// Drop bookkeeping fields from a node and from every nested child node.
fn strip_bookkeeping(node: &Value) -> Value {
    let Value::Object(map) = node else {
        return node.clone();
    };

    let kind = map.get("type").and_then(Value::as_str).unwrap_or_default();
    map.iter()
        .filter(|(key, _)| !BOOKKEEPING.contains(&key.as_str()))
        .map(|(key, value)| {
            let value = if key == "children" {
                strip_children(value)
            } else if key == kind {
                match value {
                    Value::Object(inner) => Value::Object(
                        inner
                            .iter()
                            .map(|(k, v)| {
                                let v = if k == "children" {
                                    strip_children(v)
                                } else {
                                    v.clone()
                                };
                                (k.clone(), v)
                            })
                            .collect(),
                    ),
                    other => other.clone(),
                }
            } else {
                value.clone()
            };
            (key.clone(), value)
        })
        .collect::<serde_json::Map<String, Value>>()
        .into()
}

fn strip_children(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(strip_bookkeeping).collect()),
        other => other.clone(),
    }
}
