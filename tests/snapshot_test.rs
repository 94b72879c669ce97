//! Integration tests for snapshot normalization.

use ntnmark::{
    from_markup, normalize, normalize_batch, snapshot_to_markup, Block, Error, Mention, Page,
    PropertyValue, RichText, Snapshot, TextRun, TextStyle,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn text(content: &str) -> Value {
    json!([{"type": "text", "text": {"content": content, "link": null}, "plain_text": content,
            "annotations": {"bold": false, "italic": false, "strikethrough": false,
                            "underline": false, "code": false, "color": "default"}}])
}

fn full_snapshot() -> Snapshot {
    Snapshot::from_value(json!({
        "object": "page",
        "id": "0123456789abcdef0123456789abcdef",
        "properties": {
            "Name": {"id": "title", "type": "title", "title": text("Quarterly review")},
            "Stage": {"id": "s", "type": "status", "status": {"name": "Draft", "color": "gray"}},
            "Tags": {"id": "t", "type": "multi_select",
                     "multi_select": [{"name": "q3"}, {"name": "finance"}]},
            "Score": {"id": "n", "type": "number", "number": 7},
            "Due": {"id": "d", "type": "date", "date": null},
            "Formula": {"id": "f", "type": "formula", "formula": {"type": "number", "number": 1}}
        },
        "children": [
            {"object": "block", "id": "h", "type": "heading_1",
             "heading_1": {"rich_text": text("Summary"), "is_toggleable": false}},
            {"type": "paragraph", "paragraph": {"rich_text": [
                {"type": "text", "text": {"content": "Revenue is "}, "plain_text": "Revenue is "},
                {"type": "text", "text": {"content": "up"}, "plain_text": "up",
                 "annotations": {"bold": true, "color": "green"}},
                {"type": "text", "text": {"content": ""}, "plain_text": ""},
                {"type": "mention", "plain_text": "@Ada",
                 "mention": {"type": "user", "user": {"id": "u1", "name": "Ada"}}}
            ]}},
            {"type": "bulleted_list", "bulleted_list": {"children": [
                {"type": "bulleted_list_item", "bulleted_list_item": {"rich_text": text("one")}},
                {"type": "bulleted_list_item", "bulleted_list_item": {"rich_text": text("two")},
                 "children": [
                    {"type": "numbered_list_item", "numbered_list_item": {"rich_text": text("deep")}}
                 ]}
            ]}},
            {"type": "table", "table": {"table_width": 2, "has_column_header": true},
             "children": [
                {"type": "table_row", "table_row": {"cells": [text("Metric"), text("Value")]}},
                {"type": "table_row", "table_row": {"cells": [text("ARR"), text("1.2M")]}}
             ]},
            {"type": "callout", "callout": {"rich_text": text("Heads up"),
                                            "icon": {"type": "emoji", "emoji": "⚠️"}}},
            {"type": "code", "code": {"language": "python", "rich_text": [
                {"type": "text", "text": {"content": "print(1)\nprint(2)"},
                 "plain_text": "print(1)\nprint(2)"}
            ]}},
            {"type": "column_list", "column_list": {}, "children": [
                {"type": "column", "column": {}, "children": [
                    {"type": "quote", "quote": {"rich_text": text("left")}}]},
                {"type": "column", "column": {}, "children": [
                    {"type": "toggle", "toggle": {"rich_text": text("right")}}]}
            ]},
            {"object": "block", "id": "e", "type": "bookmark", "has_children": false,
             "bookmark": {"url": "https://example.com", "caption": []}},
            {"type": "divider", "divider": {}}
        ]
    }))
}

#[test]
fn test_normalize_full_page() {
    let page = normalize(&full_snapshot()).unwrap();

    assert_eq!(page.title(), Some("Quarterly review"));
    assert_eq!(
        page.properties.get("Stage"),
        Some(&PropertyValue::Status(Some("Draft".into())))
    );
    assert_eq!(
        page.properties.get("Score"),
        Some(&PropertyValue::Number(Some(7.0)))
    );
    assert_eq!(page.properties.get("Due"), Some(&PropertyValue::Date(None)));
    assert!(matches!(
        page.properties.get("Formula"),
        Some(PropertyValue::Unknown { kind, .. }) if kind == "formula"
    ));

    let paragraph = Block::paragraph(
        RichText::plain("Revenue is ")
            .with_run(TextRun::new("up").with_style(TextStyle {
                bold: true,
                color: Some("green".into()),
                ..Default::default()
            }))
            .with_mention(Mention::User {
                id: "u1".into(),
                name: Some("Ada".into()),
            }),
    );
    assert_eq!(page.children[0], Block::heading(1, "Summary"));
    assert_eq!(page.children[1], paragraph);
    assert_eq!(page.children[2], Block::bullet("one"));
    assert_eq!(
        page.children[3],
        Block::bullet("two").with_children(vec![Block::numbered("deep")])
    );
    assert_eq!(page.children[5], Block::callout(Some("⚠️".into()), "Heads up"));
    assert_eq!(page.children[6], Block::code("python", "print(1)\nprint(2)"));
    assert!(page.children[8].is_unknown());
    assert_eq!(page.children[9], Block::Divider);
    assert_eq!(page.block_count(), 10);
}

#[test]
fn test_snapshot_markup_roundtrip() {
    let page = normalize(&full_snapshot()).unwrap();
    let markup = snapshot_to_markup(&full_snapshot()).unwrap();

    assert!(markup.contains("<!-- NOTION_BLOCK: {\"type\":\"bookmark\""));
    assert_eq!(from_markup(&markup).unwrap(), page);
}

#[test]
fn test_link_to_page_renders_as_page_tag() {
    let snapshot = Snapshot::from_value(json!([
        {"type": "link_to_page", "link_to_page": {"type": "page_id", "page_id": "abc123"}},
        {"type": "link_to_page", "link_to_page": {"type": "database_id", "database_id": "db9"}}
    ]));

    let markup = snapshot_to_markup(&snapshot).unwrap();
    assert_eq!(
        markup,
        "<notion-page id=\"abc123\"></notion-page>\n<notion-database id=\"db9\"></notion-database>\n"
    );
    assert_eq!(from_markup(&markup).unwrap(), normalize(&snapshot).unwrap());
}

#[test]
fn test_malformed_table() {
    let snapshot = Snapshot::from_value(json!([
        {"type": "paragraph", "paragraph": {"rich_text": text("before")}},
        {"type": "table", "table": {"table_width": 2, "has_column_header": false}}
    ]));

    let err = normalize(&snapshot).unwrap_err();
    assert!(matches!(err, Error::MalformedSnapshot(_)), "got {:?}", err);
}

#[test]
fn test_malformed_property() {
    let snapshot = Snapshot::from_value(json!({
        "properties": {"Done": {"id": "c", "type": "checkbox"}},
        "children": []
    }));
    assert!(matches!(
        normalize(&snapshot),
        Err(Error::MalformedSnapshot(_))
    ));
}

#[test]
fn test_invalid_json_snapshot() {
    assert!(matches!(Snapshot::from_json("{not json"), Err(Error::Json(_))));
}

#[test]
fn test_batch_normalization() {
    let snapshots = vec![
        full_snapshot(),
        Snapshot::from_value(json!("not a page")),
        Snapshot::from_value(json!([])),
    ];

    let results = normalize_batch(&snapshots);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().title(), Some("Quarterly review"));
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap(), &Page::default());
}
