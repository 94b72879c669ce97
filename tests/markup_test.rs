//! Integration tests for markup rendering and parsing.

use ntnmark::render::list_label;
use ntnmark::{
    from_markup, to_markup, Alignment, Block, Converter, DateMention, Error, MarkupParser,
    Mention, Page, ParseOptions, Properties, PropertyValue, RichText, Table, TableRow, TextRun,
};
use pretty_assertions::assert_eq;

fn page(blocks: Vec<Block>) -> Page {
    Page::with_content(Properties::new(), blocks)
}

fn numbered_run(depth: usize, count: usize) -> Vec<Block> {
    (1..=count)
        .map(|i| Block::numbered(format!("item {} at depth {}", i, depth)))
        .collect()
}

/// Thirty numbered siblings at each of depths 0 through 3, each level nested
/// under the first item of the level above.
fn numbering_page() -> Page {
    let mut level = numbered_run(3, 30);
    for depth in (0..3).rev() {
        let mut items = numbered_run(depth, 30);
        items[0] = items[0].clone().with_children(level);
        level = items;
    }
    page(level)
}

#[test]
fn test_list_labels_cycle() {
    assert_eq!(list_label(0, 30), "30");
    assert_eq!(list_label(1, 26), "z");
    assert_eq!(list_label(1, 27), "aa");
    assert_eq!(list_label(1, 30), "ad");
    assert_eq!(list_label(2, 4), "iv");
    assert_eq!(list_label(2, 19), "xix");
    assert_eq!(list_label(2, 30), "xxx");
    assert_eq!(list_label(3, 12), "12");
}

#[test]
fn test_numbering_cycle_across_depths() {
    let page = numbering_page();
    let markup = to_markup(&page).unwrap();
    let lines: Vec<&str> = markup.lines().collect();

    assert!(lines.contains(&"30. item 30 at depth 0"));
    assert!(lines.contains(&"    aa. item 27 at depth 1"));
    assert!(lines.contains(&"    ad. item 30 at depth 1"));
    assert!(lines.contains(&"        ix. item 9 at depth 2"));
    assert!(lines.contains(&"        xxix. item 29 at depth 2"));
    assert!(lines.contains(&"            30. item 30 at depth 3"));
    assert_eq!(lines.len(), 120);

    assert_eq!(from_markup(&markup).unwrap(), page);
}

#[test]
fn test_numbering_restarts_after_interruption() {
    let page = page(vec![
        Block::numbered("a"),
        Block::numbered("b"),
        Block::bullet("break"),
        Block::numbered("c"),
    ]);
    let markup = to_markup(&page).unwrap();
    assert_eq!(markup, "1. a\n2. b\n- break\n1. c\n");
    assert_eq!(from_markup(&markup).unwrap(), page);
}

#[test]
fn test_custom_numbering_is_discarded() {
    let parsed = from_markup("7. seven\n3. three\n").unwrap();
    assert_eq!(
        parsed.children,
        vec![Block::numbered("seven"), Block::numbered("three")]
    );
    assert_eq!(to_markup(&parsed).unwrap(), "1. seven\n2. three\n");
}

#[test]
fn test_aligned_table() {
    let table = Table::with_header()
        .align(vec![None, Some(Alignment::Center)])
        .with_row(TableRow::from_strings(["Feature", "Supported"]))
        .with_row(TableRow::from_strings(["Headers", "Yes"]))
        .with_row(TableRow::from_strings(["Alignment", "Yes"]));
    let page = page(vec![Block::Table(table)]);

    let markup = to_markup(&page).unwrap();
    assert_eq!(
        markup,
        "| Feature   | Supported |\n\
         | ---       | :---:     |\n\
         | Headers   | Yes       |\n\
         | Alignment | Yes       |\n"
    );
    assert_eq!(from_markup(&markup).unwrap(), page);
}

#[test]
fn test_hand_written_table() {
    let parsed = from_markup("|a|b|\n|:--|--:|\n|1|2|\n").unwrap();
    let expected = Table::with_header()
        .align(vec![Some(Alignment::Left), Some(Alignment::Right)])
        .with_row(TableRow::from_strings(["a", "b"]))
        .with_row(TableRow::from_strings(["1", "2"]));
    assert_eq!(parsed.children, vec![Block::Table(expected)]);
}

#[test]
fn test_headerless_table_drops_alignment() {
    let table = Table::new()
        .align(vec![Some(Alignment::Right)])
        .with_row(TableRow::from_strings(["only"]));
    let markup = to_markup(&page(vec![Block::Table(table)])).unwrap();
    assert_eq!(markup, "| only |\n");

    let parsed = from_markup(&markup).unwrap();
    assert_eq!(
        parsed.children,
        vec![Block::Table(
            Table::new().with_row(TableRow::from_strings(["only"]))
        )]
    );
}

const BAD_FRONT_MATTER: &str = "---\nntn:title:Name: Doc\nntn:date:Due: someday\n---\n# Body\n";

#[test]
fn test_front_matter_strict_mode() {
    let err = from_markup(BAD_FRONT_MATTER).unwrap_err();

    let Error::UnparsableFrontMatter { message, recovered } = err else {
        panic!("expected a front matter error");
    };
    assert!(message.contains("Due"), "message: {}", message);
    assert!(recovered.properties.is_empty());
    assert_eq!(recovered.children, vec![Block::heading(1, "Body")]);
}

#[test]
fn test_front_matter_lenient_mode() {
    let outcome = MarkupParser::new(ParseOptions::new().lenient())
        .parse(BAD_FRONT_MATTER)
        .unwrap();

    assert!(outcome.page.properties.is_empty());
    assert_eq!(outcome.page.children, vec![Block::heading(1, "Body")]);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].to_string().starts_with("line 1:"));
}

#[test]
fn test_front_matter_not_yaml() {
    let err = from_markup("---\nntn:title:Name: [unclosed\n---\ntext\n").unwrap_err();
    assert_eq!(
        err.recovered_page().map(|p| p.children.clone()),
        Some(vec![Block::paragraph("text")])
    );
}

#[test]
fn test_untyped_front_matter_keys_are_skipped() {
    let page = from_markup("---\nntn:select:Stage: Draft\nlegacy: value\n---\n").unwrap();
    assert_eq!(page.properties.len(), 1);
    assert_eq!(
        page.properties.get("Stage"),
        Some(&PropertyValue::Select(Some("Draft".into())))
    );
}

#[test]
fn test_front_matter_toggle() {
    let page = Page::with_content(
        Properties::new().with("Name", PropertyValue::Title("Doc".into())),
        vec![Block::paragraph("Body")],
    );

    let with = Converter::new().render(&page).unwrap();
    let without = Converter::new().with_front_matter(false).render(&page).unwrap();

    assert!(with.starts_with("---\n"));
    assert_eq!(without, "Body\n");
    assert_eq!(Converter::new().parse(&with).unwrap(), page);
}

#[test]
fn test_two_space_indentation() {
    let parsed = from_markup("- a\n  - b\n    1. deep\n  - c\n").unwrap();
    assert_eq!(
        parsed.children,
        vec![Block::bullet("a").with_children(vec![
            Block::bullet("b").with_children(vec![Block::numbered("deep")]),
            Block::bullet("c"),
        ])]
    );
}

#[test]
fn test_consecutive_quotes_are_separate_blocks() {
    let parsed = from_markup("> one\n> two\n").unwrap();
    assert_eq!(
        parsed.children,
        vec![Block::quote("one"), Block::quote("two")]
    );
}

#[test]
fn test_leading_divider_survives_without_front_matter() {
    let page = page(vec![
        Block::Divider,
        Block::paragraph("ntn:title:Name: looks like a key"),
        Block::Divider,
    ]);
    let markup = to_markup(&page).unwrap();
    assert_eq!(from_markup(&markup).unwrap(), page);
}

#[test]
fn test_unterminated_containers_warn() {
    let outcome = MarkupParser::default()
        .parse("<notion-columns>\n<notion-column>\nleft\n")
        .unwrap();

    assert_eq!(outcome.warnings.len(), 2);
    assert_eq!(outcome.page.block_count(), 1);
    assert_eq!(outcome.page.total_block_count(), 2);
}

fn assert_roundtrip(page: &Page) {
    let markup = to_markup(page).unwrap();
    assert_eq!(&from_markup(&markup).unwrap(), page, "markup:\n{}", markup);
}

#[test]
fn test_front_matter_with_quoted_names() {
    let page = Page::with_content(
        Properties::new()
            .with("Task #1", PropertyValue::Select(Some("x".into())))
            .with("Owner: Lead", PropertyValue::Text("Ada".into()))
            .with("Name", PropertyValue::Title("Plan".into())),
        vec![Block::paragraph("body")],
    );

    let markup = to_markup(&page).unwrap();
    let key_line = markup.lines().nth(1).unwrap_or_default();
    assert!(key_line.starts_with(['\'', '"']), "{}", markup);
    assert_roundtrip(&page);
}

#[test]
fn test_leading_divider_before_quoted_key_text() {
    assert_roundtrip(&page(vec![
        Block::Divider,
        Block::paragraph("'ntn:select:Task #1': x"),
        Block::Divider,
    ]));
}

#[test]
fn test_adjacent_tables_stay_separate() {
    let headed = |a: &str, b: &str, c: &str, d: &str| {
        Block::Table(
            Table::with_header()
                .with_row(TableRow::from_strings([a, b]))
                .with_row(TableRow::from_strings([c, d])),
        )
    };
    let headerless = |a: &str| Block::Table(Table::new().with_row(TableRow::from_strings([a])));

    assert_roundtrip(&page(vec![headed("A", "B", "1", "2"), headed("C", "D", "3", "4")]));
    assert_roundtrip(&page(vec![headerless("x"), headed("C", "D", "3", "4")]));
    assert_roundtrip(&page(vec![headed("A", "B", "1", "2"), headerless("y")]));
    assert_roundtrip(&page(vec![headerless("x"), headerless("y")]));
}

#[test]
fn test_table_alignment_is_canonical() {
    let table = |alignments| {
        Block::Table(
            Table::with_header()
                .align(alignments)
                .with_row(TableRow::from_strings(["a", "b"]))
                .with_row(TableRow::from_strings(["1", "2"])),
        )
    };

    assert_roundtrip(&page(vec![table(vec![None, None])]));
    assert_roundtrip(&page(vec![table(vec![Some(Alignment::Center)])]));
    assert_roundtrip(&page(vec![table(vec![None, Some(Alignment::Right)])]));
}

#[test]
fn test_table_cells_with_backslashes_and_pipes() {
    let cells = vec![
        RichText::new().with_run(TextRun::code("a\\|b")),
        RichText::plain("ends with \\"),
        RichText::plain("a\\|b"),
        RichText::new().with_run(TextRun::code("x\\\\|")),
    ];
    let table = Table::new().with_row(TableRow::new(cells));
    assert_roundtrip(&page(vec![Block::Table(table)]));
}

#[test]
fn test_line_breaks_inside_inline_tokens() {
    let text = RichText::plain("x ")
        .with_mention(Mention::Equation {
            expression: "a\\\nb".into(),
        })
        .with_mention(Mention::User {
            id: "u1".into(),
            name: Some("Ada\nLovelace".into()),
        })
        .with_mention(Mention::Date(DateMention {
            start: "2024-01-01".into(),
            end: None,
            timezone: Some("UTC\n".into()),
        }))
        .with_run(TextRun::new("link").with_link("https://x.io/\nnext"));

    let page = page(vec![Block::bullet(text), Block::bullet("next")]);
    let markup = to_markup(&page).unwrap();
    assert_eq!(markup.lines().count(), 2);
    assert_roundtrip(&page);
}

#[test]
fn test_empty_paragraph_with_children_after_nested_block() {
    assert_roundtrip(&page(vec![
        Block::bullet("a").with_children(vec![Block::paragraph("b")]),
        Block::empty_paragraph().with_children(vec![Block::paragraph("x")]),
    ]));
    assert_roundtrip(&page(vec![
        Block::paragraph("a"),
        Block::empty_paragraph().with_children(vec![Block::paragraph("x")]),
        Block::empty_paragraph(),
        Block::paragraph("c"),
    ]));
}
