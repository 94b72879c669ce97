//! Markup rendering for pages.

use crate::dialect::BLOCK_BREAK;
use crate::error::Result;
use crate::inline::{encode_inline, escape_line_start, longest_run};
use crate::model::{Alignment, Block, CodeBlock, Column, Page, RichText, Table};
use once_cell::sync::Lazy;
use regex::Regex;

use super::frontmatter::render_front_matter;
use super::numbering::{list_label, ListNumbering};
use super::RenderOptions;

/// Cells that would read as a separator row marker.
static SEPARATOR_LIKE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:?-+:?$").unwrap());

/// Convert a page to extended markup.
pub fn to_markup(page: &Page, options: &RenderOptions) -> Result<String> {
    let renderer = MarkupRenderer::new(options.clone());
    renderer.render(page)
}

/// Markup renderer.
pub struct MarkupRenderer {
    options: RenderOptions,
    lines: Vec<String>,
    numbering: ListNumbering,
}

impl MarkupRenderer {
    /// Create a new markup renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            lines: Vec::new(),
            numbering: ListNumbering::new(),
        }
    }

    /// Render a page to markup.
    ///
    /// Every line, including the last, ends with a newline. A page without
    /// properties or blocks renders as an empty string.
    pub fn render(mut self, page: &Page) -> Result<String> {
        let mut output = String::new();

        if self.options.include_front_matter {
            output.push_str(&render_front_matter(
                &page.properties,
                self.options.dialect.as_ref(),
            )?);
        }

        self.render_blocks(&page.children, 0);

        // A bare leading divider followed by a prefixed line would read back as front matter.
        let dialect = self.options.dialect.clone();
        if output.is_empty()
            && self.lines.first().map(String::as_str) == Some("---")
            && self.lines.get(1).map_or(false, |l| dialect.starts_key_line(l))
        {
            self.lines[0] = "***".to_string();
        }

        for line in &self.lines {
            output.push_str(line);
            output.push('\n');
        }
        Ok(output)
    }

    fn render_blocks(&mut self, blocks: &[Block], depth: usize) {
        let indent = self.options.indent(depth);
        self.numbering.enter();
        let mut previous = None;
        for block in blocks {
            if needs_break(previous, block, &indent) {
                self.lines.push(format!("{}{}", indent, BLOCK_BREAK));
            }
            let position = self.numbering.advance(block.is_numbered());
            self.render_block(block, depth, position);
            previous = Some(block);
        }
        self.numbering.exit();
    }

    fn render_block(&mut self, block: &Block, depth: usize, position: Option<u32>) {
        let indent = self.options.indent(depth);
        let marker = self.options.list_marker;
        let toggle = self.options.dialect.toggle_marker().to_string();

        match block {
            Block::Paragraph(p) => {
                if p.text.is_empty() {
                    self.lines.push(indent.clone());
                } else {
                    self.lines
                        .push(format!("{}{}", indent, escape_line_start(&encode_inline(&p.text))));
                }
            }
            Block::Heading {
                level,
                is_toggle,
                text,
                ..
            } => {
                let mut prefix = "#".repeat((*level).clamp(1, 3) as usize);
                if *is_toggle {
                    prefix = format!("{} {}", prefix, toggle);
                }
                self.push_prefixed(&indent, &prefix, text);
            }
            Block::BulletItem(b) => {
                self.push_prefixed(&indent, &marker.to_string(), &b.text);
            }
            Block::NumberedItem(b) => {
                let label = list_label(depth, position.unwrap_or(1));
                self.push_prefixed(&indent, &format!("{}.", label), &b.text);
            }
            Block::Todo { checked, text, .. } => {
                let check = if *checked { "[x]" } else { "[ ]" };
                self.push_prefixed(&indent, &format!("{} {}", marker, check), text);
            }
            Block::Toggle(b) => {
                self.push_prefixed(&indent, &format!("{} {}", marker, toggle), &b.text);
            }
            Block::Quote(b) => {
                self.push_prefixed(&indent, ">", &b.text);
            }
            Block::Code(code) => self.render_code(&indent, code),
            Block::Divider => self.lines.push(format!("{}---", indent)),
            Block::Table(table) => self.render_table(&indent, table),
            Block::Callout { icon, text, .. } => {
                let open = self.options.dialect.callout_open(icon.as_deref());
                self.lines.push(format!("{}{}", indent, open));
                if text.is_empty() {
                    self.lines.push(indent.clone());
                } else {
                    self.lines
                        .push(format!("{}{}", indent, escape_line_start(&encode_inline(text))));
                }
            }
            Block::ColumnList { columns } => self.render_columns(&indent, columns, depth),
            Block::Unknown(unknown) => {
                let line = self.options.dialect.encode_unknown(unknown);
                self.lines.push(format!("{}{}", indent, line));
            }
        }

        self.render_blocks(block.children(), depth + 1);

        if matches!(block, Block::Callout { .. }) {
            let close = self.options.dialect.callout_close().to_string();
            self.lines.push(format!("{}{}", indent, close));
        }
    }

    /// Push `prefix text`, or just `prefix` when the text is empty.
    fn push_prefixed(&mut self, indent: &str, prefix: &str, text: &RichText) {
        if text.is_empty() {
            self.lines.push(format!("{}{}", indent, prefix));
        } else {
            self.lines
                .push(format!("{}{} {}", indent, prefix, encode_inline(text)));
        }
    }

    fn render_code(&mut self, indent: &str, code: &CodeBlock) {
        let fence = "`".repeat((longest_run(&code.body, '`') + 1).max(3));
        let info = if code.is_plain_text() {
            ""
        } else {
            code.language.as_str()
        };

        self.lines.push(format!("{}{}{}", indent, fence, info));
        if !code.body.is_empty() {
            for line in code.body.split('\n') {
                self.lines.push(format!("{}{}", indent, line));
            }
        }
        self.lines.push(format!("{}{}", indent, fence));
    }

    fn render_table(&mut self, indent: &str, table: &Table) {
        let col_count = table.column_count();
        if col_count == 0 {
            log::debug!("Skipping table without columns");
            return;
        }

        let rows: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| {
                (0..col_count)
                    .map(|i| row.cells.get(i).map(table_cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = (0..col_count)
            .map(|i| {
                rows.iter()
                    .map(|r| r[i].chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(3)
            })
            .collect();
        log::debug!("Table column widths: {:?}", widths);

        for (i, row) in rows.iter().enumerate() {
            self.lines.push(format!("{}{}", indent, table_line(row, &widths)));

            if i == 0 && table.has_header_row {
                let markers: Vec<String> = (0..col_count)
                    .map(|c| separator_marker(table.alignment(c)).to_string())
                    .collect();
                self.lines
                    .push(format!("{}{}", indent, table_line(&markers, &widths)));
            }
        }
    }

    fn render_columns(&mut self, indent: &str, columns: &[Column], depth: usize) {
        let dialect = self.options.dialect.clone();
        self.lines
            .push(format!("{}{}", indent, dialect.column_list_open()));
        for column in columns {
            self.lines.push(format!("{}{}", indent, dialect.column_open()));
            self.render_blocks(&column.children, depth);
            self.lines.push(format!("{}{}", indent, dialect.column_close()));
        }
        self.lines
            .push(format!("{}{}", indent, dialect.column_list_close()));
    }
}

/// Whether `block` would merge into `previous` when read back.
///
/// A headerless table continues the table before it, and a blank line that
/// starts an empty paragraph with children would be claimed by the previous
/// sibling's child scope.
fn needs_break(previous: Option<&Block>, block: &Block, indent: &str) -> bool {
    let Some(previous) = previous else {
        return false;
    };
    match block {
        Block::Table(table) => matches!(previous, Block::Table(_)) && !table.has_header_row,
        Block::Paragraph(p) => indent.is_empty() && p.text.is_empty() && !p.children.is_empty(),
        _ => false,
    }
}

fn table_cell(cell: &RichText) -> String {
    let encoded = escape_pipes(&encode_inline(cell));
    if SEPARATOR_LIKE.is_match(&encoded) {
        format!("\\{}", encoded)
    } else {
        encoded
    }
}

/// Escape `|` as `\\|`, doubling the backslashes right before it so a cell
/// ending in a backslash stays distinct from an escaped pipe.
fn escape_pipes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut backslashes = 0;
    for c in text.chars() {
        match c {
            '\\' => backslashes += 1,
            '|' => {
                result.push_str(&"\\".repeat(backslashes * 2 + 1));
                result.push('|');
                backslashes = 0;
            }
            _ => {
                result.push_str(&"\\".repeat(backslashes));
                result.push(c);
                backslashes = 0;
            }
        }
    }
    result.push_str(&"\\".repeat(backslashes));
    result
}

fn table_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    format!("| {} |", padded.join(" | "))
}

fn separator_marker(alignment: Option<Alignment>) -> &'static str {
    match alignment {
        None => "---",
        Some(Alignment::Left) => ":---",
        Some(Alignment::Center) => ":---:",
        Some(Alignment::Right) => "---:",
    }
}
