//! Markup-to-page parsing.
//!
//! The body is scanned line by line. Each block claims the lines indented
//! deeper than its own line as children, so nesting follows indentation width
//! rather than a fixed indent unit. Fenced code and unknown-block escapes are
//! opaque; callouts and column layouts are tagged containers closed by their
//! own tokens.

use crate::dialect::BLOCK_BREAK;
use crate::error::{Error, Result};
use crate::inline::decode_inline;
use crate::model::{Alignment, Block, CodeBlock, Column, Page, Properties, RichText, Table, TableRow};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::frontmatter::{decode_front_matter, find_front_matter};
use super::{ErrorMode, ParseOptions};

static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(`{3,})([^`]*)$").unwrap());
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})(?: (.*))?$").unwrap());
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*+](?: (.*))?$").unwrap());
static NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+|[a-z]+)\.(?: (.*))?$").unwrap());
static ROMAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ivxlcdm]+$").unwrap());
static QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^> ?(.*)$").unwrap());
static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:?-+:?$").unwrap());

/// A recoverable problem found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number in the input
    pub line: usize,
    /// Description of the problem
    pub message: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// A parsed page together with the warnings raised while parsing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    /// The parsed page
    pub page: Page,
    /// Recoverable problems, in input order
    pub warnings: Vec<ParseWarning>,
}

impl ParseOutcome {
    /// Check if the input parsed without warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Parse extended markup into a page.
pub fn from_markup(text: &str, options: &ParseOptions) -> Result<Page> {
    let parser = MarkupParser::new(options.clone());
    parser.parse(text).map(|outcome| outcome.page)
}

/// Markup parser.
#[derive(Debug, Clone, Default)]
pub struct MarkupParser {
    options: ParseOptions,
}

impl MarkupParser {
    /// Create a new markup parser.
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parse markup into a page and its warnings.
    ///
    /// In strict mode an undecodable front matter block fails with
    /// [`Error::UnparsableFrontMatter`], which still carries the parsed body.
    pub fn parse(&self, text: &str) -> Result<ParseOutcome> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let lines = split_lines(text);
        let dialect = self.options.dialect.as_ref();

        let (properties, front_matter_error, body_start) = match find_front_matter(&lines, dialect)
        {
            Some(end) => {
                log::debug!("Front matter detected on lines 1-{}", end + 1);
                let yaml = lines[1..end].join("\n");
                match decode_front_matter(&yaml, dialect) {
                    Ok(properties) => (properties, None, end + 1),
                    Err(message) => (Properties::new(), Some(message), end + 1),
                }
            }
            None => (Properties::new(), None, 0),
        };

        let mut scanner = LineScanner::new(&lines[body_start..], body_start, &self.options);
        let children = scanner.parse_children(0, 0);
        let mut warnings = scanner.warnings;
        let page = Page::with_content(properties, children);

        if let Some(message) = front_matter_error {
            match self.options.error_mode {
                ErrorMode::Strict => {
                    return Err(Error::UnparsableFrontMatter {
                        message,
                        recovered: Box::new(page),
                    });
                }
                ErrorMode::Lenient => {
                    log::warn!("Dropping undecodable front matter: {}", message);
                    warnings.insert(
                        0,
                        ParseWarning {
                            line: 1,
                            message: format!("front matter dropped: {}", message),
                        },
                    );
                }
            }
        }

        Ok(ParseOutcome { page, warnings })
    }
}

/// Split text into lines, dropping the final newline and any `\r`.
fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

fn is_indent(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn trim_indent(line: &str) -> &str {
    line.trim_start_matches(is_indent)
}

struct LineScanner<'a> {
    lines: &'a [&'a str],
    first_line: usize,
    pos: usize,
    options: &'a ParseOptions,
    /// Closing tokens of the containers currently open
    closers: Vec<String>,
    warnings: Vec<ParseWarning>,
}

impl<'a> LineScanner<'a> {
    fn new(lines: &'a [&'a str], first_line: usize, options: &'a ParseOptions) -> Self {
        Self {
            lines,
            first_line,
            pos: 0,
            options,
            closers: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn current(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    /// Indentation width, counting tabs as `tab_width` columns.
    fn width(&self, line: &str) -> usize {
        line.chars()
            .take_while(|&c| is_indent(c))
            .map(|c| if c == '\t' { self.options.tab_width } else { 1 })
            .sum()
    }

    fn is_closer(&self, content: &str) -> bool {
        let content = content.trim();
        self.closers.iter().any(|closer| closer == content)
    }

    fn warn(&mut self, index: usize, message: String) {
        let line = self.first_line + index + 1;
        log::warn!("Line {}: {}", line, message);
        self.warnings.push(ParseWarning { line, message });
    }

    /// Parse sibling blocks indented at least `min_width`.
    fn parse_children(&mut self, min_width: usize, depth: usize) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut sibling_width = None;

        while let Some(line) = self.current() {
            if line.is_empty() {
                if !self.owns_blank_line(min_width) {
                    break;
                }
                self.pos += 1;
                let width = sibling_width.unwrap_or(min_width);
                blocks.push(self.nest(Block::empty_paragraph(), width, depth));
                continue;
            }

            let width = self.width(line);
            let content = trim_indent(line);
            if width < min_width || self.is_closer(content) {
                break;
            }
            if content.trim_end() == BLOCK_BREAK {
                self.pos += 1;
                continue;
            }
            sibling_width.get_or_insert(width);

            self.pos += 1;
            let block = self.parse_block(content, width, depth);
            blocks.push(block);
        }

        blocks
    }

    /// A truly empty line belongs to the innermost scope that continues after it.
    fn owns_blank_line(&self, min_width: usize) -> bool {
        match self.lines[self.pos..].iter().find(|line| !line.is_empty()) {
            None => min_width == 0,
            Some(next) => self.width(next) >= min_width && !self.is_closer(next),
        }
    }

    /// Parse the block whose first line (already consumed) is `content`.
    fn parse_block(&mut self, content: &'a str, width: usize, depth: usize) -> Block {
        let line_index = self.pos - 1;
        let dialect = self.options.dialect.clone();
        let trimmed = content.trim_end();

        if content.is_empty() {
            return self.nest(Block::empty_paragraph(), width, depth);
        }
        if let Some(caps) = FENCE.captures(trimmed) {
            let fence = caps.get(1).map_or("", |m| m.as_str());
            let info = caps.get(2).map_or("", |m| m.as_str()).trim();
            return self.parse_code(fence, info, width, line_index);
        }
        if let Some(unknown) = dialect.decode_unknown(trimmed) {
            return Block::Unknown(unknown);
        }
        if let Some(icon) = dialect.parse_callout_open(trimmed) {
            return self.parse_callout(icon, width, depth, line_index);
        }
        if trimmed == dialect.column_list_open() {
            return self.parse_columns(width, depth, line_index);
        }
        if matches!(trimmed, "---" | "***" | "___") {
            return Block::Divider;
        }

        let toggle = dialect.toggle_marker();

        if let Some(caps) = HEADING.captures(content) {
            let level = caps.get(1).map_or(1, |m| m.as_str().len()).min(3) as u8;
            let rest = caps.get(2).map_or("", |m| m.as_str());
            let (is_toggle, text) = match strip_marker(rest, toggle) {
                Some(text) => (true, text),
                None => (false, rest),
            };
            let block = Block::Heading {
                level,
                is_toggle,
                text: decode_inline(text),
                children: Vec::new(),
            };
            return self.nest(block, width, depth);
        }

        if let Some(caps) = LIST_ITEM.captures(content) {
            let rest = caps.get(1).map_or("", |m| m.as_str());
            let block = if let Some(text) = strip_marker(rest, "[ ]") {
                Block::todo(false, decode_inline(text))
            } else if let Some(text) =
                strip_marker(rest, "[x]").or_else(|| strip_marker(rest, "[X]"))
            {
                Block::todo(true, decode_inline(text))
            } else if let Some(text) = strip_marker(rest, toggle) {
                Block::toggle(decode_inline(text))
            } else {
                Block::bullet(decode_inline(rest))
            };
            return self.nest(block, width, depth);
        }

        if let Some(caps) = NUMBERED.captures(content) {
            let label = caps.get(1).map_or("", |m| m.as_str());
            if is_list_label(label, depth) {
                let text = caps.get(2).map_or("", |m| m.as_str());
                return self.nest(Block::numbered(decode_inline(text)), width, depth);
            }
        }

        if let Some(caps) = QUOTE.captures(content) {
            let text = caps.get(1).map_or("", |m| m.as_str());
            return self.nest(Block::quote(decode_inline(text)), width, depth);
        }

        if content.starts_with('|') {
            return self.parse_table(content, width);
        }

        self.nest(Block::paragraph(decode_inline(content)), width, depth)
    }

    /// Attach the lines indented deeper than `width` as children.
    fn nest(&mut self, mut block: Block, width: usize, depth: usize) -> Block {
        if block.children_mut().is_some() {
            let children = self.parse_children(width + 1, depth + 1);
            block = block.with_children(children);
        }
        block
    }

    fn parse_code(&mut self, fence: &str, info: &str, width: usize, line_index: usize) -> Block {
        let mut body = Vec::new();
        let mut closed = false;

        while let Some(line) = self.current() {
            self.pos += 1;
            let content = line.trim();
            if content.len() >= fence.len() && content.chars().all(|c| c == '`') {
                closed = true;
                break;
            }
            body.push(self.strip_width(line, width));
        }

        if !closed {
            self.warn(line_index, "unterminated code fence".to_string());
        }

        Block::Code(CodeBlock::new(info, body.join("\n")))
    }

    /// Remove up to `width` columns of indentation.
    fn strip_width<'l>(&self, line: &'l str, width: usize) -> &'l str {
        let mut consumed = 0;
        let mut offset = 0;
        for c in line.chars() {
            if consumed >= width || !is_indent(c) {
                break;
            }
            consumed += if c == '\t' { self.options.tab_width } else { 1 };
            offset += c.len_utf8();
        }
        &line[offset..]
    }

    fn parse_callout(
        &mut self,
        icon: Option<String>,
        width: usize,
        depth: usize,
        line_index: usize,
    ) -> Block {
        let close = self.options.dialect.callout_close().to_string();

        let mut text = RichText::new();
        if let Some(line) = self.current() {
            let content = trim_indent(line);
            let indented = content.is_empty() || self.width(line) >= width;
            if indented && content.trim() != close && !self.is_closer(content) {
                text = decode_inline(content);
                self.pos += 1;
            }
        }

        self.closers.push(close.clone());
        let mut children = self.parse_children(width + 1, depth + 1);
        self.absorb_blank_lines(&mut children, &close);
        self.expect_closer(&close, line_index, "callout");
        self.closers.pop();

        Block::Callout {
            icon,
            text,
            children,
        }
    }

    fn parse_columns(&mut self, width: usize, depth: usize, line_index: usize) -> Block {
        let dialect = self.options.dialect.clone();
        let open = dialect.column_open();
        let close = dialect.column_close();
        let list_close = dialect.column_list_close();

        self.closers.push(list_close.to_string());
        let mut columns = Vec::new();

        while let Some(line) = self.current() {
            let content = line.trim();
            if content == list_close {
                break;
            }
            if content.is_empty() {
                self.pos += 1;
                continue;
            }

            if content == open {
                let column_index = self.pos;
                self.pos += 1;
                self.closers.push(close.to_string());
                let mut children = self.parse_children(width, depth);
                self.absorb_blank_lines(&mut children, close);
                self.expect_closer(close, column_index, "column");
                self.closers.pop();
                columns.push(Column::new(children));
                continue;
            }

            if self.width(line) < width || self.is_closer(content) {
                break;
            }
            self.warn(self.pos, "content outside a column".to_string());
            columns.push(Column::new(self.parse_children(width, depth)));
        }

        self.expect_closer(list_close, line_index, "column list");
        self.closers.pop();
        log::debug!("Parsed column list with {} columns", columns.len());

        Block::ColumnList { columns }
    }

    /// Empty lines right before a container's closer are trailing empty paragraphs.
    fn absorb_blank_lines(&mut self, children: &mut Vec<Block>, close: &str) {
        let lines = self.lines;
        let rest = &lines[self.pos..];
        let blanks = rest.iter().take_while(|line| line.is_empty()).count();
        if blanks > 0 && rest.get(blanks).map(|line| line.trim()) == Some(close) {
            children.extend((0..blanks).map(|_| Block::empty_paragraph()));
            self.pos += blanks;
        }
    }

    fn expect_closer(&mut self, close: &str, line_index: usize, what: &str) {
        if self.current().map(str::trim) == Some(close) {
            self.pos += 1;
        } else {
            self.warn(line_index, format!("unterminated {}", what));
        }
    }

    /// Cells of the table row at `index`, if that line continues a table at `width`.
    fn table_row_at(&self, index: usize, width: usize) -> Option<Vec<String>> {
        let line = self.lines.get(index)?;
        let content = trim_indent(line);
        if self.width(line) != width || !content.starts_with('|') {
            return None;
        }
        Some(split_row(content))
    }

    fn parse_table(&mut self, first: &str, width: usize) -> Block {
        let mut rows = vec![split_row(first)];
        while let Some(row) = self.table_row_at(self.pos, width) {
            // A row followed by a separator row is the header of the next table.
            let starts_table = !is_separator_row(&row)
                && self
                    .table_row_at(self.pos + 1, width)
                    .map_or(false, |next| is_separator_row(&next));
            if starts_table {
                break;
            }
            rows.push(row);
            self.pos += 1;
        }

        let has_header = rows.get(1).map_or(false, |row| is_separator_row(row));

        let mut table = if has_header {
            let separator = rows.remove(1);
            Table::with_header().align(separator.iter().map(|marker| alignment(marker)).collect())
        } else {
            Table::new()
        };

        for cells in rows {
            table.add_row(TableRow::new(
                cells.iter().map(|cell| decode_inline(cell)).collect(),
            ));
        }
        log::debug!(
            "Parsed table with {} rows and {} columns",
            table.row_count(),
            table.column_count()
        );

        Block::Table(table)
    }
}

/// Strip `marker` and the single space after it.
fn strip_marker<'t>(rest: &'t str, marker: &str) -> Option<&'t str> {
    let after = rest.strip_prefix(marker)?;
    if after.is_empty() {
        Some(after)
    } else {
        after.strip_prefix(' ')
    }
}

/// Digits are accepted at any depth; letters and roman numerals only where
/// the renderer would emit them.
fn is_list_label(label: &str, depth: usize) -> bool {
    if label.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    match depth % 3 {
        1 => true,
        2 => ROMAN.is_match(label),
        _ => false,
    }
}

/// Split a table line on unescaped pipes, unescaping `\|` and trimming cells.
fn split_row(content: &str) -> Vec<String> {
    let content = content.trim();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut ends_with_pipe = false;
    let mut chars = content.chars();

    while let Some(c) = chars.next() {
        ends_with_pipe = false;
        match c {
            '\\' => match chars.next() {
                Some('|') => current.push('|'),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            },
            '|' => {
                cells.push(std::mem::take(&mut current));
                ends_with_pipe = true;
            }
            _ => current.push(c),
        }
    }
    if !ends_with_pipe {
        cells.push(current);
    }
    if content.starts_with('|') && !cells.is_empty() {
        cells.remove(0);
    }

    cells.into_iter().map(|cell| cell.trim().to_string()).collect()
}

fn alignment(marker: &str) -> Option<Alignment> {
    let left = marker.starts_with(':');
    let right = marker.len() > 1 && marker.ends_with(':');
    match (left, right) {
        (true, true) => Some(Alignment::Center),
        (true, false) => Some(Alignment::Left),
        (false, true) => Some(Alignment::Right),
        (false, false) => None,
    }
}
