//! Table types.

use super::RichText;
use serde::{Deserialize, Serialize};

/// A table structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table, header row first when present
    pub rows: Vec<TableRow>,

    /// Whether the first row is a header row
    pub has_header_row: bool,

    /// Per-column alignment; empty when the table declares none
    #[serde(default)]
    pub alignments: Vec<Option<Alignment>>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table whose first row is a header.
    pub fn with_header() -> Self {
        Self {
            has_header_row: true,
            ..Self::new()
        }
    }

    /// Set column alignments and return self.
    ///
    /// Trailing `None` entries are dropped, so tables that align the same
    /// columns compare equal however the vector was spelled.
    pub fn align(mut self, mut alignments: Vec<Option<Alignment>>) -> Self {
        while alignments.last() == Some(&None) {
            alignments.pop();
        }
        self.alignments = alignments;
        self
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Builder-style variant of [`Table::add_row`].
    pub fn with_row(mut self, row: TableRow) -> Self {
        self.add_row(row);
        self
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Alignment of a column, if declared.
    pub fn alignment(&self, column: usize) -> Option<Alignment> {
        self.alignments.get(column).copied().flatten()
    }

    /// Get the header row, if any.
    pub fn header(&self) -> Option<&TableRow> {
        if self.has_header_row {
            self.rows.first()
        } else {
            None
        }
    }

    /// Get body rows (non-header).
    pub fn body(&self) -> &[TableRow] {
        if self.has_header_row && !self.rows.is_empty() {
            &self.rows[1..]
        } else {
            &self.rows
        }
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<RichText>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<RichText>) -> Self {
        Self { cells }
    }

    /// Create a row from text values.
    pub fn from_strings<S: AsRef<str>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            values
                .into_iter()
                .map(|s| RichText::plain(s.as_ref()))
                .collect(),
        )
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left aligned
    Left,
    /// Centered
    Center,
    /// Right aligned
    Right,
}
