//! In-memory cell grid
//!
//! The allocation engine works on this grid rather than on calamine types, so
//! it can be exercised in tests without a workbook on disk.

use rust_decimal::Decimal;
use std::fmt;

/// Row holding the sparse stock-name markers (row 1 in the workbook)
pub const MARKER_ROW: usize = 0;
/// Row holding the per-column sub-headers (row 2 in the workbook)
pub const SUBHEADER_ROW: usize = 1;
/// Column holding account names (column A)
pub const ACCOUNT_COLUMN: usize = 0;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(Decimal),
    Text(String),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    /// Shorthand for text cells in tests and fixtures
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// True for empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Numeric value, only for cells stored as numbers
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Trimmed display text, `None` for blank cells
    pub fn label(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.to_string().trim().to_string())
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Rectangular view over a worksheet, addressed with 0-based (row, col)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Grid {
    /// Build a grid from ragged rows; the width is the longest row
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, width }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell at (row, col); out-of-range positions read as empty
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// The cells of one row, padded to the grid width
    pub fn row(&self, row: usize) -> Vec<&Cell> {
        (0..self.width).map(|col| self.cell(row, col)).collect()
    }
}

/// Convert a 0-based column index to its spreadsheet letter (0 -> "A", 26 -> "AA")
pub fn column_letter(col: usize) -> String {
    let mut n = col + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
