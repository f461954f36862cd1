//! Profit/loss workbook reader
//!
//! Reads the first worksheet of the subscription workbook into a [`Grid`],
//! keeping absolute cell positions so row numbers and column letters in the
//! report match what the user sees in the spreadsheet.

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::StructureError;
use crate::sheet::{Cell, Grid};

/// Parse the workbook at `path` into a grid of its first worksheet
pub fn parse_workbook_excel<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let path = path.as_ref();
    info!("Parsing profit/loss workbook: {:?}", path);

    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = sheet_names.first().cloned().ok_or(StructureError::NoWorksheet)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read worksheet '{}'", sheet_name))?;

    let grid = grid_from_range(&range);
    info!(
        "Read sheet '{}': {} rows x {} columns",
        sheet_name,
        grid.height(),
        grid.width()
    );
    Ok(grid)
}

/// Lay a calamine range out at its absolute position in the sheet
fn grid_from_range(range: &Range<Data>) -> Grid {
    let Some((start_row, start_col)) = range.start() else {
        return Grid::default();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);
    let (height, width) = range.get_size();

    let mut rows = vec![vec![Cell::Empty; start_col + width]; start_row + height];
    for (row, col, data) in range.cells() {
        rows[start_row + row][start_col + col] = convert_cell(data);
    }
    debug!("Range starts at ({}, {})", start_row, start_col);

    Grid::from_rows(rows)
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(Decimal::from(*i)),
        Data::Float(f) => parse_float(*f)
            .map(Cell::Number)
            .unwrap_or_else(|_| Cell::Text(f.to_string())),
        Data::String(s) => Cell::Text(s.clone()),
        // Dates, booleans and error values are never money; keep their text
        other => Cell::Text(other.to_string()),
    }
}

/// Float cells go through their shortest decimal form so 1000.5 stays 1000.5
fn parse_float(f: f64) -> Result<Decimal> {
    if !f.is_finite() {
        return Err(anyhow!("Non-finite number in cell"));
    }
    Decimal::from_str(&f.to_string()).context("Failed to parse float as decimal")
}
