//! Completeness checker
//!
//! Finds allotted subscriptions ("已中签") whose sale price was never entered.
//! Status and price columns are paired through the stock marker that owns
//! each of them.

use tracing::debug;

use super::{Account, MissingRecord};
use crate::config::SheetLayout;
use crate::sheet::{column_letter, Grid, MARKER_ROW, SUBHEADER_ROW};

/// A status column and the price column it is checked against
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPricePair {
    pub stock: String,
    pub status_col: usize,
    pub price_col: usize,
}

/// Nearest non-blank marker at or left of `col`
fn owning_marker(grid: &Grid, col: usize) -> Option<String> {
    (0..=col)
        .rev()
        .find_map(|c| grid.cell(MARKER_ROW, c).label())
}

/// Pair every status column with the first price column of the same stock.
/// Status columns without a matching price column are left out.
pub fn pair_status_columns(grid: &Grid, layout: &SheetLayout) -> Vec<StatusPricePair> {
    let mut status_cols = Vec::new();
    let mut price_cols = Vec::new();
    for col in 0..grid.width() {
        let header = grid.cell(SUBHEADER_ROW, col).to_string();
        if header.contains(&layout.status_token) {
            status_cols.push(col);
        } else if header.contains(&layout.price_token) {
            price_cols.push(col);
        }
    }

    let price_owners: Vec<(usize, Option<String>)> = price_cols
        .into_iter()
        .map(|col| (col, owning_marker(grid, col)))
        .collect();

    status_cols
        .into_iter()
        .filter_map(|status_col| {
            let stock = owning_marker(grid, status_col)?;
            let price_col = price_owners
                .iter()
                .find(|(_, owner)| owner.as_deref() == Some(stock.as_str()))
                .map(|(col, _)| *col);
            match price_col {
                Some(price_col) => Some(StatusPricePair {
                    stock,
                    status_col,
                    price_col,
                }),
                None => {
                    debug!("Status column {} ({}) has no price column", column_letter(status_col), stock);
                    None
                }
            }
        })
        .collect()
}

/// Report each account whose status says won while the paired price is blank
pub fn find_missing_prices(grid: &Grid, accounts: &[Account], layout: &SheetLayout) -> Vec<MissingRecord> {
    let pairs = pair_status_columns(grid, layout);

    accounts
        .iter()
        .flat_map(|account| {
            pairs.iter().filter_map(move |pair| {
                let status = grid.cell(account.row, pair.status_col).to_string();
                let won = status.contains(&layout.won_token);
                if won && grid.cell(account.row, pair.price_col).is_blank() {
                    Some(MissingRecord {
                        account: account.name.clone(),
                        stock: pair.stock.clone(),
                        row: account.row + 1,
                        col: column_letter(pair.price_col),
                    })
                } else {
                    None
                }
            })
        })
        .collect()
}
