//! Column segmenter
//!
//! Row 1 of the workbook only has a value where a stock's column block
//! starts. Each marker closes the previous block one column to its left;
//! the last block runs to the final column.

use tracing::debug;

use super::Stock;
use crate::sheet::{Cell, ACCOUNT_COLUMN};

/// Split the columns into stock blocks and find each block's revenue column.
///
/// `markers` and `subheaders` are the first two rows, padded to `width`.
/// Column A holds account names and never starts a block.
pub fn segment_stocks(
    markers: &[&Cell],
    subheaders: &[&Cell],
    width: usize,
    revenue_token: &str,
) -> Vec<Stock> {
    let mut stocks: Vec<Stock> = Vec::new();

    for col in (ACCOUNT_COLUMN + 1)..width {
        let Some(name) = markers.get(col).and_then(|c| c.label()) else {
            continue;
        };
        if let Some(previous) = stocks.last_mut() {
            previous.end_col = col - 1;
        }
        stocks.push(Stock {
            name,
            start_col: col,
            end_col: width - 1,
            revenue_col: None,
        });
    }

    for stock in &mut stocks {
        stock.revenue_col = (stock.start_col..=stock.end_col).find(|&col| {
            subheaders
                .get(col)
                .is_some_and(|c| c.to_string().contains(revenue_token))
        });
        if stock.revenue_col.is_none() {
            debug!("Stock {} has no '{}' column", stock.name, revenue_token);
        }
    }

    stocks
}
