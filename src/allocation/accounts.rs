use std::collections::HashSet;
use tracing::warn;

use super::Account;
use crate::config::SheetLayout;
use crate::sheet::{Grid, ACCOUNT_COLUMN};

/// List the accounts in row order.
///
/// Blank names and the reserved aggregate rows are skipped; scanning always
/// runs to the last row of the sheet. A name that appears twice keeps its
/// first row.
pub fn enumerate_accounts(grid: &Grid, layout: &SheetLayout) -> Vec<Account> {
    let first_row = layout.data_start_row.saturating_sub(1);
    let mut seen = HashSet::new();
    let mut accounts = Vec::new();

    for row in first_row..grid.height() {
        let Some(name) = grid.cell(row, ACCOUNT_COLUMN).label() else {
            continue;
        };
        if layout.reserved_rows.iter().any(|r| r == &name) {
            continue;
        }
        if !seen.insert(name.clone()) {
            warn!("Account {} appears again on row {}; keeping the first row", name, row + 1);
            continue;
        }
        accounts.push(Account { name, row });
    }

    accounts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Cell;
    use rust_decimal_macros::dec;

    fn column(values: &[Option<&str>]) -> Grid {
        Grid::from_rows(
            values
                .iter()
                .map(|v| vec![v.map(Cell::text).unwrap_or(Cell::Empty)])
                .collect(),
        )
    }

    #[test]
    fn test_skips_headers_reserved_and_blank_rows() {
        let grid = column(&[
            Some("账户"),
            Some("账户"),
            Some("说明"),
            Some("叶通"),
            None,
            Some("收益总计"),
            Some("  "),
            Some("芦川"),
            Some("中签数量总计"),
            Some("杨凯"),
        ]);

        let accounts = enumerate_accounts(&grid, &SheetLayout::default());
        let names: Vec<_> = accounts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["叶通", "芦川", "杨凯"]);
        assert_eq!(accounts[0].row, 3);
        assert_eq!(accounts[2].row, 9);
    }

    #[test]
    fn test_duplicate_name_keeps_first_row() {
        let grid = column(&[None, None, None, Some("叶通"), Some("芦川"), Some("叶通")]);
        let accounts = enumerate_accounts(&grid, &SheetLayout::default());
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0], Account { name: "叶通".to_string(), row: 3 });
    }

    #[test]
    fn test_reserved_labels_match_exactly() {
        let grid = column(&[None, None, None, Some("收益总计(备注)")]);
        let accounts = enumerate_accounts(&grid, &SheetLayout::default());
        assert_eq!(accounts.len(), 1);
    }

    #[test]
    fn test_numeric_account_cells_become_names() {
        let grid = Grid::from_rows(vec![
            vec![],
            vec![],
            vec![],
            vec![Cell::Number(dec!(1001))],
        ]);
        let accounts = enumerate_accounts(&grid, &SheetLayout::default());
        assert_eq!(accounts[0].name, "1001");
    }
}
