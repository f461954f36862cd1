//! Commission allocator
//!
//! Applies the rule hierarchy to every (account, stock) pair that has a
//! numeric revenue:
//!
//! 1. an override for (account, stock base name) fires on positive revenue
//!    and replaces the tier computation with its fixed amount;
//! 2. otherwise positive revenue earns `round(revenue × tier rate, 2)`;
//! 3. zero or negative revenue earns nothing and its magnitude is a loss,
//!    whether or not an override exists.
//!
//! Pairs whose revenue cell is empty or not a number are skipped entirely.

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::{base_name, Account, AccountSummary, Stock, StockDetail, StockRevenue};
use crate::config::{ResolvedConfig, SpecialCommission};
use crate::sheet::Grid;
use crate::utils::round_money;

/// Results of the allocation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// One summary per account, in account order
    pub accounts: Vec<AccountSummary>,
    /// One entry per revenue-bearing stock, in table order
    pub stocks: Vec<StockRevenue>,
}

/// Build the detail for one pair from its (already rounded) revenue
pub fn compute_detail(
    stock_name: &str,
    revenue: Decimal,
    rate: Decimal,
    special: Option<&SpecialCommission>,
) -> StockDetail {
    let (commission, special) = if revenue > Decimal::ZERO {
        match special {
            Some(s) => (s.amount, Some(s)),
            None => (round_money(revenue * rate), None),
        }
    } else {
        (Decimal::ZERO, None)
    };

    StockDetail {
        stock_name: stock_name.to_string(),
        revenue,
        commission,
        is_special: special.is_some(),
        special_note: special.map(|s| s.note.clone()),
    }
}

/// Revenue of `account` on `stock`, rounded to cents; `None` when the cell
/// is not a number or the stock has no revenue column
fn revenue_at(grid: &Grid, account: &Account, stock: &Stock) -> Option<Decimal> {
    let col = stock.revenue_col?;
    grid.cell(account.row, col).as_number().map(round_money)
}

/// Allocate commission for every account over every revenue-bearing stock
pub fn allocate(
    grid: &Grid,
    stocks: &[Stock],
    accounts: &[Account],
    config: &ResolvedConfig,
) -> Allocation {
    let priced: Vec<&Stock> = stocks.iter().filter(|s| s.revenue_col.is_some()).collect();

    let stock_revenues: Vec<StockRevenue> = priced
        .iter()
        .filter_map(|stock| {
            let col = stock.revenue_col?;
            let revenue = accounts
                .iter()
                .filter_map(|account| revenue_at(grid, account, stock))
                .sum::<Decimal>();
            Some(StockRevenue {
                name: stock.name.clone(),
                revenue: round_money(revenue),
                col_index: col,
            })
        })
        .collect();

    let mut summaries = Vec::with_capacity(accounts.len());
    for account in accounts {
        let tier = config.tier_for(&account.name);
        let mut summary = AccountSummary::new(
            account.name.clone(),
            tier.rate,
            tier.label.clone(),
            config.group_for(&account.name).map(str::to_string),
        );

        for stock in &priced {
            let Some(revenue) = revenue_at(grid, account, stock) else {
                continue;
            };
            let special = config.override_for(&account.name, base_name(&stock.name));
            let detail = compute_detail(&stock.name, revenue, tier.rate, special);
            if detail.is_special {
                debug!(
                    "Override for {} on {}: {}",
                    account.name, stock.name, detail.commission
                );
            }
            summary.push(detail);
        }

        summaries.push(summary.finish());
    }

    info!(
        "Allocated commission for {} accounts over {} priced stocks",
        summaries.len(),
        stock_revenues.len()
    );

    Allocation {
        accounts: summaries,
        stocks: stock_revenues,
    }
}
