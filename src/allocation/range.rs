//! Range aggregator
//!
//! Re-sums commission and revenue for a fixed list of accounts over a window
//! of stocks in table order, plus one extra stock for some of them. The sums
//! are rebuilt from the stock details rather than derived from the account
//! totals.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::{AccountSummary, RangeSummary, Stock};
use crate::config::RangeConfig;
use crate::error::RangeError;
use crate::utils::round_money;

/// Index of the first stock whose name contains `label`
fn locate(stocks: &[Stock], label: &str) -> Option<usize> {
    stocks.iter().position(|s| s.name.contains(label))
}

/// Index of the stock with exactly this name
fn index_of(stocks: &[Stock], name: &str) -> Option<usize> {
    stocks.iter().position(|s| s.name == name)
}

/// Resolve the window boundaries, failing instead of producing an empty window
pub fn resolve_window(stocks: &[Stock], range: &RangeConfig) -> Result<(usize, usize), RangeError> {
    let start = locate(stocks, &range.start).ok_or_else(|| RangeError::BoundaryNotFound {
        which: "start",
        label: range.start.clone(),
    })?;
    let end = locate(stocks, &range.end).ok_or_else(|| RangeError::BoundaryNotFound {
        which: "end",
        label: range.end.clone(),
    })?;
    if start > end {
        return Err(RangeError::InvertedWindow {
            start: range.start.clone(),
            start_idx: start,
            end: range.end.clone(),
            end_idx: end,
        });
    }
    Ok((start, end))
}

/// Aggregate the window for each configured account present in `summaries`
pub fn aggregate_ranges(
    stocks: &[Stock],
    summaries: &[AccountSummary],
    range: &RangeConfig,
) -> Result<Vec<RangeSummary>, RangeError> {
    let (start, end) = resolve_window(stocks, range)?;
    debug!(
        "Range window: {} (#{}) to {} (#{})",
        stocks[start].name, start, stocks[end].name, end
    );

    let extra_idx = match &range.extra_stock {
        Some(label) => {
            let idx = locate(stocks, label);
            if idx.is_none() {
                warn!("Extra range stock '{}' not found; no extra will be added", label);
            }
            idx
        }
        None => None,
    };

    let mut results = Vec::new();
    for account in &range.accounts {
        let Some(summary) = summaries.iter().find(|s| &s.account == account) else {
            debug!("Range account {} is not in the sheet", account);
            continue;
        };

        let mut range_revenue = Decimal::ZERO;
        let mut range_commission = Decimal::ZERO;
        let mut contributing = Vec::new();

        for detail in &summary.stocks {
            let Some(idx) = index_of(stocks, &detail.stock_name) else {
                continue;
            };
            if (start..=end).contains(&idx) {
                range_revenue += detail.revenue;
                range_commission += detail.commission;
                contributing.push(detail.clone());
            }
        }

        let mut has_extra_stock = false;
        if range.extra_accounts.contains(account) {
            if let Some(extra) = extra_idx {
                let extra_name = &stocks[extra].name;
                if (start..=end).contains(&extra) {
                    debug!("Extra stock {} is inside the window; not added twice", extra_name);
                } else if let Some(detail) =
                    summary.stocks.iter().find(|d| &d.stock_name == extra_name)
                {
                    range_revenue += detail.revenue;
                    range_commission += detail.commission;
                    contributing.push(detail.clone());
                    has_extra_stock = true;
                }
            }
        }

        results.push(RangeSummary {
            account: summary.account.clone(),
            rate_group: summary.rate_group.clone(),
            management_group: summary.management_group.clone(),
            range_revenue: round_money(range_revenue),
            range_commission: round_money(range_commission),
            has_extra_stock,
            stocks: contributing,
        });
    }

    info!("Range aggregation covers {} accounts", results.len());
    Ok(results)
}
