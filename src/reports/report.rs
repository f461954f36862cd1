//! Commission report assembly
//!
//! Runs the allocation pipeline over a loaded grid and collects everything the
//! dashboard needs into one [`Report`]. Pure: the timestamp is passed in and
//! nothing is printed.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::info;

use crate::allocation::{
    aggregate_ranges, allocate, enumerate_accounts, find_missing_prices, segment_stocks,
    AccountSummary, MissingRecord, RangeSummary, StockRevenue,
};
use crate::config::{CommissionConfig, ResolvedConfig};
use crate::error::StructureError;
use crate::sheet::{Grid, MARKER_ROW, SUBHEADER_ROW};
use crate::utils::round_money;

/// Format of `generated_at`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Headline totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    /// Every stock block, with or without a revenue column
    pub total_stocks: usize,
    pub total_accounts: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_commission: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_loss: Decimal,
}

/// The complete output record; field names are read by the HTML dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub generated_at: String,
    pub summary: ReportSummary,
    pub stocks: Vec<StockRevenue>,
    pub accounts: Vec<AccountSummary>,
    pub special_range: Vec<RangeSummary>,
    pub missing_records: Vec<MissingRecord>,
    /// Tier label -> members, the default tier with its computed members
    pub commission_rates: BTreeMap<String, Vec<String>>,
    pub account_groups: BTreeMap<String, Vec<String>>,
    /// `account_stock` -> fixed amount
    #[serde(serialize_with = "amounts_as_numbers")]
    pub special_commissions: BTreeMap<String, Decimal>,
}

fn amounts_as_numbers<S: Serializer>(
    amounts: &BTreeMap<String, Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(
        amounts
            .iter()
            .map(|(key, amount)| (key, amount.to_f64().unwrap_or_default())),
    )
}

/// Check the sheet's structural contract and run every stage
pub fn build_report(
    grid: &Grid,
    config: &CommissionConfig,
    generated_at: NaiveDateTime,
) -> Result<Report> {
    if grid.height() <= SUBHEADER_ROW {
        return Err(StructureError::MissingHeaderRows {
            found: grid.height(),
        }
        .into());
    }

    let layout = &config.sheet;
    let stocks = segment_stocks(
        &grid.row(MARKER_ROW),
        &grid.row(SUBHEADER_ROW),
        grid.width(),
        &layout.revenue_token,
    );
    if !stocks.is_empty() && stocks.iter().all(|s| s.revenue_col.is_none()) {
        return Err(StructureError::NoRevenueColumn {
            stocks: stocks.len(),
            token: layout.revenue_token.clone(),
        }
        .into());
    }
    info!("Found {} stocks", stocks.len());

    let accounts = enumerate_accounts(grid, layout);
    info!("Found {} accounts", accounts.len());

    let resolved = config
        .resolve(accounts.iter().map(|a| &a.name))
        .context("Invalid commission configuration")?;

    let allocation = allocate(grid, &stocks, &accounts, &resolved);

    let special_range = match &config.range {
        Some(range) => aggregate_ranges(&stocks, &allocation.accounts, range)
            .context("Range aggregation failed")?,
        None => Vec::new(),
    };

    let missing_records = find_missing_prices(grid, &accounts, layout);
    info!("Found {} missing price records", missing_records.len());

    let summary = ReportSummary {
        total_revenue: round_money(allocation.stocks.iter().map(|s| s.revenue).sum()),
        total_stocks: stocks.len(),
        total_accounts: accounts.len(),
        total_commission: round_money(
            allocation.accounts.iter().map(|a| a.total_commission).sum(),
        ),
        total_loss: round_money(allocation.accounts.iter().map(|a| a.total_loss).sum()),
    };

    Ok(Report {
        generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
        summary,
        stocks: allocation.stocks,
        accounts: allocation.accounts,
        special_range,
        missing_records,
        commission_rates: tier_lists(&resolved),
        account_groups: resolved
            .groups()
            .iter()
            .map(|g| (g.name.clone(), g.members.clone()))
            .collect(),
        special_commissions: resolved
            .overrides()
            .iter()
            .map(|o| (o.key(), o.amount))
            .collect(),
    })
}

fn tier_lists(resolved: &ResolvedConfig) -> BTreeMap<String, Vec<String>> {
    resolved
        .tiers()
        .iter()
        .map(|t| (t.label.clone(), t.members.clone()))
        .collect()
}
