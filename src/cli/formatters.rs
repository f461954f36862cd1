//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of data calculation from presentation.

use colored::Colorize;
use ipo_commission::allocation::{MissingRecord, RangeSummary};
use ipo_commission::reports::Report;
use ipo_commission::utils::{format_amount, format_yuan};
use itertools::Itertools;
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

fn signed(value: Decimal) -> String {
    let text = format_amount(value);
    if value >= Decimal::ZERO {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Headline totals shown by every command
pub fn format_headline(report: &Report) -> String {
    let s = &report.summary;
    let mut output = String::new();
    output.push_str(&format!("\n{} Commission Summary\n", "📊".cyan().bold()));
    output.push_str(&format!("{}\n", "━".repeat(60).bright_black()));
    output.push_str(&format!("{:<20} {}\n", "Total revenue:".bold(), signed(s.total_revenue)));
    output.push_str(&format!("{:<20} {}\n", "Total commission:".bold(), format_yuan(s.total_commission)));
    output.push_str(&format!("{:<20} {}\n", "Total loss:".bold(), format_yuan(s.total_loss)));
    output.push_str(&format!("{:<20} {}\n", "Stocks:".bold(), s.total_stocks));
    output.push_str(&format!("{:<20} {}\n", "Accounts:".bold(), s.total_accounts));
    output.push_str(&format!("{:<20} {}\n", "Missing prices:".bold(), report.missing_records.len()));
    output.push_str(&format!("{:<20} {}\n", "Generated at:".bold(), report.generated_at));
    output
}

/// Per-account table, highest commission first
pub fn format_accounts_table(report: &Report) -> String {
    #[derive(Tabled)]
    struct AccountRow {
        #[tabled(rename = "Account")]
        account: String,
        #[tabled(rename = "Tier")]
        tier: String,
        #[tabled(rename = "Group")]
        group: String,
        #[tabled(rename = "Revenue")]
        revenue: String,
        #[tabled(rename = "Commission")]
        commission: String,
        #[tabled(rename = "Loss")]
        loss: String,
        #[tabled(rename = "Overrides")]
        overrides: String,
    }

    let rows: Vec<AccountRow> = report
        .accounts
        .iter()
        .sorted_by(|a, b| b.total_commission.cmp(&a.total_commission))
        .map(|a| AccountRow {
            account: a.account.clone(),
            tier: a.rate_group.clone(),
            group: a.management_group.clone().unwrap_or_else(|| "-".to_string()),
            revenue: signed(a.total_revenue),
            commission: format_amount(a.total_commission),
            loss: format_amount(a.total_loss),
            overrides: a
                .stocks
                .iter()
                .filter(|d| d.is_special)
                .map(|d| d.stock_name.as_str())
                .join(", "),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(3..6), Alignment::right());
    format!("\n{}\n", table)
}

/// Range re-sum table; empty string when no range is configured
pub fn format_range_table(ranges: &[RangeSummary]) -> String {
    if ranges.is_empty() {
        return String::new();
    }

    #[derive(Tabled)]
    struct RangeRow {
        #[tabled(rename = "Account")]
        account: String,
        #[tabled(rename = "Tier")]
        tier: String,
        #[tabled(rename = "Range revenue")]
        revenue: String,
        #[tabled(rename = "Range commission")]
        commission: String,
        #[tabled(rename = "Extra stock")]
        extra: String,
    }

    let rows: Vec<RangeRow> = ranges
        .iter()
        .map(|r| RangeRow {
            account: r.account.clone(),
            tier: r.rate_group.clone(),
            revenue: signed(r.range_revenue),
            commission: format_amount(r.range_commission),
            extra: if r.has_extra_stock { "✓".to_string() } else { "-".to_string() },
        })
        .collect();

    let total: Decimal = ranges.iter().map(|r| r.range_commission).sum();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(2..4), Alignment::right());
    format!(
        "\n{} Range commission\n{}\n{:<20} {}\n",
        "📐".cyan().bold(),
        table,
        "Range total:".bold(),
        format_yuan(total)
    )
}

/// Missing sale price records with their cell locations
pub fn format_missing_table(records: &[MissingRecord]) -> String {
    if records.is_empty() {
        return format!(
            "{} No missing records: every allotted subscription has a sale price\n",
            "✓".green().bold()
        );
    }

    #[derive(Tabled)]
    struct MissingRow {
        #[tabled(rename = "Account")]
        account: String,
        #[tabled(rename = "Stock")]
        stock: String,
        #[tabled(rename = "Cell")]
        cell: String,
    }

    let rows: Vec<MissingRow> = records
        .iter()
        .map(|r| MissingRow {
            account: r.account.clone(),
            stock: r.stock.clone(),
            cell: format!("{}{}", r.col, r.row),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    format!(
        "\n{} {} allotted subscription(s) without a sale price\n{}\n",
        "⚠".yellow().bold(),
        records.len(),
        table
    )
}
