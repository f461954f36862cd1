// Allocation engine - commission per account and stock, range re-sums, completeness checks

pub mod accounts;
pub mod allocator;
pub mod completeness;
pub mod range;
pub mod segment;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::utils::round_money;

pub use accounts::enumerate_accounts;
pub use allocator::{allocate, compute_detail, Allocation};
pub use completeness::{find_missing_prices, pair_status_columns, StatusPricePair};
pub use range::aggregate_ranges;
pub use segment::segment_stocks;

/// A stock's column block in the workbook
#[derive(Debug, Clone, PartialEq)]
pub struct Stock {
    /// Marker text, possibly with a date suffix like "蓝思科技(07.09)"
    pub name: String,
    pub start_col: usize,
    pub end_col: usize,
    /// `None` when the block has no revenue sub-header
    pub revenue_col: Option<usize>,
}

impl Stock {
    /// Name without the parenthesized suffix
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }
}

/// Strip everything from the first `(`: "维立志博(07.25)" -> "维立志博"
pub fn base_name(name: &str) -> &str {
    name.split('(').next().unwrap_or(name)
}

/// An account row of the workbook
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub name: String,
    /// 0-based grid row
    pub row: usize,
}

/// Outcome for one (account, stock) pair with numeric revenue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockDetail {
    pub stock_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub commission: Decimal,
    pub is_special: bool,
    pub special_note: Option<String>,
}

impl StockDetail {
    /// Positive revenue earns commission; anything else is a loss
    pub fn is_profit(&self) -> bool {
        self.revenue > Decimal::ZERO
    }
}

/// Per-account totals plus the details they were summed from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub account: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    /// Tier label, e.g. "35%"
    pub rate_group: String,
    pub management_group: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_commission: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_loss: Decimal,
    pub stocks: Vec<StockDetail>,
}

impl AccountSummary {
    pub fn new(
        account: impl Into<String>,
        rate: Decimal,
        rate_group: impl Into<String>,
        management_group: Option<String>,
    ) -> Self {
        Self {
            account: account.into(),
            rate,
            rate_group: rate_group.into(),
            management_group,
            total_revenue: Decimal::ZERO,
            total_commission: Decimal::ZERO,
            total_loss: Decimal::ZERO,
            stocks: Vec::new(),
        }
    }

    /// Accumulate one detail into exactly one of commission or loss
    pub fn push(&mut self, detail: StockDetail) {
        self.total_revenue += detail.revenue;
        if detail.is_profit() {
            self.total_commission += detail.commission;
        } else {
            self.total_loss += detail.revenue.abs();
        }
        self.stocks.push(detail);
    }

    /// Round the running totals to cents
    pub fn finish(mut self) -> Self {
        self.total_revenue = round_money(self.total_revenue);
        self.total_commission = round_money(self.total_commission);
        self.total_loss = round_money(self.total_loss);
        self
    }
}

/// Revenue of one stock summed over all accounts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockRevenue {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    /// 0-based index of the revenue column
    pub col_index: usize,
}

/// Commission and revenue of an account over the configured stock window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSummary {
    pub account: String,
    pub rate_group: String,
    pub management_group: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub range_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub range_commission: Decimal,
    /// Whether the extra stock outside the window was added
    #[serde(rename = "has_zijin_extra")]
    pub has_extra_stock: bool,
    /// Details that contributed, for auditing
    pub stocks: Vec<StockDetail>,
}

/// A won subscription whose sale price cell is empty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingRecord {
    pub account: String,
    pub stock: String,
    /// 1-based row as shown in the spreadsheet
    pub row: usize,
    /// Column letter of the empty price cell
    pub col: String,
}
