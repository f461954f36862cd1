//! Error handling for the commission allocator
//!
//! Defines the typed failures of each stage and establishes a unified Result
//! type using anyhow for context chaining and error propagation.

use thiserror::Error;

/// Invalid commission configuration, detected when the config is resolved
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("tier '{label}' has rate {rate}, expected a value between 0 and 1")]
    InvalidRate { label: String, rate: String },

    #[error("tier label '{0}' is used more than once")]
    DuplicateTierLabel(String),

    #[error("account '{account}' is listed in both tier '{first}' and tier '{second}'")]
    AccountInMultipleTiers {
        account: String,
        first: String,
        second: String,
    },

    #[error("override for account '{account}' on stock '{stock}' is defined more than once")]
    DuplicateOverride { account: String, stock: String },

    #[error("override for account '{account}' on stock '{stock}' has negative amount {amount}")]
    NegativeOverride {
        account: String,
        stock: String,
        amount: String,
    },
}

/// The workbook does not follow the expected layout
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructureError {
    #[error("workbook contains no worksheet")]
    NoWorksheet,

    #[error("sheet has {found} row(s); the stock marker row (1) and sub-header row (2) are required")]
    MissingHeaderRows { found: usize },

    #[error("found {stocks} stock block(s) but none has a sub-header containing '{token}'")]
    NoRevenueColumn { stocks: usize, token: String },
}

/// Range aggregation could not resolve its stock window
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("range {which} boundary '{label}' does not match any stock")]
    BoundaryNotFound { which: &'static str, label: String },

    #[error("range start '{start}' (stock #{start_idx}) comes after range end '{end}' (stock #{end_idx})")]
    InvertedWindow {
        start: String,
        start_idx: usize,
        end: String,
        end_idx: usize,
    },
}

/// Result type alias for allocator operations
pub type Result<T> = anyhow::Result<T>;
