//! IPO Commission - commission allocation for IPO subscription accounts
//!
//! This library reads a per-stock profit/loss workbook, allocates commission
//! per account under rate tiers and fixed overrides, re-sums a stock window
//! for selected accounts, and flags allotments without a recorded sale price.

pub mod allocation;
pub mod config;
pub mod error;
pub mod importers;
pub mod reports;
pub mod sheet;
pub mod utils;
