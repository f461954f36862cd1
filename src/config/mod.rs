//! Commission configuration
//!
//! Everything that used to be a name list baked into the report script lives
//! here: rate tiers, management groups, fixed-amount overrides and the range
//! window. The file is plain TOML; [`CommissionConfig::resolve`] turns it into
//! an immutable [`ResolvedConfig`] once the sheet's accounts are known.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;

/// Note attached to a stock detail when an override replaced the tier rate
pub const DEFAULT_OVERRIDE_NOTE: &str = "乙组资金固定分配";

/// Configuration file as written on disk
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommissionConfig {
    /// Workbook to read when `--input` is not given
    #[serde(default)]
    pub input: Option<PathBuf>,
    /// JSON report destination when `--output` is not given
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub sheet: SheetLayout,
    /// Tier for every account not listed in `tiers`
    pub default_tier: DefaultTier,
    #[serde(default)]
    pub tiers: Vec<TierConfig>,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    #[serde(default)]
    pub overrides: Vec<OverrideConfig>,
    #[serde(default)]
    pub range: Option<RangeConfig>,
}

/// Structural tokens of the workbook
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetLayout {
    /// First data row, 1-based as shown in the spreadsheet
    pub data_start_row: usize,
    /// Sub-header text marking a stock's revenue column
    pub revenue_token: String,
    /// Sub-header text marking a subscription status column
    pub status_token: String,
    /// Status text meaning the subscription was allotted
    pub won_token: String,
    /// Sub-header text marking a sale price column
    pub price_token: String,
    /// Aggregate rows in the account column, matched exactly
    pub reserved_rows: Vec<String>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            data_start_row: 4,
            revenue_token: "收益".to_string(),
            status_token: "中签情况".to_string(),
            won_token: "已中签".to_string(),
            price_token: "卖出价格".to_string(),
            reserved_rows: vec![
                "所有账户总收益".to_string(),
                "收益总计".to_string(),
                "中签数量总计".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultTier {
    pub label: String,
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    pub label: String,
    pub rate: Decimal,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideConfig {
    pub account: String,
    /// Stock base name, without the parenthesized date suffix
    pub stock: String,
    pub amount: Decimal,
    #[serde(default)]
    pub note: Option<String>,
}

/// Window of stocks (table order, inclusive) re-summed for a subset of accounts
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeConfig {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub accounts: Vec<String>,
    /// Stock added on top of the window for `extra_accounts`
    #[serde(default)]
    pub extra_stock: Option<String>,
    #[serde(default)]
    pub extra_accounts: Vec<String>,
}

impl CommissionConfig {
    /// Load and parse a TOML config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse TOML")
    }

    /// Default location: `<config dir>/ipo-commission/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dir_spec::config_home().map(|dir| dir.join("ipo-commission").join("config.toml"))
    }

    /// Validate the config against the accounts found in the sheet and
    /// compute the default tier's membership.
    pub fn resolve<I, S>(&self, accounts: I) -> Result<ResolvedConfig, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tiers = Vec::with_capacity(self.tiers.len() + 1);
        let mut tier_of: HashMap<String, usize> = HashMap::new();

        for tier in &self.tiers {
            check_rate(&tier.label, tier.rate)?;
            if tiers.iter().any(|t: &Tier| t.label == tier.label) {
                return Err(ConfigError::DuplicateTierLabel(tier.label.clone()));
            }
            let idx = tiers.len();
            for member in &tier.members {
                if let Some(&other) = tier_of.get(member) {
                    if other != idx {
                        return Err(ConfigError::AccountInMultipleTiers {
                            account: member.clone(),
                            first: tiers[other].label.clone(),
                            second: tier.label.clone(),
                        });
                    }
                }
                tier_of.insert(member.clone(), idx);
            }
            tiers.push(Tier {
                label: tier.label.clone(),
                rate: tier.rate,
                members: tier.members.clone(),
                is_default: false,
            });
        }

        let default = &self.default_tier;
        check_rate(&default.label, default.rate)?;
        if tiers.iter().any(|t| t.label == default.label) {
            return Err(ConfigError::DuplicateTierLabel(default.label.clone()));
        }
        let default_members: Vec<String> = accounts
            .into_iter()
            .map(|a| a.as_ref().to_string())
            .filter(|a| !tier_of.contains_key(a))
            .collect();
        debug!(
            "Default tier {} covers {} account(s)",
            default.label,
            default_members.len()
        );
        let default_idx = tiers.len();
        tiers.push(Tier {
            label: default.label.clone(),
            rate: default.rate,
            members: default_members,
            is_default: true,
        });

        let mut overrides = Vec::with_capacity(self.overrides.len());
        let mut override_index = HashMap::new();
        for o in &self.overrides {
            if o.amount < Decimal::ZERO {
                return Err(ConfigError::NegativeOverride {
                    account: o.account.clone(),
                    stock: o.stock.clone(),
                    amount: o.amount.to_string(),
                });
            }
            let key = (o.account.clone(), o.stock.clone());
            if override_index.insert(key, overrides.len()).is_some() {
                return Err(ConfigError::DuplicateOverride {
                    account: o.account.clone(),
                    stock: o.stock.clone(),
                });
            }
            overrides.push(SpecialCommission {
                account: o.account.clone(),
                stock: o.stock.clone(),
                amount: o.amount,
                note: o
                    .note
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OVERRIDE_NOTE.to_string()),
            });
        }

        Ok(ResolvedConfig {
            tiers,
            tier_of,
            default_idx,
            groups: self.groups.clone(),
            overrides,
            override_index,
        })
    }
}

fn check_rate(label: &str, rate: Decimal) -> Result<(), ConfigError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(ConfigError::InvalidRate {
            label: label.to_string(),
            rate: rate.to_string(),
        });
    }
    Ok(())
}

/// A commission tier with its final membership
#[derive(Debug, Clone, PartialEq)]
pub struct Tier {
    pub label: String,
    pub rate: Decimal,
    pub members: Vec<String>,
    pub is_default: bool,
}

/// Fixed commission for one (account, stock base name) pair
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialCommission {
    pub account: String,
    pub stock: String,
    pub amount: Decimal,
    pub note: String,
}

impl SpecialCommission {
    /// Key used in the report's override table: `account_stock`
    pub fn key(&self) -> String {
        format!("{}_{}", self.account, self.stock)
    }
}

/// Validated configuration, built once per run and never mutated
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    tiers: Vec<Tier>,
    tier_of: HashMap<String, usize>,
    default_idx: usize,
    groups: Vec<GroupConfig>,
    overrides: Vec<SpecialCommission>,
    override_index: HashMap<(String, String), usize>,
}

impl ResolvedConfig {
    /// Tier of an account; unlisted accounts fall into the default tier
    pub fn tier_for(&self, account: &str) -> &Tier {
        let idx = self.tier_of.get(account).copied().unwrap_or(self.default_idx);
        &self.tiers[idx]
    }

    /// First management group listing the account
    pub fn group_for(&self, account: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.members.iter().any(|m| m == account))
            .map(|g| g.name.as_str())
    }

    pub fn override_for(&self, account: &str, stock_base: &str) -> Option<&SpecialCommission> {
        self.override_index
            .get(&(account.to_string(), stock_base.to_string()))
            .map(|&idx| &self.overrides[idx])
    }

    /// Explicit tiers in config order, default tier last
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn groups(&self) -> &[GroupConfig] {
        &self.groups
    }

    pub fn overrides(&self) -> &[SpecialCommission] {
        &self.overrides
    }
}
