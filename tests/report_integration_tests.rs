//! Integration tests for the commission report
//!
//! These tests go through a real .xlsx file:
//! - workbook import and column segmentation
//! - tier rates, overrides and loss handling
//! - range re-sums with the extra stock
//! - missing sale price detection
//! - reconciliation of the rounding mode against reference totals


use anyhow::Result;
use chrono::NaiveDate;
use ipo_commission::allocation::{MissingRecord, StockDetail};
use ipo_commission::config::CommissionConfig;
use ipo_commission::error::{RangeError, StructureError};
use ipo_commission::importers::load_workbook;
use ipo_commission::reports::{build_report, write_report_file, Report};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use workbook_helpers::{standard_rows, write_workbook, Fixture, STANDARD_CONFIG, V};

fn run(fixture: &Fixture) -> Result<Report> {
    let grid = load_workbook(fixture.workbook())?;
    let config = CommissionConfig::load(fixture.config())?;
    let at = NaiveDate::from_ymd_opt(2025, 10, 19)
        .unwrap()
        .and_hms_opt(20, 15, 0)
        .unwrap();
    build_report(&grid, &config, at)
}

fn detail<'a>(report: &'a Report, account: &str, stock: &str) -> &'a StockDetail {
    report
        .accounts
        .iter()
        .find(|a| a.account == account)
        .and_then(|a| a.stocks.iter().find(|d| d.stock_name == stock))
        .unwrap_or_else(|| panic!("no detail for {} / {}", account, stock))
}

#[test]
fn test_tier_rate_and_loss_example() -> Result<()> {
    let report = run(&Fixture::standard()?)?;

    let x = detail(&report, "A", "X");
    assert_eq!(x.revenue, dec!(1000));
    assert_eq!(x.commission, dec!(300.00));

    let y = detail(&report, "A", "Y");
    assert_eq!(y.revenue, dec!(-200));
    assert_eq!(y.commission, Decimal::ZERO);

    let a = &report.accounts[0];
    assert_eq!(a.account, "A");
    assert_eq!(a.rate, dec!(0.30));
    assert_eq!(a.rate_group, "30%");
    assert_eq!(a.management_group.as_deref(), Some("王峰管理账户"));
    assert_eq!(a.total_loss, dec!(200.00));
    Ok(())
}

#[test]
fn test_override_replaces_rate_multiply() -> Result<()> {
    let report = run(&Fixture::standard()?)?;

    // 30% of 1000.50 would be 300.15
    let z = detail(&report, "A", "Z(07.25)");
    assert_eq!(z.revenue, dec!(1000.50));
    assert_eq!(z.commission, dec!(300));
    assert!(z.is_special);
    assert_eq!(z.special_note.as_deref(), Some("乙组资金固定分配"));

    let a = &report.accounts[0];
    assert_eq!(a.total_revenue, dec!(1800.50));
    assert_eq!(a.total_commission, dec!(600.00));
    Ok(())
}

#[test]
fn test_rounding_reconciles_with_reference_totals() -> Result<()> {
    // Reference figures prepared by hand with spreadsheet ROUND():
    //   B: X 100.7 × 35% = 35.245 -> 35.25 (round-half-even would give 35.24)
    //      Z 20 × 35% = 7.00, W 50 × 35% = 17.50
    let report = run(&Fixture::standard()?)?;

    assert_eq!(detail(&report, "B", "X").commission, dec!(35.25));
    let b = &report.accounts[1];
    assert_eq!(b.total_revenue, dec!(170.70));
    assert_eq!(b.total_commission, dec!(59.75));
    assert_eq!(b.total_loss, dec!(0));

    assert_eq!(report.summary.total_revenue, dec!(1971.20));
    assert_eq!(report.summary.total_commission, dec!(659.75));
    assert_eq!(report.summary.total_loss, dec!(200.00));
    assert_eq!(report.summary.total_stocks, 4);
    assert_eq!(report.summary.total_accounts, 2);
    Ok(())
}

#[test]
fn test_account_and_stock_axes_agree() -> Result<()> {
    let report = run(&Fixture::standard()?)?;

    let by_account: Decimal = report.accounts.iter().map(|a| a.total_revenue).sum();
    let by_stock: Decimal = report.stocks.iter().map(|s| s.revenue).sum();
    assert_eq!(by_account, by_stock);
    assert_eq!(by_stock, report.summary.total_revenue);

    let names: Vec<_> = report.stocks.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["X", "Y", "Z(07.25)", "W"]);
    assert_eq!(report.stocks[0].col_index, 3);
    assert_eq!(report.stocks[0].revenue, dec!(1100.70));
    Ok(())
}

#[test]
fn test_range_with_extra_stock() -> Result<()> {
    let report = run(&Fixture::standard()?)?;
    assert_eq!(report.special_range.len(), 2);

    let a = &report.special_range[0];
    assert_eq!(a.account, "A");
    assert_eq!(a.range_revenue, dec!(800.00));
    assert_eq!(a.range_commission, dec!(300.00));
    assert!(!a.has_extra_stock);

    let b = &report.special_range[1];
    assert!(b.has_extra_stock);
    assert_eq!(b.range_revenue, dec!(120.70));
    assert_eq!(b.range_commission, dec!(42.25));
    let stocks: Vec<_> = b.stocks.iter().map(|d| d.stock_name.as_str()).collect();
    assert_eq!(stocks, vec!["X", "Z(07.25)"]);
    Ok(())
}

#[test]
fn test_won_without_price_is_missing() -> Result<()> {
    let report = run(&Fixture::standard()?)?;
    assert_eq!(
        report.missing_records,
        vec![MissingRecord {
            account: "B".to_string(),
            stock: "W".to_string(),
            row: 5,
            col: "L".to_string(),
        }]
    );
    Ok(())
}

#[test]
fn test_aggregate_rows_are_not_accounts() -> Result<()> {
    let report = run(&Fixture::standard()?)?;
    assert!(report.accounts.iter().all(|a| a.account != "收益总计"));
    assert_eq!(report.commission_rates["35%"], vec!["B"]);
    assert_eq!(report.commission_rates["30%"], vec!["A"]);
    Ok(())
}

#[test]
fn test_missing_range_boundary_is_fatal() -> Result<()> {
    let config = STANDARD_CONFIG.replace("end = \"Y\"", "end = \"壁仞科技\"");
    let fixture = Fixture::with(&standard_rows(), &config)?;

    let err = run(&fixture).unwrap_err();
    assert_eq!(
        err.downcast_ref::<RangeError>(),
        Some(&RangeError::BoundaryNotFound {
            which: "end",
            label: "壁仞科技".to_string(),
        })
    );
    Ok(())
}

#[test]
fn test_sheet_without_revenue_headers_is_fatal() -> Result<()> {
    let rows = vec![
        vec![V::T("账户"), V::T("X"), V::Blank],
        vec![V::T("账户"), V::T("中签情况"), V::T("卖出价格")],
        vec![],
        vec![V::T("A"), V::T("已中签"), V::N(3.0)],
    ];
    let fixture = Fixture::with(&rows, STANDARD_CONFIG)?;

    let err = run(&fixture).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StructureError>(),
        Some(StructureError::NoRevenueColumn { .. })
    ));
    Ok(())
}

#[test]
fn test_report_file_round_trips_as_json() -> Result<()> {
    let fixture = Fixture::standard()?;
    let report = run(&fixture)?;
    let path = fixture.dir.path().join("report_data.json");
    write_report_file(&report, &path)?;

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(json["generated_at"], "2025-10-19 20:15:00");
    assert_eq!(json["summary"]["total_commission"].as_f64(), Some(659.75));
    assert_eq!(json["special_range"][1]["has_zijin_extra"], true);
    assert_eq!(json["special_commissions"]["A_Z"].as_f64(), Some(300.0));
    assert_eq!(json["missing_records"][0]["col"], "L");
    assert_eq!(json["account_groups"]["王峰管理账户"][0], "A");
    Ok(())
}

#[test]
fn test_shipped_config_is_valid() -> Result<()> {
    let config = CommissionConfig::load("config/commission.toml")?;
    let resolved = config.resolve(["王峰", "叶通", "李文博", "张静"])?;

    assert_eq!(resolved.tier_for("王峰").rate, dec!(0));
    assert_eq!(resolved.tier_for("叶通").rate, dec!(0.30));
    assert_eq!(resolved.tier_for("李文博").rate, dec!(0.50));
    assert_eq!(resolved.tier_for("张静").label, "35%");
    assert_eq!(resolved.group_for("张静"), Some("文博管理账户"));
    assert_eq!(resolved.overrides().len(), 4);
    assert!(config.range.is_some());
    Ok(())
}

#[test]
fn test_empty_workbook_has_no_worksheet_rows() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("empty.xlsx");
    write_workbook(&path, &[])?;

    let grid = load_workbook(&path)?;
    let config = CommissionConfig::from_toml_str(STANDARD_CONFIG)?;
    let at = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let err = build_report(&grid, &config, at).unwrap_err();
    assert_eq!(
        err.downcast_ref::<StructureError>(),
        Some(&StructureError::MissingHeaderRows { found: 0 })
    );
    Ok(())
}
