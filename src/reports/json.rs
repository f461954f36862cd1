use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use super::Report;

/// Write the report as pretty-printed UTF-8 JSON to any sink
pub fn write_report<W: Write>(report: &Report, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, report).context("Failed to serialize report")
}

/// Write the report to a file, creating missing parent directories
pub fn write_report_file<P: AsRef<Path>>(report: &Report, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_report(report, &mut writer)?;
    writer.flush().context("Failed to flush report file")?;

    info!("Report written to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportSummary;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn empty_report() -> Report {
        Report {
            generated_at: "2025-10-19 09:30:00".to_string(),
            summary: ReportSummary {
                total_revenue: dec!(0),
                total_stocks: 0,
                total_accounts: 0,
                total_commission: dec!(0),
                total_loss: dec!(0),
            },
            stocks: vec![],
            accounts: vec![],
            special_range: vec![],
            missing_records: vec![],
            commission_rates: BTreeMap::from([("35%".to_string(), vec!["张静".to_string()])]),
            account_groups: BTreeMap::new(),
            special_commissions: BTreeMap::new(),
        }
    }

    #[test]
    fn test_non_ascii_is_written_verbatim() {
        let mut buffer = Vec::new();
        write_report(&empty_report(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("张静"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_write_report_file_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("report_data.json");
        write_report_file(&empty_report(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["generated_at"], "2025-10-19 09:30:00");
        assert_eq!(value["summary"]["total_stocks"], 0);
    }
}
