// Reports module - commission report assembly and JSON output

pub mod json;
pub mod report;

pub use json::{write_report, write_report_file};
pub use report::{build_report, Report, ReportSummary, TIMESTAMP_FORMAT};
