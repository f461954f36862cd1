// Import module - profit/loss workbook reader

pub mod workbook_excel;

use anyhow::{anyhow, Result};
use std::path::Path;
use tracing::info;

use crate::sheet::Grid;

/// Load the profit/loss workbook, checking the extension first so an
/// unsupported file fails with a readable message instead of a zip error
pub fn load_workbook<P: AsRef<Path>>(file_path: P) -> Result<Grid> {
    let path = file_path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| anyhow!("File has no extension: {}", path.display()))?
        .to_lowercase();

    info!("Importing workbook: {:?} (type: {})", path, extension);

    match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => workbook_excel::parse_workbook_excel(path),
        _ => Err(anyhow!(
            "Unsupported file format: {}. Supported formats: .xlsx, .xlsm, .xls, .ods",
            extension
        )),
    }
}
