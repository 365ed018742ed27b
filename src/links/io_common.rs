// Primitives shared by the Excel and CSV readers.

use std::path::Path;

use calamine::DataType;
use prefill_engine::table::RawTable;

use crate::links::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TableFormat {
    Excel,
    Csv,
}

/// The format of a table file, from its extension. Anything that is not a
/// spreadsheet is read as CSV.
pub fn table_format(path: &str) -> TableFormat {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("xlsx") | Some("xlsm") => TableFormat::Excel,
        _ => TableFormat::Csv,
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Reads any supported table. The worksheet name only applies to Excel files.
pub fn read_table(path: &str, worksheet_name: Option<&str>) -> LinksResult<RawTable> {
    info!("Reading {}", simplify_file_name(path));
    let table = match table_format(path) {
        TableFormat::Excel => io_msforms::read_excel_table(path, worksheet_name)?,
        TableFormat::Csv => io_csv::read_csv_table(path)?,
    };
    info!(
        "  Found {} rows in {}",
        table.rows.len(),
        simplify_file_name(path)
    );
    Ok(table)
}

/// The text of a spreadsheet cell. Codes typed as numbers come back without a
/// trailing `.0`.
pub fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        DataType::DateTime(f) => cell
            .as_datetime()
            .map(|d| d.to_string())
            .unwrap_or_else(|| f.to_string()),
        other => format!("{:?}", other),
    }
}
