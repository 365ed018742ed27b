// Excel exports of Microsoft Forms (or any .xlsx roster).

use calamine::{open_workbook, DataType, Reader, Xlsx};

use prefill_engine::table::RawTable;

use crate::links::{io_common::cell_to_string, *};

/// Reads a worksheet as a table. The first row is the header.
///
/// Rows in which every cell is empty are skipped: spreadsheets often carry
/// formatted but empty rows at the end.
pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> LinksResult<RawTable> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyExcelSnafu { path })?
        .iter()
        .map(cell_to_string)
        .collect();
    debug!("read_excel_table: header: {:?}", header);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        if row.iter().all(|c| *c == DataType::Empty) {
            debug!("read_excel_table: skipping empty row {}", idx + 2);
            continue;
        }
        rows.push(row.iter().map(cell_to_string).collect());
    }
    Ok(RawTable::new(header, rows))
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> LinksResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                name: worksheet_name,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!("get_range: using worksheet {:?}", worksheet_name);
                Ok(wrange.clone())
            }
            [(worksheet_name, wrange), ..] => {
                warn!(
                    "{} has {} worksheets, using the first one ({:?})",
                    path,
                    all_worksheets.len(),
                    worksheet_name
                );
                Ok(wrange.clone())
            }
        }
    }
}
