// Primitives for reading and writing CSV files.

use std::fs;

use prefill_engine::table::RawTable;

use crate::links::*;

/// Reads a CSV file with a header row. Rows may have fewer cells than the header.
pub fn read_csv_table(path: &str) -> LinksResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;
    let header: Vec<String> = rdr
        .headers()
        .context(ReadingCsvSnafu { path, lineno: 1usize })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_table: header: {:?}", header);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(ReadingCsvSnafu { path, lineno })?;
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }
    Ok(RawTable::new(header, rows))
}

/// Replaces the file at `path` with the table.
///
/// The table is first written next to the target, then renamed over it: a failure
/// while writing leaves the previous version in place.
pub fn write_csv_table(path: &str, table: &RawTable) -> LinksResult<()> {
    let tmp_path = format!("{}.tmp", path);
    {
        let mut wtr = csv::Writer::from_path(&tmp_path).context(WritingCsvSnafu {
            path: tmp_path.clone(),
        })?;
        wtr.write_record(&table.header).context(WritingCsvSnafu {
            path: tmp_path.clone(),
        })?;
        for row in table.rows.iter() {
            wtr.write_record(row).context(WritingCsvSnafu {
                path: tmp_path.clone(),
            })?;
        }
        wtr.flush().context(WritingFileSnafu {
            path: tmp_path.clone(),
        })?;
    }
    fs::rename(&tmp_path, path).context(WritingFileSnafu { path })?;
    debug!("write_csv_table: wrote {} rows to {}", table.rows.len(), path);
    Ok(())
}
