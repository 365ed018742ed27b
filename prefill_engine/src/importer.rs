use log::debug;

use crate::config::{ColumnMap, EngineError};
use crate::directory::canonicalize;
use crate::table::{cell, RawTable};

/// One row of the response table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResponseRecord {
    pub raw_code: String,
    pub raw_name: String,
    pub raw_text: String,
}

impl ResponseRecord {
    pub fn canonical_code(&self) -> String {
        canonicalize(&self.raw_code)
    }
}

/// Reads the responses out of a table, using the configured column names.
///
/// Fails if any of the three columns is absent, naming all the absent ones.
/// The records are produced lazily, in the order of the rows. Cells are trimmed;
/// a missing cell is read as an empty string.
pub fn import<'a>(
    table: &'a RawTable,
    columns: &ColumnMap,
) -> Result<impl Iterator<Item = ResponseRecord> + 'a, EngineError> {
    let missing = table.missing_columns(&columns.required());
    if !missing.is_empty() {
        return Err(EngineError::MissingColumns {
            missing,
            available: table.header.clone(),
        });
    }
    let idx = |name: &str| table.column_index(name).unwrap_or_default();
    let (code_idx, name_idx, text_idx) = (
        idx(&columns.code_column),
        idx(&columns.name_column),
        idx(&columns.text_column),
    );
    debug!(
        "import: code column {}, name column {}, text column {}",
        code_idx, name_idx, text_idx
    );

    Ok(table.rows.iter().map(move |row| ResponseRecord {
        raw_code: cell(row, code_idx).trim().to_string(),
        raw_name: cell(row, name_idx).trim().to_string(),
        raw_text: cell(row, text_idx).trim().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn columns() -> ColumnMap {
        ColumnMap {
            code_column: "Student Code".to_string(),
            name_column: "Name1".to_string(),
            text_column: "Newsletter Content".to_string(),
        }
    }

    #[test]
    fn reads_rows_in_order() {
        let t = RawTable::new(
            strings(&["ID", "Start time", "Newsletter Content", "Name1", "Student Code"]),
            vec![
                strings(&["1", "t", "  some text ", " Alice", "stu001 "]),
                strings(&["2", "t", "", "Bob", "STU002"]),
                strings(&["3", "t"]),
            ],
        );
        let records: Vec<ResponseRecord> = import(&t, &columns()).unwrap().collect();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            ResponseRecord {
                raw_code: "stu001".to_string(),
                raw_name: "Alice".to_string(),
                raw_text: "some text".to_string(),
            }
        );
        assert_eq!(records[0].canonical_code(), "STU001");
        assert_eq!(records[1].raw_text, "");
        assert_eq!(records[2].raw_code, "");
        assert_eq!(records[2].raw_name, "");
    }

    #[test]
    fn names_every_missing_column() {
        let t = RawTable::new(strings(&["Student Code", "Name"]), vec![]);
        let res = import(&t, &columns());
        match res {
            Err(EngineError::MissingColumns { missing, available }) => {
                assert_eq!(missing, strings(&["Name1", "Newsletter Content"]));
                assert_eq!(available, strings(&["Student Code", "Name"]));
            }
            Err(e) => panic!("unexpected error {:?}", e),
            Ok(_) => panic!("expected an error"),
        };
    }
}
