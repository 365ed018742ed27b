/// A table of strings with a header row, as read from a spreadsheet or a CSV file.
///
/// Rows may be shorter than the header: the missing cells are read as empty.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> RawTable {
        RawTable { header, rows }
    }

    /// The position of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// The names from `names` that are not in the header, in the given order.
    pub fn missing_columns(&self, names: &[&str]) -> Vec<String> {
        names
            .iter()
            .filter(|n| self.column_index(n).is_none())
            .map(|n| n.to_string())
            .collect()
    }
}

pub(crate) fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.as_str()).unwrap_or("")
}
