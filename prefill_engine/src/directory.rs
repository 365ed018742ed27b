use log::{debug, warn};
use std::collections::HashMap;

use crate::config::EngineError;
use crate::table::{cell, RawTable};

pub const CODE_COLUMN: &str = "code";
pub const NAME_COLUMN: &str = "name";
pub const URL_COLUMN: &str = "url";
pub const HAS_RESPONSE_COLUMN: &str = "has_response";
pub const WORD_COUNT_COLUMN: &str = "word_count";

const KNOWN_COLUMNS: [&str; 5] = [
    CODE_COLUMN,
    NAME_COLUMN,
    URL_COLUMN,
    HAS_RESPONSE_COLUMN,
    WORD_COUNT_COLUMN,
];

/// The canonical form of a participant code: trimmed and uppercased.
///
/// ```
/// use prefill_engine::directory::canonicalize;
/// assert_eq!(canonicalize(" stu001 "), "STU001");
/// ```
pub fn canonicalize(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// The progression of a record through the two rounds.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum RecordState {
    /// In the directory, no link yet.
    Registered,
    /// A link was generated, no response recorded.
    Linked,
    /// A response was matched to this record.
    Responded,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParticipantRecord {
    /// Always canonical.
    pub code: String,
    pub name: String,
    pub url: Option<String>,
    pub has_response: bool,
    /// Only set when `has_response` is set.
    pub word_count: Option<usize>,
    // The values of the pass-through columns, aligned with Directory::extra_columns
    extra: Vec<String>,
}

impl ParticipantRecord {
    pub fn new(code: &str, name: &str) -> ParticipantRecord {
        ParticipantRecord {
            code: canonicalize(code),
            name: name.trim().to_string(),
            url: None,
            has_response: false,
            word_count: None,
            extra: Vec::new(),
        }
    }

    pub fn state(&self) -> RecordState {
        match (&self.url, self.has_response) {
            (_, true) => RecordState::Responded,
            (Some(_), false) => RecordState::Linked,
            (None, false) => RecordState::Registered,
        }
    }
}

/// The participants, keyed by canonical code, in the order of the source.
///
/// Columns that the directory does not know about are kept with each record and
/// written back at their original position.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Directory {
    header: Vec<String>,
    // For each header position, the index of its value in ParticipantRecord::extra
    slots: Vec<Option<usize>>,
    extra_columns: Vec<String>,
    records: Vec<ParticipantRecord>,
    index: HashMap<String, usize>,
}

impl Default for Directory {
    fn default() -> Self {
        Directory::new()
    }
}

impl Directory {
    pub fn new() -> Directory {
        Directory {
            header: KNOWN_COLUMNS.iter().map(|s| s.to_string()).collect(),
            slots: vec![None; KNOWN_COLUMNS.len()],
            extra_columns: Vec::new(),
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Reads a directory from a table with at least the `code` and `name` columns.
    ///
    /// When two rows share a canonical code, the later row replaces the earlier one
    /// (at the earlier position). Rows with an empty code are dropped.
    pub fn from_table(table: &RawTable) -> Result<Directory, EngineError> {
        let missing = table.missing_columns(&[CODE_COLUMN, NAME_COLUMN]);
        if !missing.is_empty() {
            return Err(EngineError::MissingDirectoryColumns { missing });
        }

        let col = |name: &str| table.column_index(name);
        let code_idx = col(CODE_COLUMN).unwrap_or_default();
        let name_idx = col(NAME_COLUMN).unwrap_or_default();
        let url_idx = col(URL_COLUMN);
        let has_response_idx = col(HAS_RESPONSE_COLUMN);
        let word_count_idx = col(WORD_COUNT_COLUMN);

        let mut header: Vec<String> = table.header.clone();
        for k in KNOWN_COLUMNS {
            if !header.iter().any(|h| h == k) {
                header.push(k.to_string());
            }
        }
        let extra_idxs: Vec<usize> = table
            .header
            .iter()
            .enumerate()
            .filter(|(_, h)| !KNOWN_COLUMNS.contains(&h.as_str()))
            .map(|(idx, _)| idx)
            .collect();
        let extra_columns: Vec<String> =
            extra_idxs.iter().map(|i| table.header[*i].clone()).collect();
        let slots: Vec<Option<usize>> = (0..header.len())
            .map(|idx| extra_idxs.iter().position(|i| *i == idx))
            .collect();

        let mut dir = Directory {
            header,
            slots,
            extra_columns,
            records: Vec::new(),
            index: HashMap::new(),
        };

        for (lineno, row) in table.rows.iter().enumerate() {
            let code = canonicalize(cell(row, code_idx));
            if code.is_empty() {
                warn!("Directory row {}: empty code, skipping {:?}", lineno + 2, row);
                continue;
            }
            let url = url_idx
                .map(|i| cell(row, i).trim().to_string())
                .filter(|s| !s.is_empty());
            let has_response = has_response_idx
                .map(|i| parse_flag(cell(row, i)))
                .unwrap_or(false);
            let word_count = if has_response {
                word_count_idx.and_then(|i| cell(row, i).trim().parse::<usize>().ok())
            } else {
                None
            };
            let record = ParticipantRecord {
                code,
                name: cell(row, name_idx).trim().to_string(),
                url,
                has_response,
                word_count,
                extra: extra_idxs.iter().map(|i| cell(row, *i).to_string()).collect(),
            };
            if dir.insert(record) {
                warn!(
                    "Directory row {}: code {:?} already present, the later row wins",
                    lineno + 2,
                    cell(row, code_idx)
                );
            }
        }
        debug!(
            "Directory::from_table: {} records, pass-through columns: {:?}",
            dir.records.len(),
            dir.extra_columns
        );
        Ok(dir)
    }

    /// The complete table, to replace the previous version on disk.
    pub fn to_table(&self) -> RawTable {
        let rows = self
            .records
            .iter()
            .map(|r| {
                self.header
                    .iter()
                    .zip(self.slots.iter())
                    .map(|(h, slot)| match (slot, h.as_str()) {
                        (Some(pos), _) => r.extra.get(*pos).cloned().unwrap_or_default(),
                        (None, CODE_COLUMN) => r.code.clone(),
                        (None, NAME_COLUMN) => r.name.clone(),
                        (None, URL_COLUMN) => r.url.clone().unwrap_or_default(),
                        (None, HAS_RESPONSE_COLUMN) => r.has_response.to_string(),
                        (None, WORD_COUNT_COLUMN) => match (r.has_response, r.word_count) {
                            (true, Some(wc)) => wc.to_string(),
                            _ => String::new(),
                        },
                        // Duplicates of a known column
                        (None, _) => String::new(),
                    })
                    .collect()
            })
            .collect();
        RawTable::new(self.header.clone(), rows)
    }

    /// Adds a record or replaces the record with the same canonical code.
    ///
    /// Returns true if a record was replaced.
    pub fn insert(&mut self, mut record: ParticipantRecord) -> bool {
        record.code = canonicalize(&record.code);
        record.extra.resize(self.extra_columns.len(), String::new());
        if let Some(idx) = self.index.get(&record.code) {
            self.records[*idx] = record;
            true
        } else {
            self.index.insert(record.code.clone(), self.records.len());
            self.records.push(record);
            false
        }
    }

    /// Looks up a record by any raw form of its code.
    pub fn get(&self, code: &str) -> Option<&ParticipantRecord> {
        self.index
            .get(&canonicalize(code))
            .map(|idx| &self.records[*idx])
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut ParticipantRecord> {
        match self.index.get(&canonicalize(code)) {
            Some(idx) => self.records.get_mut(*idx),
            None => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Adds the records of `other` whose code is not in this directory yet.
    ///
    /// Existing records are left untouched. The pass-through values of the new
    /// records are matched by column name. Returns the number of added records.
    pub fn add_missing(&mut self, other: &Directory) -> usize {
        let mut added = 0;
        for r in other.iter() {
            if self.index.contains_key(&r.code) {
                continue;
            }
            let mut record = r.clone();
            record.extra = self
                .extra_columns
                .iter()
                .map(|c| {
                    other
                        .extra_value(&r.code, c)
                        .unwrap_or_default()
                        .to_string()
                })
                .collect();
            self.insert(record);
            added += 1;
        }
        debug!("add_missing: added {} of {} records", added, other.len());
        added
    }

    /// The names of the columns kept as-is.
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// The value of a pass-through column for a record.
    pub fn extra_value(&self, code: &str, column: &str) -> Option<&str> {
        let pos = self.extra_columns.iter().position(|c| c == column)?;
        self.get(code)
            .and_then(|r| r.extra.get(pos))
            .map(|s| s.as_str())
    }
}

/// Applies new URLs to a directory.
///
/// Only the URL of the records named in `updates` changes. Every other record and
/// every other field is kept. Updates for unknown codes are ignored.
pub fn merge(existing: Directory, updates: &HashMap<String, String>) -> Directory {
    let mut dir = existing;
    let mut applied = 0;
    for (code, url) in updates.iter() {
        match dir.get_mut(code) {
            Some(record) => {
                record.url = Some(url.clone());
                applied += 1;
            }
            None => {
                warn!("merge: code {:?} is not in the directory, ignoring", code);
            }
        }
    }
    debug!("merge: applied {} of {} updates", applied, updates.len());
    dir
}

fn parse_flag(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn roster() -> RawTable {
        RawTable::new(
            strings(&["#", "code", "name", "class"]),
            vec![
                strings(&["1", "stu001", " Alice ", "A"]),
                strings(&["2", "STU002", "Bob", "B"]),
                strings(&["3", " Stu003", "Carol", "A"]),
            ],
        )
    }

    #[test]
    fn canonical_codes() {
        for raw in ["stu001", " STU001 ", "Stu001", "STU001"] {
            assert_eq!(canonicalize(raw), "STU001");
            assert_eq!(canonicalize(&canonicalize(raw)), canonicalize(raw));
        }
        assert_eq!(canonicalize("\t\n"), "");
    }

    #[test]
    fn load_roster() {
        let dir = Directory::from_table(&roster()).unwrap();
        assert_eq!(dir.len(), 3);
        let codes: Vec<&str> = dir.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["STU001", "STU002", "STU003"]);
        let alice = dir.get("stu001 ").unwrap();
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.url, None);
        assert_eq!(alice.state(), RecordState::Registered);
        assert_eq!(dir.extra_columns(), &["#".to_string(), "class".to_string()]);
        assert_eq!(dir.extra_value("STU003", "class"), Some("A"));
    }

    #[test]
    fn missing_required_columns() {
        let t = RawTable::new(strings(&["id", "student"]), vec![]);
        assert_eq!(
            Directory::from_table(&t),
            Err(EngineError::MissingDirectoryColumns {
                missing: strings(&["code", "name"])
            })
        );
    }

    #[test]
    fn later_duplicate_wins() {
        let t = RawTable::new(
            strings(&["code", "name"]),
            vec![
                strings(&["stu001", "Alice"]),
                strings(&["STU002", "Bob"]),
                strings(&[" STU001", "Alicia"]),
                strings(&["  ", "Nobody"]),
            ],
        );
        let dir = Directory::from_table(&t).unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.iter().next().unwrap().name, "Alicia");
    }

    #[test]
    fn round_trip_keeps_pass_through_columns() {
        let mut dir = Directory::from_table(&roster()).unwrap();
        {
            let r = dir.get_mut("STU002").unwrap();
            r.url = Some("https://x?id=1&a=b".to_string());
            r.has_response = true;
            r.word_count = Some(12);
        }
        let t = dir.to_table();
        assert_eq!(
            t.header,
            strings(&["#", "code", "name", "class", "url", "has_response", "word_count"])
        );
        assert_eq!(
            t.rows[1],
            strings(&["2", "STU002", "Bob", "B", "https://x?id=1&a=b", "true", "12"])
        );
        assert_eq!(
            t.rows[0],
            strings(&["1", "STU001", "Alice", "A", "", "false", ""])
        );

        let dir2 = Directory::from_table(&t).unwrap();
        assert_eq!(dir2, dir);
        assert_eq!(dir2.get("stu002").unwrap().state(), RecordState::Responded);
    }

    #[test]
    fn repeated_header_names_keep_their_values() {
        let t = RawTable::new(
            strings(&["code", "name", "", "", "code"]),
            vec![strings(&["A1", "Ann", "left", "right", "dup"])],
        );
        let dir = Directory::from_table(&t).unwrap();
        let out = dir.to_table();
        assert_eq!(
            out.header,
            strings(&["code", "name", "", "", "code", "url", "has_response", "word_count"])
        );
        assert_eq!(
            out.rows[0],
            strings(&["A1", "Ann", "left", "right", "A1", "", "false", ""])
        );
        assert_eq!(Directory::from_table(&out).unwrap().to_table(), out);
    }

    #[test]
    fn add_missing_keeps_existing_records() {
        let mut dir = Directory::from_table(&roster()).unwrap();
        {
            let r = dir.get_mut("STU001").unwrap();
            r.has_response = true;
            r.word_count = Some(255);
        }
        let other = Directory::from_table(&RawTable::new(
            strings(&["code", "name", "class"]),
            vec![
                strings(&["STU001", "Someone else", "Z"]),
                strings(&["stu004", "Dan", "C"]),
            ],
        ))
        .unwrap();
        assert_eq!(dir.add_missing(&other), 1);
        assert_eq!(dir.len(), 4);
        let alice = dir.get("STU001").unwrap();
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.word_count, Some(255));
        assert_eq!(dir.extra_value("STU004", "class"), Some("C"));
        assert_eq!(dir.extra_value("STU004", "#"), Some(""));
        assert_eq!(dir.to_table().rows[3][1], "STU004");
    }

    #[test]
    fn word_count_needs_response_flag() {
        let t = RawTable::new(
            strings(&["code", "name", "has_response", "word_count"]),
            vec![
                strings(&["A1", "x", "no", "10"]),
                strings(&["A2", "y", "TRUE", "20"]),
                strings(&["A3", "z", "yes", "not a number"]),
            ],
        );
        let dir = Directory::from_table(&t).unwrap();
        assert_eq!(dir.get("A1").unwrap().word_count, None);
        assert_eq!(dir.get("A2").unwrap().word_count, Some(20));
        assert!(dir.get("A3").unwrap().has_response);
        assert_eq!(dir.get("A3").unwrap().word_count, None);
    }

    #[test]
    fn merge_keeps_other_records() {
        let mut dir = Directory::from_table(&roster()).unwrap();
        dir.get_mut("STU003").unwrap().url = Some("old".to_string());
        let before_3 = dir.get("STU003").unwrap().clone();

        let mut updates: HashMap<String, String> = HashMap::new();
        updates.insert("stu001".to_string(), "u1".to_string());
        updates.insert("STU002".to_string(), "u2".to_string());
        updates.insert("STU999".to_string(), "ghost".to_string());
        let merged = merge(dir, &updates);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("STU001").unwrap().url.as_deref(), Some("u1"));
        assert_eq!(merged.get("STU002").unwrap().url.as_deref(), Some("u2"));
        assert_eq!(merged.get("STU003").unwrap(), &before_3);
        assert!(merged.get("STU999").is_none());
        assert_eq!(merged.extra_value("STU001", "class"), Some("A"));
    }

    #[test]
    fn insert_new_record() {
        let mut dir = Directory::new();
        assert!(!dir.insert(ParticipantRecord::new(" stu010", "Dan")));
        assert!(dir.insert(ParticipantRecord::new("STU010", "Daniel")));
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.get("stu010").unwrap().name, "Daniel");
        assert_eq!(dir.to_table().rows[0].len(), 5);
    }
}
