// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The opaque field identifiers of the target form.
///
/// These are the parameter names that the form service uses in its prefilled
/// links. They are never interpreted, only appended to the base URL.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FormFields {
    pub code: String,
    pub name: String,
    /// The free-text field, prefilled with the first-round writing in the second round.
    pub writing: String,
    /// Instructions in the first round, progress feedback in the second round.
    pub writing_info: String,
}

/// The thresholds that drive the progress feedback.
///
/// `min` and `max` are the inclusive bounds of the "good length" band.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct WordCountRules {
    pub target: usize,
    pub min: usize,
    pub max: usize,
}

impl WordCountRules {
    pub const DEFAULT_RULES: WordCountRules = WordCountRules {
        target: 250,
        min: 240,
        max: 260,
    };
}

/// The names of the three columns read from a response table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnMap {
    pub code_column: String,
    pub name_column: String,
    pub text_column: String,
}

impl ColumnMap {
    /// The columns in the order they are checked and reported.
    pub fn required(&self) -> [&str; 3] {
        [
            self.code_column.as_str(),
            self.name_column.as_str(),
            self.text_column.as_str(),
        ]
    }
}

pub const DEFAULT_FIRST_SESSION_INFO: &str =
    "By the end of this class you should write around 250 words.";

const PLACEHOLDER_BASE_URL: &str = "YOUR_FORM_URL_HERE";
const PLACEHOLDER_MARKER: &str = "YOUR_";

/// Everything needed to build the links of one batch run.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LinkConfig {
    /// The form URL, already carrying its own query parameter (usually the form id).
    pub base_url: String,
    pub fields: FormFields,
    pub rules: WordCountRules,
    /// The fixed text placed in the info field of every first-round link.
    pub first_session_info: String,
}

impl LinkConfig {
    /// Checks the configuration before any record is processed.
    ///
    /// All the problems are reported at once.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut problems: Vec<String> = Vec::new();

        if self.base_url.trim().is_empty() || self.base_url == PLACEHOLDER_BASE_URL {
            problems.push("the base form URL is not configured".to_string());
        } else if !self.base_url.contains('?') {
            problems.push(format!(
                "the base form URL must already contain a query parameter: {}",
                self.base_url
            ));
        }

        let fields = [
            ("student code", &self.fields.code),
            ("student name", &self.fields.name),
            ("writing", &self.fields.writing),
            ("writing info", &self.fields.writing_info),
        ];
        for (label, value) in fields {
            if value.trim().is_empty() || value.contains(PLACEHOLDER_MARKER) {
                problems.push(format!("the {} field identifier is not configured", label));
            }
        }

        let r = self.rules;
        if !(r.min <= r.target && r.target <= r.max) {
            problems.push(format!(
                "word count thresholds must satisfy min <= target <= max, got min={} target={} max={}",
                r.min, r.target, r.max
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(EngineError::InvalidConfig { problems })
        }
    }
}

/// Errors that stop a batch before the directory is touched.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum EngineError {
    InvalidConfig {
        problems: Vec<String>,
    },
    /// The response table lacks some of the configured columns.
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },
    /// The directory table lacks `code` or `name`.
    MissingDirectoryColumns {
        missing: Vec<String>,
    },
}

impl Error for EngineError {}

impl Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidConfig { problems } => {
                write!(f, "configuration incomplete: {}", problems.join("; "))
            }
            EngineError::MissingColumns { missing, available } => write!(
                f,
                "response table is missing required columns {:?} (available columns: {:?})",
                missing, available
            ),
            EngineError::MissingDirectoryColumns { missing } => {
                write!(f, "directory table is missing required columns {:?}", missing)
            }
        }
    }
}
