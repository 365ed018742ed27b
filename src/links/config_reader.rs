use std::path::{Path, PathBuf};

use crate::links::io_common::{table_format, TableFormat};
use crate::links::*;

use prefill_engine::{
    ColumnMap, FormFields, LinkConfig, WordCountRules, DEFAULT_FIRST_SESSION_INFO,
};
use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FieldIds {
    #[serde(rename = "studentCode")]
    pub student_code: String,
    #[serde(rename = "studentName")]
    pub student_name: String,
    pub writing: String,
    #[serde(rename = "writingInfo")]
    pub writing_info: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FormSettings {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    pub fields: FieldIds,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySource {
    #[serde(rename = "filePath")]
    pub file_path: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ResponseSource {
    #[serde(rename = "codeColumn")]
    pub code_column: String,
    #[serde(rename = "nameColumn")]
    pub name_column: String,
    #[serde(rename = "textColumn")]
    pub text_column: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionSettings {
    #[serde(rename = "firstSessionInfo")]
    pub first_session_info: Option<String>,
    #[serde(rename = "wordCountTarget")]
    pub word_count_target: Option<usize>,
    #[serde(rename = "wordCountMin")]
    pub word_count_min: Option<usize>,
    #[serde(rename = "wordCountMax")]
    pub word_count_max: Option<usize>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FormlinksConfig {
    pub form: FormSettings,
    pub directory: DirectorySource,
    pub responses: ResponseSource,
    pub session: Option<SessionSettings>,
}

impl FormlinksConfig {
    pub fn link_config(&self) -> LinkConfig {
        let session = self.session.clone().unwrap_or_default();
        let defaults = WordCountRules::DEFAULT_RULES;
        LinkConfig {
            base_url: self.form.base_url.trim().to_string(),
            fields: FormFields {
                code: self.form.fields.student_code.clone(),
                name: self.form.fields.student_name.clone(),
                writing: self.form.fields.writing.clone(),
                writing_info: self.form.fields.writing_info.clone(),
            },
            rules: WordCountRules {
                target: session.word_count_target.unwrap_or(defaults.target),
                min: session.word_count_min.unwrap_or(defaults.min),
                max: session.word_count_max.unwrap_or(defaults.max),
            },
            first_session_info: session
                .first_session_info
                .unwrap_or_else(|| DEFAULT_FIRST_SESSION_INFO.to_string()),
        }
    }

    pub fn column_map(&self) -> ColumnMap {
        ColumnMap {
            code_column: self.responses.code_column.clone(),
            name_column: self.responses.name_column.clone(),
            text_column: self.responses.text_column.clone(),
        }
    }
}

/// A loaded configuration, with the paths resolved against its directory.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LoadedConfig {
    pub config: FormlinksConfig,
    pub links: LinkConfig,
    pub directory_path: String,
}

pub fn parse_config(contents: &str) -> LinksResult<FormlinksConfig> {
    serde_json::from_str(contents).context(ParsingJsonSnafu {})
}

/// Reads and validates the configuration file.
pub fn read_config(config_path: &str) -> LinksResult<LoadedConfig> {
    let contents =
        fs::read_to_string(config_path).context(OpeningJsonSnafu { path: config_path })?;
    let config = parse_config(&contents)?;
    debug!("config: {:?}", config);

    let links = config.link_config();
    links.validate().context(EngineSnafu {})?;

    let root_p = Path::new(config_path)
        .parent()
        .context(MissingParentDirSnafu {})?;
    let directory_path = resolve_path(root_p, &config.directory.file_path);
    // calamine only reads; use `generate --roster` to import a spreadsheet
    if table_format(&directory_path) == TableFormat::Excel {
        whatever!(
            "The directory can only be written as CSV, cannot use {}",
            directory_path
        )
    }
    Ok(LoadedConfig {
        config,
        links,
        directory_path,
    })
}

/// Relative paths are relative to the directory of the configuration file.
pub fn resolve_path(root: &Path, file_path: &str) -> String {
    let p: PathBuf = [root, Path::new(file_path)].iter().collect();
    p.display().to_string()
}
