use log::{debug, info, warn};

use prefill_engine::importer::import;
use prefill_engine::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::links::config_reader::*;
use crate::links::io_common::read_table;
use crate::links::link_service::LinkService;

mod config_reader;
mod io_common;
mod io_csv;
mod io_msforms;
mod link_service;

#[derive(Debug, Snafu)]
pub enum LinksError {
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Excel file {path} has no data"))]
    EmptyExcel { path: String },
    #[snafu(display("Excel file {path} has no worksheet named {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Error opening CSV file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV file {path} at line {lineno}"))]
    ReadingCsv {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error writing CSV file {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("{source}"))]
    Engine { source: EngineError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type LinksResult<T> = Result<T, LinksError>;

pub const DEFAULT_CONFIG_PATH: &str = "formlinks.json";

/// Options of the second-round run.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ReconcileOptions {
    pub input: String,
    pub excel_worksheet_name: Option<String>,
    pub out: Option<String>,
    pub reference: Option<String>,
    pub dry_run: bool,
}

pub(crate) fn load_directory(path: &str) -> LinksResult<Directory> {
    let table = read_table(path, None)?;
    let dir = Directory::from_table(&table).context(EngineSnafu {})?;
    info!("  Found {} students", dir.len());
    Ok(dir)
}

fn save_directory(path: &str, dir: &Directory) -> LinksResult<()> {
    info!("Writing updated URLs to {}", path);
    io_csv::write_csv_table(path, &dir.to_table())
}

fn shorten(url: &str) -> String {
    if url.chars().count() > 80 {
        format!("{}...", url.chars().take(80).collect::<String>())
    } else {
        url.to_string()
    }
}

/// First round: a link with the code, the name and the instructions for everyone.
///
/// With a roster, the students of the roster that are not in the directory yet
/// are added to it. The records already in the directory are kept as they are.
pub fn run_generate(config_path: &str, roster_path: Option<String>) -> LinksResult<()> {
    let loaded = read_config(config_path)?;
    let dir = match roster_path {
        None => {
            info!("Loading student data from {}", loaded.directory_path);
            load_directory(&loaded.directory_path)?
        }
        Some(roster_p) => {
            info!("Loading roster from {}", roster_p);
            let roster = load_directory(&roster_p)?;
            if Path::new(&loaded.directory_path).exists() {
                info!("Loading student data from {}", loaded.directory_path);
                let mut dir = load_directory(&loaded.directory_path)?;
                let added = dir.add_missing(&roster);
                info!("  Added {} students from the roster", added);
                dir
            } else {
                roster
            }
        }
    };
    if dir.is_empty() {
        whatever!("No students in {}", loaded.directory_path)
    }

    let (dir, links) = generate_initial_links(dir, &loaded.links);
    for l in links.iter() {
        println!("  {}: {}", l.code, l.name);
        println!("    -> {}", shorten(&l.url));
    }

    save_directory(&loaded.directory_path, &dir)?;
    println!("Successfully generated {} prefilled URLs", links.len());
    Ok(())
}

/// Second round: matches the responses and writes the new links.
///
/// Nothing is written if the configuration or the response table is invalid.
pub fn run_reconcile(
    config_path: &str,
    opts: &ReconcileOptions,
) -> LinksResult<ReconciliationResult> {
    let loaded = read_config(config_path)?;
    info!("Loading student data from {}", loaded.directory_path);
    let mut dir = load_directory(&loaded.directory_path)?;

    let worksheet = opts
        .excel_worksheet_name
        .clone()
        .or_else(|| loaded.config.responses.excel_worksheet_name.clone());
    let table = read_table(&opts.input, worksheet.as_deref())?;
    let responses = import(&table, &loaded.config.column_map()).context(EngineSnafu {})?;

    let res = reconcile(&mut dir, responses, &loaded.links);

    if opts.dry_run {
        info!("Dry run: {} is not modified", loaded.directory_path);
    } else {
        save_directory(&loaded.directory_path, &dir)?;
    }

    print_summary(&res);

    let result_js = build_summary_js(&res);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    match opts.out.as_deref() {
        None => {}
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(out_path) => {
            fs::write(out_path, &pretty_js_stats).context(WritingFileSnafu { path: out_path })?;
            info!("Summary written to {}", out_path);
        }
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = opts.reference.as_deref() {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(res)
}

/// Resolves one code, the way the redirect front end does.
pub fn run_lookup(config_path: &str, code: &str) -> LinksResult<String> {
    let loaded = read_config(config_path)?;
    let service = LinkService::open(&loaded.directory_path)?;
    debug!("run_lookup: {} codes with a link", service.index().len());
    match service.resolve(code) {
        Some(url) => {
            println!("{}", url);
            Ok(url.to_string())
        }
        None => whatever!(
            "Code '{}' not found. Please check the code and try again.",
            canonicalize(code)
        ),
    }
}

/// Lists every participant with the state of their link.
pub fn run_status(config_path: &str) -> LinksResult<()> {
    let loaded = read_config(config_path)?;
    let dir = load_directory(&loaded.directory_path)?;
    let index = LinkIndex::from_directory(&dir);
    println!("{} students registered, {} links ready", dir.len(), index.len());
    for r in dir.iter() {
        let state = match r.state() {
            RecordState::Registered => "no link".to_string(),
            RecordState::Linked => "URL ready".to_string(),
            RecordState::Responded => match r.word_count {
                Some(wc) => format!("responded ({} words)", wc),
                None => "responded".to_string(),
            },
        };
        println!("  {:<12} {:<30} {}", r.code, r.name, state);
    }
    Ok(())
}

fn print_summary(res: &ReconciliationResult) {
    println!();
    println!("{}", "=".repeat(60));
    println!("Summary");
    println!("{}", "=".repeat(60));
    println!("Successfully regenerated URLs for {} students", res.matched);

    if !res.not_responded.is_empty() {
        println!();
        println!(
            "{} students have NOT submitted yet:",
            res.not_responded.len()
        );
        for (code, name) in res.not_responded.iter() {
            println!("  - {} ({})", code, name);
        }
    }

    if !res.unmatched.is_empty() {
        println!();
        println!("{} responses could not be matched:", res.unmatched.len());
        for u in res.unmatched.iter() {
            println!("  - {} ({})", canonicalize(&u.raw_code), u.raw_name);
        }
    }
    println!();
}

fn build_summary_js(res: &ReconciliationResult) -> JSValue {
    let updated: Vec<JSValue> = res
        .updated
        .iter()
        .map(|m| {
            json!({
                "code": m.code,
                "name": m.name,
                "wordCount": m.word_count,
                "status": m.status.label(),
                "urlLength": m.url_length,
            })
        })
        .collect();
    let unmatched: Vec<JSValue> = res
        .unmatched
        .iter()
        .map(|u| json!({"code": u.raw_code, "name": u.raw_name}))
        .collect();
    let not_responded: Vec<JSValue> = res
        .not_responded
        .iter()
        .map(|(code, name)| json!({"code": code, "name": name}))
        .collect();
    json!({
        "matched": res.matched,
        "updated": updated,
        "unmatched": unmatched,
        "responded": res.responded,
        "notResponded": not_responded,
    })
}

pub fn read_summary(path: &str) -> LinksResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_summary: {:?}", js);
    Ok(js)
}
