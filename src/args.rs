use clap::{Parser, Subcommand};

/// Maintains personalized prefilled form links across two assignment rounds.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, default formlinks.json) The JSON configuration: form URL, field identifiers,
    /// directory file, response columns and word count thresholds.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// First round: writes a link with the code, the name and the instructions for every
    /// participant of the directory.
    Generate {
        /// (file path, .csv or .xlsx) A roster whose new students are added to the directory.
        /// It needs the columns `code` and `name`.
        #[clap(long, value_parser)]
        roster: Option<String>,
    },
    /// Second round: matches the exported responses to the directory by code and writes
    /// links prefilled with each participant's writing and feedback.
    Reconcile {
        /// (file path, .xlsx or .csv) The responses exported from the form service.
        #[clap(short, long, value_parser)]
        input: String,

        /// When using an Excel file, the name of the worksheet to use.
        #[clap(long, value_parser)]
        excel_worksheet_name: Option<String>,

        /// (file path or 'stdout') If specified, the summary of the run will be written in JSON
        /// format to the given location.
        #[clap(short, long, value_parser)]
        out: Option<String>,

        /// (file path) A reference summary in JSON format. If provided, the run fails when
        /// its summary differs from the reference.
        #[clap(short, long, value_parser)]
        reference: Option<String>,

        /// Computes and prints the summary without writing the directory.
        #[clap(long, takes_value = false)]
        dry_run: bool,
    },
    /// Prints the link of a participant code.
    Lookup {
        #[clap(value_parser)]
        code: String,
    },
    /// Lists every participant with the state of their link.
    Status,
}
