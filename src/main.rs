use log::{debug, LevelFilter};

use clap::Parser;
use snafu::ErrorCompat;

mod args;
mod links;

use crate::args::{Args, Command};
use crate::links::*;

fn init_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!("args: {:?}", args);

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let res: LinksResult<()> = match args.command {
        Command::Generate { roster } => run_generate(&config_path, roster),
        Command::Reconcile {
            input,
            excel_worksheet_name,
            out,
            reference,
            dry_run,
        } => {
            let opts = ReconcileOptions {
                input,
                excel_worksheet_name,
                out,
                reference,
                dry_run,
            };
            run_reconcile(&config_path, &opts).map(|_| ())
        }
        Command::Lookup { code } => run_lookup(&config_path, &code).map(|_| ()),
        Command::Status => run_status(&config_path),
    };

    if let Err(e) = res {
        eprintln!("An error occurred: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
