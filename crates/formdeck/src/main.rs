#![forbid(unsafe_code)]

//! formdeck binary entry point.

use std::env;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use formdeck::app::AppModel;
use formdeck::cli;
use formdeck::questions::CannedQuestionSource;
use formdeck_runtime::Program;
use tracing_subscriber::EnvFilter;

/// Install a file-backed tracing subscriber when `FORMDECK_LOG` is set.
/// Stdout belongs to the TUI, so without the variable nothing is logged.
fn init_logging() {
    let Ok(path) = env::var("FORMDECK_LOG") else {
        return;
    };
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(e) => {
            eprintln!("formdeck: cannot open log file {path}: {e}");
        }
    }
}

fn main() {
    let opts = cli::Opts::parse();
    init_logging();

    let model =
        AppModel::new(Arc::new(CannedQuestionSource::new())).with_tab(opts.start_tab);
    if let Err(e) = Program::new(model).run() {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
