#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via `FORMDECK_*` prefix.

use std::env;
use std::process;

use crate::app::FormTab;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
formdeck — terminal data-entry forms

USAGE:
    formdeck [OPTIONS]

OPTIONS:
    --form=N        Start on form N, 1-indexed (default: 1)
    --help, -h      Show this help message
    --version, -V   Show version

FORMS:
    1  Event Registration   Name, email, age, optional guest
    2  Job Application      Position-dependent fields and skills
    3  Survey               Topic sections and fetched follow-up questions

KEYBINDINGS:
    Tab / Shift-Tab      Move between fields
    Up/Down, Left/Right  Change a selection
    Space                Toggle a checkbox
    Enter                Submit the form / dismiss the notification
    F1-F3                Jump to a form
    Ctrl+Left/Right      Cycle forms
    Ctrl+C               Quit

ENVIRONMENT VARIABLES:
    FORMDECK_FORM   Override --form
    FORMDECK_LOG    Append tracing output to this file";

/// Parsed command-line options.
pub struct Opts {
    /// Starting form tab.
    pub start_tab: FormTab,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            start_tab: FormTab::EventRegistration,
        }
    }
}

fn parse_tab(value: &str) -> Option<FormTab> {
    let n: usize = value.parse().ok()?;
    FormTab::from_index(n.checked_sub(1)?)
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are
    /// overridden by explicit command-line flags.
    pub fn parse() -> Self {
        let mut opts = Self::default();

        if let Ok(val) = env::var("FORMDECK_FORM")
            && let Some(tab) = parse_tab(&val)
        {
            opts.start_tab = tab;
        }

        let args: Vec<String> = env::args().skip(1).collect();
        for arg in &args {
            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{HELP_TEXT}");
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("formdeck {VERSION}");
                    process::exit(0);
                }
                other => {
                    if let Some(val) = other.strip_prefix("--form=") {
                        match parse_tab(val) {
                            Some(tab) => opts.start_tab = tab,
                            None => {
                                eprintln!("Invalid --form value: {val} (expected 1-3)");
                                process::exit(1);
                            }
                        }
                    } else {
                        eprintln!("Unknown argument: {other}");
                        eprintln!("Run with --help for usage information.");
                        process::exit(1);
                    }
                }
            }
        }

        opts
    }
}
