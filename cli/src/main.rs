#![deny(missing_docs)]

//! # oas2md
//!
//! Converts an OpenAPI YAML/JSON spec into a Markdown API reference.
//!
//! Logging goes to stderr (`RUST_LOG` or `-v`/`-vv`) so the page written to
//! stdout stays clean.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod generate;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert an OpenAPI YAML/JSON spec into a clean Markdown API reference."
)]
struct Cli {
    #[command(flatten)]
    generate: generate::GenerateArgs,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("oas2md={level},oas2md_core={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match generate::execute(&cli.generate) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            ExitCode::FAILURE
        }
    }
}
