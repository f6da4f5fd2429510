//! Logsim - Circuit definition checker
//!
//! Parses a Logic Simulator definition file and prints it back in
//! canonical form, as JSON, or as a list of errors.
//!
//! # Usage
//!
//! ```bash
//! logsim circuit.def
//! logsim --all-errors -v circuit.def
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use logsim_core::{dsl, error::Result, ParserConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Logic Simulator definition file checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the circuit definition file
    #[arg(value_name = "DEFINITION_FILE")]
    definition_file: PathBuf,

    /// Print the syntax tree as JSON instead of canonical text
    #[arg(long)]
    json: bool,

    /// Report every error instead of stopping at the first
    #[arg(long)]
    all_errors: bool,

    /// Treat '/' as an ordinary (invalid) character
    #[arg(long)]
    no_comments: bool,

    /// Refuse definition files larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    max_bytes: Option<u64>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: could not install log subscriber");
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the definition file is free of errors.
fn run(args: &Args) -> Result<bool> {
    let source = dsl::read_source(&args.definition_file, args.max_bytes)?;
    info!(
        path = %args.definition_file.display(),
        bytes = source.len(),
        "read definition file"
    );

    let config = ParserConfig::new().with_comments(!args.no_comments);

    if args.all_errors {
        let errors = dsl::check_with_config(&source, config);
        for err in &errors {
            eprint!("{}", err.render(&source));
        }
        info!(errors = errors.len(), "check finished");
        return Ok(errors.is_empty());
    }

    let file = match dsl::parse_with_config(&source, config) {
        Ok(file) => file,
        Err(err) => {
            eprint!("{}", err.render(&source));
            return Ok(false);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&file)?);
    } else {
        print!("{}", file);
    }

    info!(
        statements = file.len(),
        names = file.names().len(),
        "definition file is valid"
    );
    Ok(true)
}
