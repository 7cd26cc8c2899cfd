//! # Tableside Register Entry Point
//!
//! Line-oriented register: one command per line on stdin, one JSON document
//! per line on stdout. Logs go to stderr.
//!
//! ## Usage
//! ```bash
//! # Sample menu, 6 tables, 10% tax
//! cargo run -p tableside-register
//!
//! # Explicit config file
//! cargo run -p tableside-register -- --config ./tableside.toml
//!
//! # More logging
//! RUST_LOG=debug cargo run -p tableside-register
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load ServiceConfig (file, then TABLESIDE_* env)
//! 3. Load the catalog and build the PosSession
//! 4. Read commands until `quit` or end of input

mod commands;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use serde_json::json;
use tableside_service::{PosSession, ServiceConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use commands::{CommandError, Reply};

const HELP: &str = "commands: tables | products [category] | categories | summary | \
select <table> | add <table> <product> [opts] | qty <table> <product> <n> [opts] | \
remove <table> <product> [opts] | note <table> <product> <opts> [text] | \
name <table> [customer] | totals <table> | bill <table> | pay <bill> | bills | quit";

fn main() -> ExitCode {
    init_tracing();

    info!("Starting Tableside register");

    let config = match ServiceConfig::load(config_path_from_args()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut session = match PosSession::from_config(&config) {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to start session: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&mut session, &config, io::stdin().lock(), io::stdout().lock()) {
        Ok(()) => {
            info!("Register closed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("I/O error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Command loop. Returns on `quit` or end of input.
fn run(
    session: &mut PosSession,
    config: &ServiceConfig,
    input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match commands::parse(&line) {
            Err(e) => json!({ "error": { "code": "PARSE_ERROR", "message": e.to_string() } }),
            Ok(command) => match commands::execute(session, config, command) {
                Ok(Reply::Data(data)) => json!({ "ok": data }),
                Ok(Reply::Help) => json!({ "help": HELP }),
                Ok(Reply::Quit) => break,
                Err(CommandError::Api(e)) => json!({ "error": e }),
                Err(e) => {
                    error!("{}", e);
                    json!({ "error": { "code": "INTERNAL", "message": e.to_string() } })
                }
            },
        };

        writeln!(output, "{}", response)?;
        output.flush()?;
    }
    Ok(())
}

/// `--config <path>`, if given.
fn config_path_from_args() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}

/// Filter used when `RUST_LOG` is unset or does not parse.
const DEFAULT_LOG_FILTER: &str = "info,tableside=debug";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tableside_service=trace` - Trace the session layer
///
/// Default: `info,tableside=debug`
fn init_tracing() {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(io::stderr)
        .init();
}

/// Builds the filter from a `RUST_LOG` value, falling back to the default.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}
