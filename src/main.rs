//! btc-keygen CLI
//!
//! Entry point for generating or importing a key and printing its address.

use std::process::ExitCode;

use btc_keygen::cli::{normalize_args, run, Cli};
use btc_keygen::logging::{init_logging, LogLevel};
use btc_keygen::{KeygenConfig, KeygenError};

fn main() -> ExitCode {
    // Usage errors exit with clap's status 2 before anything else happens
    let cli = Cli::try_parse_args(normalize_args(std::env::args_os()))
        .unwrap_or_else(|e| e.exit());

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Logging may not be initialised yet, so report directly
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<(), KeygenError> {
    let config = KeygenConfig::from_env()?;

    let level = cli.log_level.as_deref().unwrap_or(config.log_level.as_str());
    init_logging(LogLevel::from(level), config.log_json)?;

    let report = run(cli, &config)?;

    let stdout = std::io::stdout();
    report.write_to(&mut stdout.lock(), cli.output_format())
}
