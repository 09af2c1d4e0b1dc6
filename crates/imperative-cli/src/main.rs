mod commands;
mod config;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use imperative_core::{Logger, init_logger};

use crate::commands::Commands;
use crate::config::CliConfig;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "imperative")]
#[command(version = env!("IMPERATIVE_VERSION"))]
#[command(about = "Validate installed plugins and look up command profiles", long_about = None)]
struct Cli {
    /// Configuration file (default: ./imperative.toml)
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let logger = match init_logger(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            print_error(&CliError::Logging(e));
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = cli.command.execute(&config) {
        print_error(&e);
        if config.logging.file.is_some() {
            log_failure(&logger, e);
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn log_failure(logger: &Logger, error: CliError) {
    logger.log_error(&error.into_imperative());
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }

    if let Some(details) = error.additional_details() {
        eprintln!("{details}");
    }
}
