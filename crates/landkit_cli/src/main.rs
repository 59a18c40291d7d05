//! landkit CLI entry point.
//!
//! # Responsibility
//! - Check site configurations before they ship with a page.
//! - Dry-run form rules against sample input.
//!
//! Exit code `0` means valid, `1` means invalid or failed.

use clap::Parser;
use landkit_core::{core_version, default_log_level, init_logging};

mod cli;
mod commands;

use crate::cli::{Cli, Command};
use crate::commands::{run_check, run_validate};

const LOG_DIR_ENV: &str = "LANDKIT_LOG_DIR";

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_file_logging(cli.log_level.as_deref()) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match cli.command {
        Command::Check(args) => match run_check(&args) {
            Ok(plan) => {
                print!("{plan}");
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Validate(args) => match run_validate(&args) {
            Ok((report, out)) => {
                print!("{out}");
                if report.is_valid() {
                    0
                } else {
                    1
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Version => {
            println!("landkit {}", env!("CARGO_PKG_VERSION"));
            println!("landkit_core {}", core_version());
            0
        }
    };
    std::process::exit(exit_code);
}

/// File logging is opt-in through `LANDKIT_LOG_DIR`.
fn init_file_logging(level: Option<&str>) -> Result<(), String> {
    let Ok(log_dir) = std::env::var(LOG_DIR_ENV) else {
        return Ok(());
    };
    if log_dir.trim().is_empty() {
        return Ok(());
    }
    init_logging(level.unwrap_or(default_log_level()), &log_dir)
}
