//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "landkit",
    version,
    about = "Check landkit site configurations and dry-run form rules"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level for file logs (`trace|debug|info|warn|error`).
    ///
    /// File logging is enabled only when `LANDKIT_LOG_DIR` is set.
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a site configuration and print the resolved feature plan.
    Check(CheckArgs),

    /// Run one form's rules against sample field values.
    Validate(ValidateArgs),

    /// Print tool and core versions.
    Version,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the site configuration JSON.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Path to the site configuration JSON.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Selector of the form to check, as written in the config.
    #[arg(long = "form", value_name = "SELECTOR")]
    pub form: String,

    /// Text value for one field.
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Marks a checkbox field as checked.
    #[arg(long = "checked", value_name = "NAME")]
    pub checked: Vec<String>,
}

pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("field name is empty in `{raw}`"));
    }
    Ok((name.to_string(), value.to_string()))
}
