//! Output formatting for CLI commands.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One value per line.
    #[default]
    Plain,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Parses the `--format` argument.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown format '{other}' (expected 'plain' or 'json')"),
        }
    }
}

/// Print a single converted value.
pub fn print_value(value: &str, format: OutputFormat) {
    match format {
        OutputFormat::Plain => println!("{value}"),
        OutputFormat::Json => print_json(&serde_json::json!({ "value": value })),
    }
}

/// Print a list of converted values, one per line in plain mode.
pub fn print_list(values: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Plain => {
            for value in values {
                println!("{value}");
            }
        }
        OutputFormat::Json => print_json(&values),
    }
}

/// Print any serializable payload as pretty JSON.
pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("{} failed to serialize output: {e}", "Error:".red().bold()),
    }
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {err}", "Error:".red().bold());

    if let Some(key_err) = err.downcast_ref::<dtm_keys::KeyError>() {
        if key_err.is_unexpected_length() {
            eprintln!(
                "\n{}",
                "Hint: run without --strict for best-effort conversion of mis-sized input."
                    .yellow()
            );
        }
    }
}
