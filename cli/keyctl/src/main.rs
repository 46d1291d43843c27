//! keyctl (dtmkey) - key conversion CLI for the dtm platform.
//!
//! Converts between the text key shapes used by the building-data API:
//! short keys, full keys, xref keys, system IDs, and the GUID display form.

use clap::Parser;

mod commands;
mod output;

use commands::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.run() {
        output::print_error(&e);
        std::process::exit(1);
    }
}
