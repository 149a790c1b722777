//! Toolcard CLI: extract structured tool results from chat transcripts.
//!
//! Parses fenced tool-result segments out of assistant text and emits
//! them as JSON records, or strips them for clean display text.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
