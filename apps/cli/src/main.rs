//! qhelpkit CLI — build Qt help collections from legacy HTML documentation.
//!
//! Extracts keyword indexes from several index formats, writes the help
//! project and collection descriptors, and runs the help compiler.

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
