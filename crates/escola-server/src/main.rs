//! Escola: operator entry point for the authentication core.

mod cli;
mod commands;
mod logging;
mod settings;

use clap::Parser;

use crate::cli::Cli;
use crate::settings::Settings;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    let settings = Settings::from_env()?;

    commands::execute(&cli.command, &settings)
}
