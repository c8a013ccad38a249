use std::process;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing::debug;

use printlinker::cli::Cli;
use printlinker::config::StaticConfig;
use printlinker::interfaces::cli::{CliError, run_cli_command};
use printlinker::system::init_logging;

fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = StaticConfig::load(cli.config.as_deref()).map_err(CliError::from)?;
    // guard 必须存活到进程结束，保证日志写完
    let _guard = init_logging(&config.logging).context("Failed to initialize logging")?;
    debug!("Settings: {:?}", config);

    run_cli_command(cli.command, &config)?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        match e.downcast_ref::<CliError>() {
            Some(cli_err) => eprintln!("{}", cli_err.format_colored()),
            None => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
        process::exit(1);
    }
}
