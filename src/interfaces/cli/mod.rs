//! CLI interface module
//!
//! This module provides command-line interface functionality for printlinker.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::config::StaticConfig;
use crate::errors::PrintlinkerError;
use commands::{
    config_generate, configure_platform, daily_report, generate_qr, period_report,
    run_all, run_setup, show_info, show_permissions,
};

#[derive(Debug)]
pub enum CliError {
    /// 配置、凭据、远程调用等领域错误
    Domain(PrintlinkerError),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::Domain(err) => err.format_simple(),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::Domain(err) => err.format_colored(),
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<PrintlinkerError> for CliError {
    fn from(err: PrintlinkerError) -> Self {
        CliError::Domain(err)
    }
}

/// Run a CLI command from clap-parsed input
pub fn run_cli_command(cmd: Commands, config: &StaticConfig) -> Result<(), CliError> {
    match cmd {
        Commands::Setup => run_setup(config),

        Commands::GenerateQr { bare } => generate_qr(config, bare),

        Commands::ConfigurePlatform => configure_platform(config),

        Commands::Report { date } => daily_report(config, date),

        Commands::PeriodReport {
            start_date,
            end_date,
        } => period_report(config, &start_date, &end_date),

        Commands::All => run_all(config),

        Commands::Info => show_info(config),

        Commands::Permissions => show_permissions(config),

        Commands::Config { action } => match action {
            ConfigCommands::Generate { output_path, force } => {
                config_generate(output_path, force)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_errors_keep_format_hint() {
        let err: CliError = PrintlinkerError::date_parse("Invalid date 'x'").into();
        assert!(matches!(err, CliError::Domain(PrintlinkerError::DateParse(_))));
        assert!(err.to_string().contains("Invalid date 'x'"));
        assert!(err.format_colored().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_domain_error_keeps_hint() {
        let err: CliError = PrintlinkerError::permission_denied("HTTP 403").into();
        assert!(err.format_colored().contains("Editor role"));
        assert!(err.to_string().contains("HTTP 403"));
    }
}
