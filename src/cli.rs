//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for printlinker using clap's derive macros.

use clap::{Parser, Subcommand};

/// Printlinker - print campaign measurement with QR codes and GA4
#[derive(Parser)]
#[command(name = "printlinker")]
#[command(version)]
#[command(
    about = "Trackable QR codes, GA4 property setup and cost reports for print campaigns",
    long_about = None
)]
pub struct Cli {
    /// Settings file (default: printlinker.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create output directories and check required input files
    Setup,

    /// Generate a QR code for every campaign
    GenerateQr {
        /// Emit the bare code without the text label
        #[arg(long)]
        bare: bool,
    },

    /// Create custom dimensions and conversion events, enable enhanced
    /// measurement and set data retention on the GA4 property
    #[command(visible_alias = "configure-ga4")]
    ConfigurePlatform,

    /// Daily report (defaults to yesterday)
    #[command(visible_alias = "generate-report")]
    Report {
        /// Report date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Report over a date range
    #[command(visible_alias = "generate-period-report")]
    PeriodReport {
        /// First day of the period (YYYY-MM-DD)
        #[arg(long)]
        start_date: String,

        /// Last day of the period (YYYY-MM-DD)
        #[arg(long)]
        end_date: String,
    },

    /// QR generation, platform configuration and yesterday's report in order
    All,

    /// Show campaigns and output file counts
    Info,

    /// Show how to grant the service account access to the property
    Permissions,

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Settings file commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate a settings file with default values
    Generate {
        /// Output path (default: printlinker.toml)
        output_path: Option<String>,

        /// Overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
