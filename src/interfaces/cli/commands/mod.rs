//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod config_gen;
mod configure;
mod generate_qr;
pub mod helpers;
mod info;
mod report;
mod setup;

pub use config_gen::*;
pub use configure::*;
pub use generate_qr::*;
pub use info::*;
pub use report::*;
pub use setup::*;

use colored::Colorize;

use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;

/// QR generation, platform configuration and yesterday's report.
///
/// 每一步独立执行，失败只打印错误，不影响后续步骤。
pub fn run_all(config: &StaticConfig) -> Result<(), CliError> {
    println!("{}", "Running all steps...".bold().green());

    let steps: [(&str, &dyn Fn() -> Result<(), CliError>); 3] = [
        ("1. QR code generation", &|| generate_qr(config, false)),
        ("2. GA4 configuration", &|| configure_platform(config)),
        ("3. Daily report (yesterday)", &|| daily_report(config, None)),
    ];

    let mut failed = 0;
    for (title, step) in steps {
        println!();
        helpers::print_separator();
        println!("{}", title.bold().cyan());
        if let Err(e) = step() {
            failed += 1;
            eprintln!("{}", e.format_colored());
        }
    }

    println!();
    if failed == 0 {
        println!("{}", "All steps completed.".bold().green());
    } else {
        println!("{} {} step(s) failed", "⚠".yellow(), failed);
    }
    Ok(())
}
