//! Shared helpers for CLI commands

use colored::Colorize;
use tracing::warn;

use crate::config::{CampaignFile, ConversionEventDef, PlatformConfig, StaticConfig};
use crate::errors::PrintlinkerError;
use crate::interfaces::cli::CliError;

pub const SEPARATOR_WIDTH: usize = 60;

pub fn load_campaigns(config: &StaticConfig) -> Result<CampaignFile, CliError> {
    let file = CampaignFile::load(&config.paths.campaigns_file)?;
    println!(
        "{} Loaded {} campaign(s) from {}",
        "✓".green(),
        file.campaigns.len(),
        config.paths.campaigns_file.blue()
    );
    Ok(file)
}

pub fn load_platform(config: &StaticConfig) -> Result<PlatformConfig, CliError> {
    let platform = PlatformConfig::load(&config.paths.platform_config_file)?;
    println!(
        "{} GA4 property: {}",
        "✓".green(),
        platform.property_id.cyan()
    );
    Ok(platform)
}

/// 转化事件；活动文件读取失败时退回默认事件
pub fn conversion_events(config: &StaticConfig) -> Vec<ConversionEventDef> {
    match CampaignFile::load(&config.paths.campaigns_file) {
        Ok(file) => {
            if file.conversion_events.is_empty() {
                println!(
                    "  {} No conversion_events in {}, using defaults",
                    "ℹ".bold().blue(),
                    config.paths.campaigns_file
                );
            }
            file.conversion_events_or_default()
        }
        Err(e) => {
            warn!("Failed to read conversion events: {}", e);
            println!(
                "  {} Could not read {}, using default conversion events",
                "⚠".yellow(),
                config.paths.campaigns_file
            );
            crate::config::default_conversion_events()
        }
    }
}

pub fn print_section(title: &str) {
    println!();
    println!("{}", title.bold().cyan());
}

pub fn print_separator() {
    println!("{}", "=".repeat(SEPARATOR_WIDTH).dimmed());
}

/// 打印远程错误但不中断
pub fn print_failure(what: &str, err: &PrintlinkerError) {
    println!(
        "  {} {}: {}",
        "✗".red(),
        what,
        err.format_simple().red()
    );
}

/// `¥50,000` 风格金额
pub fn money(symbol: &str, value: f64) -> String {
    format!("{}{}", symbol, crate::utils::format_thousands(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money("¥", 50000.0), "¥50,000");
        assert_eq!(money("$", 1234.56), "$1,235");
    }
}
