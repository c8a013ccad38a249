//! Setup command: create directories and check input files

use std::path::Path;

use colored::Colorize;

use crate::config::{PlatformConfig, StaticConfig};
use crate::interfaces::cli::CliError;

/// 需要创建的目录
fn directories(config: &StaticConfig) -> Vec<String> {
    let mut dirs = Vec::new();
    for file in [
        &config.paths.credentials_file,
        &config.paths.platform_config_file,
    ] {
        if let Some(parent) = Path::new(file).parent()
            && !parent.as_os_str().is_empty()
        {
            let parent = parent.display().to_string();
            if !dirs.contains(&parent) {
                dirs.push(parent);
            }
        }
    }
    dirs.push(config.paths.qr_output_dir.clone());
    dirs.push(config.paths.report_output_dir.clone());
    dirs
}

pub fn run_setup(config: &StaticConfig) -> Result<(), CliError> {
    println!("{}", "Setting up printlinker workspace...".bold().green());

    for dir in directories(config) {
        std::fs::create_dir_all(&dir).map_err(|e| {
            CliError::CommandError(format!("Failed to create directory {}: {}", dir, e))
        })?;
        println!("{} Directory ready: {}", "✓".green(), dir.blue());
    }

    let required = [
        (&config.paths.campaigns_file, "Campaign list"),
        (&config.paths.credentials_file, "Service account key"),
        (&config.paths.platform_config_file, "GA4 property config"),
    ];

    let missing: Vec<_> = required
        .iter()
        .filter(|(path, description)| {
            if Path::new(path).exists() {
                println!("{} {}: {}", "✓".green(), description, path.blue());
                false
            } else {
                println!("{} {} not found: {}", "✗".red(), description, path.yellow());
                true
            }
        })
        .collect();

    if missing.is_empty() {
        println!();
        println!("{}", "All configuration files are in place.".green());
        return Ok(());
    }

    println!();
    println!("{}", "Please create the following files:".yellow());
    for (path, description) in &missing {
        println!("  - {} ({})", path, description);
    }

    if missing
        .iter()
        .any(|(path, _)| **path == config.paths.platform_config_file)
    {
        println!();
        println!(
            "{} {}:",
            "Template for".dimmed(),
            config.paths.platform_config_file
        );
        println!("{}", PlatformConfig::template());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directories_from_defaults() {
        let dirs = directories(&StaticConfig::default());
        assert_eq!(dirs, vec!["config", "output/qr_codes", "output/reports"]);
    }
}
