//! Generate QR codes command

use colored::Colorize;

use super::helpers::load_campaigns;
use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;
use crate::qr;

pub fn generate_qr(config: &StaticConfig, bare: bool) -> Result<(), CliError> {
    let file = load_campaigns(config)?;
    if file.campaigns.is_empty() {
        println!("{} No campaigns defined", "ℹ".bold().blue());
        return Ok(());
    }

    let mut qr_config = config.qr.clone();
    if bare {
        qr_config.label = false;
    }

    println!();
    println!("{}", "Generating QR codes...".bold().green());
    let result = qr::generate_all(&file.campaigns, &qr_config, &config.paths.qr_output_dir)?;

    let total = file.campaigns.len();
    for (i, generated) in result.generated.iter().enumerate() {
        println!(
            "{} [{}/{}] {} ({})",
            "✓".green(),
            i + 1,
            total,
            generated.campaign_name.bold(),
            generated.token.cyan()
        );
        println!("    file: {}", generated.path.display().to_string().blue());
        println!("    url:  {}", generated.url.underline());
    }
    for (name, err) in &result.failed {
        println!("{} {}: {}", "✗".red(), name.bold(), err.format_simple().red());
    }

    println!();
    println!(
        "{} {} generated, {} failed, output: {}",
        "ℹ".bold().blue(),
        result.success_count().to_string().green(),
        if result.failure_count() > 0 {
            result.failure_count().to_string().red()
        } else {
            result.failure_count().to_string().normal()
        },
        config.paths.qr_output_dir.blue()
    );
    Ok(())
}
