//! Info and permissions commands

use std::path::Path;

use colored::Colorize;

use super::helpers::{money, print_section, print_separator};
use crate::attribution::campaign_token;
use crate::config::{CampaignFile, StaticConfig, service_account_email};
use crate::interfaces::cli::CliError;

/// 统计目录下指定扩展名的文件数；目录不存在时为 None
fn count_files(dir: &str, extension: &str) -> Option<usize> {
    let entries = std::fs::read_dir(dir).ok()?;
    Some(
        entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
            })
            .count(),
    )
}

pub fn show_info(config: &StaticConfig) -> Result<(), CliError> {
    println!("{}", "Printlinker information".bold().green());

    match CampaignFile::load(&config.paths.campaigns_file) {
        Ok(file) => {
            print_section(&format!("Campaigns ({})", file.campaigns.len()));
            for (i, campaign) in file.campaigns.iter().enumerate() {
                println!();
                println!(
                    "  [{}] {} {}",
                    i + 1,
                    campaign.name.bold(),
                    campaign_token(campaign).dimmed()
                );
                println!("      Location: {}", campaign.location);
                println!(
                    "      Period:   {} ~ {}",
                    campaign.start_date, campaign.end_date
                );
                println!(
                    "      Budget:   {}",
                    money(&config.report.currency_symbol, campaign.budget)
                );
            }
        }
        Err(e) => println!(
            "{} Failed to load campaigns: {}",
            "✗".red(),
            e.format_simple()
        ),
    }

    print_section("Output files");
    if let Some(count) = count_files(&config.paths.qr_output_dir, "png") {
        println!("  - QR codes: {}", count);
    }
    if let Some(count) = count_files(&config.paths.report_output_dir, "csv") {
        println!("  - Reports:  {}", count);
    }
    Ok(())
}

pub fn show_permissions(config: &StaticConfig) -> Result<(), CliError> {
    println!("{}", "GA4 permission helper".bold().green());

    if !Path::new(&config.paths.credentials_file).exists() {
        return Err(CliError::CommandError(format!(
            "Service account key not found: {}",
            config.paths.credentials_file
        )));
    }
    let email = service_account_email(&config.paths.credentials_file);

    println!();
    println!("  Service account: {}", email.cyan().bold());
    print_separator();
    println!();
    println!("  1. Open https://analytics.google.com/");
    println!("  2. Go to Admin > Property access management");
    println!("  3. Click + and choose Add users");
    println!("  4. Paste the service account email: {}", email.cyan());
    println!("  5. Assign the Editor role and save");
    print_separator();
    println!();
    println!(
        "{} When access is granted, run: {}",
        "ℹ".bold().blue(),
        "printlinker configure-platform".cyan()
    );
    println!();
    println!("{}", "Organization-wide alternative (gcloud):".dimmed());
    println!("  gcloud projects add-iam-policy-binding YOUR_PROJECT_ID \\");
    println!("    --member='serviceAccount:{}' \\", email);
    println!("    --role='roles/analytics.admin'");
    Ok(())
}
