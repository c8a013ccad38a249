//! Configure the GA4 property

use colored::Colorize;
use tracing::info;

use super::helpers::{conversion_events, load_platform, print_failure, print_section};
use crate::config::{ServiceAccountKey, StaticConfig, service_account_email};
use crate::interfaces::cli::CliError;
use crate::platform::{AdminApi, connect_admin};
use crate::services::{SetupService, SetupSummary, SyncOutcome, save_gtm_helper};

fn print_outcomes(outcomes: &[(String, SyncOutcome)]) {
    for (name, outcome) in outcomes {
        match outcome {
            SyncOutcome::Created | SyncOutcome::Updated => {
                println!("  {} {} ({})", "✓".green(), name, outcome.label().green())
            }
            SyncOutcome::AlreadyExists => {
                println!("  {} {} ({})", "-".dimmed(), name, outcome.label().dimmed())
            }
            SyncOutcome::Failed(err) => print_failure(name, err),
        }
    }
}

fn print_summary(summary: &SetupSummary) {
    print_section("Custom dimensions");
    print_outcomes(&summary.dimensions);

    print_section("Enhanced measurement");
    if summary.enhanced_measurement.is_empty() {
        println!("  {} No web data streams found", "ℹ".bold().blue());
    }
    print_outcomes(&summary.enhanced_measurement);

    print_section("Data retention");
    if let Some(outcome) = &summary.data_retention {
        print_outcomes(&[("14 months, reset on new activity".to_string(), outcome.clone())]);
    }

    print_section("Conversion events");
    print_outcomes(&summary.conversion_events);
}

fn print_next_steps() {
    print_section("Next steps");
    println!("  1. Import the variables and tags from gtm_setup_helper.json into Tag Manager");
    println!("  2. Map the UTM variables onto the custom dimensions in the GA4 configuration tag");
    println!("  3. Use the custom dimensions in GA4 explorations");
    println!("  4. Add triggers for the conversion events in Tag Manager");
}

/// Run the sync against an already connected Admin API client.
pub fn configure_with<A: AdminApi>(
    config: &StaticConfig,
    api: A,
    property_id: &str,
    service_account: &str,
) -> Result<SetupSummary, CliError> {
    let events = conversion_events(config);
    let service = SetupService::new(api, property_id, service_account);

    let summary = service.setup_all(&events);
    print_summary(&summary);

    let report_dir = &config.paths.report_output_dir;
    match service.save_setup_report(report_dir) {
        Ok(path) => println!(
            "\n{} Setup report saved: {}",
            "✓".green(),
            path.display().to_string().blue()
        ),
        Err(e) => print_failure("Saving setup report", &e),
    }
    match save_gtm_helper(&events, report_dir) {
        Ok(path) => println!(
            "{} Tag Manager helper saved: {}",
            "✓".green(),
            path.display().to_string().blue()
        ),
        Err(e) => print_failure("Saving Tag Manager helper", &e),
    }

    Ok(summary)
}

pub fn configure_platform(config: &StaticConfig) -> Result<(), CliError> {
    println!("{}", "Configuring GA4 property...".bold().green());

    let platform = load_platform(config)?;
    let key = ServiceAccountKey::load(&config.paths.credentials_file)?;
    let email = key.client_email.clone();

    let api = connect_admin(&config.http, key).map_err(|e| {
        println!(
            "  {} Service account: {}",
            "ℹ".bold().blue(),
            service_account_email(&config.paths.credentials_file)
        );
        CliError::from(e)
    })?;
    println!("{} Authenticated as {}", "✓".green(), email.cyan());

    let summary = configure_with(config, api, platform.property_id.trim(), &email)?;
    info!(
        "Platform configuration finished: {} created, {} failed",
        summary.created_count(),
        summary.failure_count()
    );

    println!();
    if summary.failure_count() == 0 {
        println!("{}", "GA4 configuration complete.".bold().green());
    } else {
        println!(
            "{} {} step(s) failed; see messages above",
            "⚠".yellow(),
            summary.failure_count()
        );
    }
    print_next_steps();
    Ok(())
}
