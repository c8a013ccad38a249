//! Daily and period report commands

use chrono::NaiveDate;
use colored::Colorize;

use super::helpers::{load_campaigns, load_platform, money, print_separator};
use crate::analytics::{ReportSummary, round2, summarize};
use crate::config::{ServiceAccountKey, StaticConfig};
use crate::errors::PrintlinkerError;
use crate::interfaces::cli::CliError;
use crate::platform::{ReportingApi, connect_data};
use crate::services::{ReportOutcome, ReportService};
use crate::utils::csv_handler::ReportKind;
use crate::utils::date_parser::{parse_date, yesterday};
use crate::utils::format_thousands;

fn print_outcome(outcome: &ReportOutcome, currency: &str) {
    if let Some(path) = &outcome.csv_path {
        println!(
            "\n{} CSV report: {}",
            "✓".green(),
            path.display().to_string().blue()
        );
    }
    for name in &outcome.failed {
        println!("{} {}: data fetch failed, reported as zeros", "✗".red(), name);
    }

    if outcome.reports.is_empty() {
        println!("{} No campaign data for this report", "⚠".yellow());
        return;
    }

    println!();
    println!("{}", "Report summary".bold().green());
    print_separator();
    for report in &outcome.reports {
        let m = &report.metrics;
        println!();
        println!("{}", format!("[{}]", report.campaign_name).bold());
        println!("  Location:        {}", report.location);
        println!("  Campaign ID:     {}", report.token.cyan());
        println!("  Budget:          {}", money(currency, report.budget));
        println!("  Sessions:        {}", format_thousands(m.sessions));
        println!("  Users:           {}", format_thousands(m.total_users));
        println!("  New users:       {}", format_thousands(m.new_users));
        println!("  Bounce rate:     {}", round2(m.bounce_rate));
        println!("  Conversions:     {}", format_thousands(m.conversions));
        println!("  CPA:             {}", money(currency, m.cost_per_acquisition));
        println!("  Cost/session:    {}", money(currency, m.cost_per_session));
    }

    print_totals(&summarize(&outcome.reports), currency);
}

fn print_totals(summary: &ReportSummary, currency: &str) {
    println!();
    print_separator();
    println!("{}", "[Totals]".bold());
    println!("  Total budget:      {}", money(currency, summary.total_budget));
    println!(
        "  Total sessions:    {}",
        format_thousands(summary.total_sessions)
    );
    println!(
        "  Total conversions: {}",
        format_thousands(summary.total_conversions)
    );
    if summary.total_conversions > 0.0 {
        println!("  Overall CPA:       {}", money(currency, summary.overall_cpa));
    }
}

/// Run one report against an already connected Data API client.
pub fn report_with<R: ReportingApi>(
    config: &StaticConfig,
    api: R,
    property_id: &str,
    kind: ReportKind,
) -> Result<ReportOutcome, CliError> {
    let file = load_campaigns(config)?;
    let service = ReportService::new(api, property_id, &config.report.campaign_dimension);
    let outcome = service.run(&file.campaigns, kind, &config.paths.report_output_dir)?;
    print_outcome(&outcome, &config.report.currency_symbol);
    Ok(outcome)
}

fn run_report(config: &StaticConfig, kind: ReportKind) -> Result<(), CliError> {
    let platform = load_platform(config)?;
    let key = ServiceAccountKey::load(&config.paths.credentials_file)?;
    let api = connect_data(&config.http, key)?;
    report_with(config, api, platform.property_id.trim(), kind)?;
    Ok(())
}

pub fn daily_report(config: &StaticConfig, date: Option<String>) -> Result<(), CliError> {
    let date = match date {
        Some(d) => parse_date(&d)?,
        None => yesterday(),
    };
    println!(
        "{} {}",
        "Generating daily report for".bold().green(),
        date.to_string().cyan()
    );
    run_report(config, ReportKind::Daily(date))
}

pub fn period_report(config: &StaticConfig, start: &str, end: &str) -> Result<(), CliError> {
    let start: NaiveDate = parse_date(start)?;
    let end: NaiveDate = parse_date(end)?;
    if start > end {
        return Err(PrintlinkerError::validation(format!(
            "Start date {} is after end date {}",
            start, end
        ))
        .into());
    }
    println!(
        "{} {} ~ {}",
        "Generating period report for".bold().green(),
        start.to_string().cyan(),
        end.to_string().cyan()
    );
    run_report(config, ReportKind::Period { start, end })
}
