//! 报表 CSV 导出
//!
//! 文件以 UTF-8 BOM 开头，便于表格软件正确识别编码。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::WriterBuilder;

use crate::analytics::{CampaignReport, round2};
use crate::errors::{PrintlinkerError, Result};
use crate::utils::date_parser::DATE_FORMAT;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 固定列（标签列追加在最后）
const REPORT_COLUMNS: [&str; 13] = [
    "campaign_name",
    "campaign_id",
    "location",
    "budget",
    "total_sessions",
    "total_users",
    "new_users",
    "page_views",
    "avg_session_duration",
    "bounce_rate",
    "conversions",
    "cpa",
    "cost_per_session",
];

/// 报表类型，决定文件名与标签列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Daily(NaiveDate),
    Period { start: NaiveDate, end: NaiveDate },
}

impl ReportKind {
    pub fn file_name(&self) -> String {
        match self {
            Self::Daily(date) => format!("daily_report_{}.csv", date.format(DATE_FORMAT)),
            Self::Period { start, end } => format!(
                "period_report_{}_to_{}.csv",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            ),
        }
    }

    pub fn label_column(&self) -> &'static str {
        match self {
            Self::Daily(_) => "report_date",
            Self::Period { .. } => "period",
        }
    }

    /// Label for a campaign row; period rows show the intersected window.
    pub fn label_for(&self, start: NaiveDate, end: NaiveDate) -> String {
        match self {
            Self::Daily(date) => date.format(DATE_FORMAT).to_string(),
            Self::Period { .. } => format!(
                "{} ~ {}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            ),
        }
    }
}

fn format_amount(value: f64) -> String {
    format!("{}", round2(value))
}

fn format_count(value: f64) -> String {
    format!("{:.0}", value)
}

fn report_record(report: &CampaignReport) -> Vec<String> {
    let m = &report.metrics;
    vec![
        report.campaign_name.clone(),
        report.token.clone(),
        report.location.clone(),
        format_amount(report.budget),
        format_count(m.sessions),
        format_count(m.total_users),
        format_count(m.new_users),
        format_count(m.page_views),
        format_amount(m.avg_session_duration),
        format_amount(m.bounce_rate),
        format_count(m.conversions),
        format_amount(m.cost_per_acquisition),
        format_amount(m.cost_per_session),
        report.label.clone(),
    ]
}

/// 写出报表 CSV，返回文件路径
///
/// 目录不存在时自动创建。调用方负责在没有数据时跳过。
pub fn write_report_csv<P: AsRef<Path>>(
    reports: &[CampaignReport],
    kind: ReportKind,
    output_dir: P,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir).map_err(|e| {
        PrintlinkerError::file_operation(format!(
            "Failed to create report directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    let path = output_dir.join(kind.file_name());
    let file = File::create(&path).map_err(|e| {
        PrintlinkerError::file_operation(format!("Failed to create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    let mut header: Vec<&str> = REPORT_COLUMNS.to_vec();
    header.push(kind.label_column());
    csv_writer.write_record(&header)?;

    for report in reports {
        csv_writer.write_record(report_record(report))?;
    }

    csv_writer
        .flush()
        .map_err(|e| PrintlinkerError::file_operation(format!("Failed to flush CSV: {}", e)))?;

    Ok(path)
}
