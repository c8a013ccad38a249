//! Campaign performance reports
//!
//! - 日报：报表日期落在活动期间内的活动逐一查询
//! - 期间报表：活动期间与报表期间取交集，交集为空则跳过
//!
//! 单个活动查询失败时记录日志，该活动以全零指标写入报表，并列入 `failed`。

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use crate::analytics::{CampaignReport, MetricsRecord, aggregate};
use crate::attribution::campaign_token;
use crate::config::{Campaign, property_resource};
use crate::errors::{PrintlinkerError, Result};
use crate::platform::{ReportingApi, RunReportRequest};
use crate::utils::csv_handler::{ReportKind, write_report_csv};
use crate::utils::date_parser::intersect_windows;

/// 一次报表运行的结果
#[derive(Debug)]
pub struct ReportOutcome {
    pub kind: ReportKind,
    pub reports: Vec<CampaignReport>,
    /// 没有数据时不写文件
    pub csv_path: Option<PathBuf>,
    /// 查询失败的活动名
    pub failed: Vec<String>,
}

pub struct ReportService<R: ReportingApi> {
    api: R,
    property_id: String,
    campaign_dimension: String,
}

impl<R: ReportingApi> ReportService<R> {
    pub fn new(
        api: R,
        property_id: impl Into<String>,
        campaign_dimension: impl Into<String>,
    ) -> Self {
        Self {
            api,
            property_id: property_id.into(),
            campaign_dimension: campaign_dimension.into(),
        }
    }

    /// Fetch and aggregate one campaign over `[start, end]`.
    ///
    /// `token` is the campaign's attribution token, used as the dimension filter.
    pub fn fetch_campaign(
        &self,
        campaign: &Campaign,
        token: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<MetricsRecord> {
        let request = RunReportRequest::for_campaign(&self.campaign_dimension, token, start, end);
        let property = property_resource(&self.property_id);

        let rows = self.api.run_report(&property, &request)?.into_records();
        debug!(
            "Campaign '{}' ({}): {} row(s) for {} ~ {}",
            campaign.name,
            token,
            rows.len(),
            start,
            end
        );
        Ok(aggregate(&rows, campaign.budget))
    }

    /// 计算每个活动需要查询的窗口；不在范围内的返回 None
    fn window_for(&self, kind: ReportKind, campaign: &Campaign) -> Option<(NaiveDate, NaiveDate)> {
        match kind {
            ReportKind::Daily(date) => campaign.is_active_on(date).then_some((date, date)),
            ReportKind::Period { start, end } => {
                intersect_windows((campaign.start_date, campaign.end_date), (start, end))
            }
        }
    }

    /// Build the per-campaign rows for `kind`, in campaign order.
    pub fn collect(&self, campaigns: &[Campaign], kind: ReportKind) -> Result<ReportOutcome> {
        if let ReportKind::Period { start, end } = kind
            && start > end
        {
            return Err(PrintlinkerError::validation(format!(
                "Report start date {} is after end date {}",
                start, end
            )));
        }

        let mut reports = Vec::new();
        let mut failed = Vec::new();

        for campaign in campaigns {
            let Some((start, end)) = self.window_for(kind, campaign) else {
                debug!("Campaign '{}' is outside the report window", campaign.name);
                continue;
            };

            info!("Processing campaign '{}'", campaign.name);
            let token = campaign_token(campaign);
            let metrics = match self.fetch_campaign(campaign, &token, start, end) {
                Ok(metrics) => metrics,
                Err(e) => {
                    error!("Failed to fetch data for '{}': {}", campaign.name, e);
                    failed.push(campaign.name.clone());
                    MetricsRecord::default()
                }
            };
            reports.push(CampaignReport::new(
                campaign,
                token,
                kind.label_for(start, end),
                metrics,
            ));
        }

        Ok(ReportOutcome {
            kind,
            reports,
            csv_path: None,
            failed,
        })
    }

    /// Collect rows and write the CSV into `output_dir` when there are any.
    pub fn run<P: AsRef<Path>>(
        &self,
        campaigns: &[Campaign],
        kind: ReportKind,
        output_dir: P,
    ) -> Result<ReportOutcome> {
        let mut outcome = self.collect(campaigns, kind)?;

        if outcome.reports.is_empty() {
            warn!("No campaign data for this report, nothing written");
            return Ok(outcome);
        }

        let path = write_report_csv(&outcome.reports, kind, output_dir)?;
        info!("Report written to {}", path.display());
        outcome.csv_path = Some(path);
        Ok(outcome)
    }

    /// 日报
    pub fn daily_report<P: AsRef<Path>>(
        &self,
        campaigns: &[Campaign],
        date: NaiveDate,
        output_dir: P,
    ) -> Result<ReportOutcome> {
        self.run(campaigns, ReportKind::Daily(date), output_dir)
    }

    /// 期间报表
    pub fn period_report<P: AsRef<Path>>(
        &self,
        campaigns: &[Campaign],
        start: NaiveDate,
        end: NaiveDate,
        output_dir: P,
    ) -> Result<ReportOutcome> {
        self.run(campaigns, ReportKind::Period { start, end }, output_dir)
    }
}
