//! Campaign performance aggregation

pub mod aggregate;

pub use aggregate::{MetricsRecord, aggregate, coerce, round2, safe_ratio};
pub use crate::platform::ReportRow;

use crate::config::Campaign;

/// 单个活动在报表中的一行
#[derive(Debug, Clone)]
pub struct CampaignReport {
    pub campaign_name: String,
    pub location: String,
    pub token: String,
    pub budget: f64,
    /// `report_date` 或 `period` 的取值
    pub label: String,
    pub metrics: MetricsRecord,
}

impl CampaignReport {
    pub fn new(campaign: &Campaign, token: String, label: String, metrics: MetricsRecord) -> Self {
        Self {
            campaign_name: campaign.name.clone(),
            location: campaign.location.clone(),
            token,
            budget: campaign.budget,
            label,
            metrics,
        }
    }
}

/// 全部活动合计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSummary {
    pub campaigns: usize,
    pub total_budget: f64,
    pub total_sessions: f64,
    pub total_conversions: f64,
    /// 总预算 / 总转化（无转化时为 0）
    pub overall_cpa: f64,
}

pub fn summarize(reports: &[CampaignReport]) -> ReportSummary {
    let total_budget: f64 = reports.iter().map(|r| r.budget).sum();
    let total_sessions: f64 = reports.iter().map(|r| r.metrics.sessions).sum();
    let total_conversions: f64 = reports.iter().map(|r| r.metrics.conversions).sum();

    ReportSummary {
        campaigns: reports.len(),
        total_budget,
        total_sessions,
        total_conversions,
        overall_cpa: safe_ratio(total_budget, total_conversions),
    }
}
