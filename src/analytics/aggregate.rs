//! 报表行聚合
//!
//! 把一个活动的逐日行汇总成一条 `MetricsRecord`，并计算成本指标。

use serde::Serialize;

use crate::platform::ReportRow;

/// 求和的计数类指标
const COUNT_COLUMNS: [&str; 5] = [
    "sessions",
    "totalUsers",
    "newUsers",
    "screenPageViews",
    "conversions",
];

/// Aggregated metrics for one campaign over one report window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub sessions: f64,
    pub total_users: f64,
    pub new_users: f64,
    pub page_views: f64,
    /// 平均会话时长（秒），逐行算术平均
    pub avg_session_duration: f64,
    /// 跳出率，逐行算术平均
    pub bounce_rate: f64,
    pub conversions: f64,
    pub cost_per_acquisition: f64,
    pub cost_per_session: f64,
}

/// 单元格转数值，缺失或无法解析按 0 处理
pub fn coerce(row: &ReportRow, column: &str) -> f64 {
    row.get(column)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Aggregate the per-date rows of one campaign.
///
/// Counts are summed, duration and bounce rate are averaged over every row
/// (including rows where the cell was missing). An empty slice yields all
/// zeros.
pub fn aggregate(rows: &[ReportRow], budget: f64) -> MetricsRecord {
    if rows.is_empty() {
        return MetricsRecord::default();
    }

    let sum = |column: &str| rows.iter().map(|r| coerce(r, column)).sum::<f64>();
    let mean = |column: &str| sum(column) / rows.len() as f64;

    let [sessions, total_users, new_users, page_views, conversions] = COUNT_COLUMNS.map(sum);

    MetricsRecord {
        sessions,
        total_users,
        new_users,
        page_views,
        avg_session_duration: mean("averageSessionDuration"),
        bounce_rate: mean("bounceRate"),
        conversions,
        cost_per_acquisition: safe_ratio(budget, conversions),
        cost_per_session: safe_ratio(budget, sessions),
    }
}

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
