//! Analytics Data API (`runReport`)

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::HttpTransport;
use crate::errors::Result;
use crate::utils::date_parser::DATE_FORMAT;

/// 报表维度（活动维度在中间插入）
pub const REPORT_DIMENSIONS: [&str; 4] = ["date", "sessionSource", "sessionMedium", "landingPage"];

/// 报表指标
pub const REPORT_METRICS: [&str; 7] = [
    "sessions",
    "totalUsers",
    "newUsers",
    "screenPageViews",
    "averageSessionDuration",
    "bounceRate",
    "conversions",
];

/// One report row: column name to raw string value.
pub type ReportRow = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedField {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringFilter {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub field_name: String,
    pub string_filter: StringFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpression {
    pub filter: Filter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReportRequest {
    pub date_ranges: Vec<DateRange>,
    pub dimensions: Vec<NamedField>,
    pub metrics: Vec<NamedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_filter: Option<FilterExpression>,
}

impl RunReportRequest {
    /// 单个活动的报表请求：按 `campaign_dimension == token` 过滤
    pub fn for_campaign(
        campaign_dimension: &str,
        token: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        let mut dimensions: Vec<NamedField> = REPORT_DIMENSIONS
            .iter()
            .map(|name| NamedField {
                name: name.to_string(),
            })
            .collect();
        dimensions.insert(
            1,
            NamedField {
                name: campaign_dimension.to_string(),
            },
        );

        Self {
            date_ranges: vec![DateRange {
                start_date: start.format(DATE_FORMAT).to_string(),
                end_date: end.format(DATE_FORMAT).to_string(),
            }],
            dimensions,
            metrics: REPORT_METRICS
                .iter()
                .map(|name| NamedField {
                    name: name.to_string(),
                })
                .collect(),
            dimension_filter: Some(FilterExpression {
                filter: Filter {
                    field_name: campaign_dimension.to_string(),
                    string_filter: StringFilter {
                        value: token.to_string(),
                    },
                },
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Header {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default)]
    pub dimension_values: Vec<Cell>,
    #[serde(default)]
    pub metric_values: Vec<Cell>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReportResponse {
    #[serde(default)]
    pub dimension_headers: Vec<Header>,
    #[serde(default)]
    pub metric_headers: Vec<Header>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl RunReportResponse {
    /// 按表头把每一行展开为 `列名 -> 值`
    ///
    /// 缺失的单元格不写入，由聚合阶段按 0 处理。
    pub fn into_records(self) -> Vec<ReportRow> {
        let dimension_names: Vec<String> =
            self.dimension_headers.into_iter().map(|h| h.name).collect();
        let metric_names: Vec<String> = self.metric_headers.into_iter().map(|h| h.name).collect();

        self.rows
            .into_iter()
            .map(|row| {
                let mut record = ReportRow::new();
                for (name, cell) in dimension_names.iter().zip(row.dimension_values) {
                    record.insert(name.clone(), cell.value);
                }
                for (name, cell) in metric_names.iter().zip(row.metric_values) {
                    record.insert(name.clone(), cell.value);
                }
                record
            })
            .collect()
    }
}

/// 报表查询接口
pub trait ReportingApi {
    /// `property` 为资源名，例如 `properties/123456`
    fn run_report(&self, property: &str, request: &RunReportRequest) -> Result<RunReportResponse>;
}

impl<T: ReportingApi + ?Sized> ReportingApi for &T {
    fn run_report(&self, property: &str, request: &RunReportRequest) -> Result<RunReportResponse> {
        (**self).run_report(property, request)
    }
}

/// Data API REST 客户端
pub struct GoogleDataClient {
    http: HttpTransport,
    base_url: String,
    token: String,
}

impl GoogleDataClient {
    pub fn new(http: HttpTransport, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }
}

impl ReportingApi for GoogleDataClient {
    fn run_report(&self, property: &str, request: &RunReportRequest) -> Result<RunReportResponse> {
        let url = format!("{}/{}:runReport", self.base_url, property);
        let response: RunReportResponse = self.http.post_json(&url, &self.token, request)?;
        debug!(
            "runReport on {} returned {} row(s)",
            property,
            response.rows.len()
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_request_shape() {
        let req = RunReportRequest::for_campaign(
            "sessionCampaignName",
            "1283efc4",
            date("2024-03-01"),
            date("2024-03-31"),
        );
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["dateRanges"][0]["startDate"], "2024-03-01");
        assert_eq!(json["dateRanges"][0]["endDate"], "2024-03-31");

        let dims: Vec<&str> = req.dimensions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            dims,
            vec!["date", "sessionCampaignName", "sessionSource", "sessionMedium", "landingPage"]
        );
        assert_eq!(req.metrics.len(), 7);

        let filter = &json["dimensionFilter"]["filter"];
        assert_eq!(filter["fieldName"], "sessionCampaignName");
        assert_eq!(filter["stringFilter"]["value"], "1283efc4");
    }

    #[test]
    fn test_into_records() {
        let body = r#"{
            "dimensionHeaders": [{"name": "date"}, {"name": "sessionCampaignName"}],
            "metricHeaders": [{"name": "sessions", "type": "TYPE_INTEGER"}, {"name": "conversions"}],
            "rows": [
                {"dimensionValues": [{"value": "20240301"}, {"value": "1283efc4"}],
                 "metricValues": [{"value": "12"}, {"value": "3"}]},
                {"dimensionValues": [{"value": "20240302"}, {"value": "1283efc4"}],
                 "metricValues": [{"value": "5"}]}
            ],
            "rowCount": 2
        }"#;
        let resp: RunReportResponse = serde_json::from_str(body).unwrap();
        let records = resp.into_records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["date"], "20240301");
        assert_eq!(records[0]["sessions"], "12");
        assert_eq!(records[0]["conversions"], "3");
        assert!(!records[1].contains_key("conversions"));
    }

    #[test]
    fn test_empty_response() {
        let resp: RunReportResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.into_records().is_empty());
    }
}
