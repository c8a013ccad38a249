//! Analytics Admin API
//!
//! `AdminApi` 是配置同步服务依赖的抽象，`GoogleAdminClient` 为其 REST 实现。
//! 所有资源名都是完整路径，例如 `properties/123456`。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use url::form_urlencoded;

use super::http::HttpTransport;
use crate::errors::Result;

/// 自定义维度作用域
pub const SCOPE_EVENT: &str = "EVENT";
/// Web 数据流类型
pub const WEB_DATA_STREAM: &str = "WEB_DATA_STREAM";

/// 增强型衡量需要开启的字段（也是 PATCH 的 updateMask）
pub const ENHANCED_MEASUREMENT_FIELDS: [&str; 7] = [
    "streamEnabled",
    "scrollsEnabled",
    "outboundClicksEnabled",
    "siteSearchEnabled",
    "videoEngagementEnabled",
    "fileDownloadsEnabled",
    "formInteractionsEnabled",
];

const PAGE_SIZE: &str = "200";

/// 数据保留设置的 updateMask
pub const DATA_RETENTION_FIELDS: [&str; 2] = ["eventDataRetention", "resetUserDataOnNewActivity"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDimension {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub parameter_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scope: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionEvent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebStreamData {
    #[serde(default)]
    pub measurement_id: String,
    #[serde(default)]
    pub firebase_app_id: String,
    #[serde(default)]
    pub default_uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStream {
    pub name: String,
    #[serde(default, rename = "type")]
    pub stream_type: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_stream_data: Option<WebStreamData>,
}

impl DataStream {
    pub fn is_web(&self) -> bool {
        self.stream_type == WEB_DATA_STREAM
    }
}

/// 增强型衡量设置
///
/// 未建模的字段（如 `searchQueryParameter`）通过 `extra` 原样保留。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedMeasurementSettings {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub stream_enabled: bool,
    #[serde(default)]
    pub scrolls_enabled: bool,
    #[serde(default)]
    pub outbound_clicks_enabled: bool,
    #[serde(default)]
    pub site_search_enabled: bool,
    #[serde(default)]
    pub video_engagement_enabled: bool,
    #[serde(default)]
    pub file_downloads_enabled: bool,
    #[serde(default)]
    pub form_interactions_enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnhancedMeasurementSettings {
    /// 打开全部七个开关
    pub fn enable_all(&mut self) {
        self.stream_enabled = true;
        self.scrolls_enabled = true;
        self.outbound_clicks_enabled = true;
        self.site_search_enabled = true;
        self.video_engagement_enabled = true;
        self.file_downloads_enabled = true;
        self.form_interactions_enabled = true;
    }

    pub fn all_enabled(&self) -> bool {
        self.stream_enabled
            && self.scrolls_enabled
            && self.outbound_clicks_enabled
            && self.site_search_enabled
            && self.video_engagement_enabled
            && self.file_downloads_enabled
            && self.form_interactions_enabled
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRetentionSettings {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub event_data_retention: String,
    #[serde(default)]
    pub reset_user_data_on_new_activity: bool,
}

/// Retention period accepted by the Admin API for the given month count.
///
/// Standard properties only support 2 and 14 months; anything else is
/// rounded to the nearest supported value.
pub fn retention_period(months: u32) -> &'static str {
    match months {
        0..=2 => "TWO_MONTHS",
        3..=14 => "FOURTEEN_MONTHS",
        15..=26 => "TWENTY_SIX_MONTHS",
        27..=38 => "THIRTY_EIGHT_MONTHS",
        _ => "FIFTY_MONTHS",
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListCustomDimensionsResponse {
    #[serde(default)]
    custom_dimensions: Vec<CustomDimension>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListConversionEventsResponse {
    #[serde(default)]
    conversion_events: Vec<ConversionEvent>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDataStreamsResponse {
    #[serde(default)]
    data_streams: Vec<DataStream>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Admin API 操作
pub trait AdminApi {
    fn list_custom_dimensions(&self, property: &str) -> Result<Vec<CustomDimension>>;

    fn create_custom_dimension(
        &self,
        property: &str,
        dimension: &CustomDimension,
    ) -> Result<CustomDimension>;

    fn list_conversion_events(&self, property: &str) -> Result<Vec<ConversionEvent>>;

    fn create_conversion_event(&self, property: &str, event_name: &str) -> Result<ConversionEvent>;

    fn list_data_streams(&self, property: &str) -> Result<Vec<DataStream>>;

    /// `stream` 为数据流资源名，例如 `properties/1/dataStreams/2`
    fn get_enhanced_measurement(&self, stream: &str) -> Result<EnhancedMeasurementSettings>;

    fn update_enhanced_measurement(
        &self,
        stream: &str,
        settings: &EnhancedMeasurementSettings,
    ) -> Result<EnhancedMeasurementSettings>;

    fn get_data_retention(&self, property: &str) -> Result<DataRetentionSettings>;

    fn update_data_retention(
        &self,
        property: &str,
        settings: &DataRetentionSettings,
    ) -> Result<DataRetentionSettings>;
}

impl<T: AdminApi + ?Sized> AdminApi for &T {
    fn list_custom_dimensions(&self, property: &str) -> Result<Vec<CustomDimension>> {
        (**self).list_custom_dimensions(property)
    }

    fn create_custom_dimension(
        &self,
        property: &str,
        dimension: &CustomDimension,
    ) -> Result<CustomDimension> {
        (**self).create_custom_dimension(property, dimension)
    }

    fn list_conversion_events(&self, property: &str) -> Result<Vec<ConversionEvent>> {
        (**self).list_conversion_events(property)
    }

    fn create_conversion_event(&self, property: &str, event_name: &str) -> Result<ConversionEvent> {
        (**self).create_conversion_event(property, event_name)
    }

    fn list_data_streams(&self, property: &str) -> Result<Vec<DataStream>> {
        (**self).list_data_streams(property)
    }

    fn get_enhanced_measurement(&self, stream: &str) -> Result<EnhancedMeasurementSettings> {
        (**self).get_enhanced_measurement(stream)
    }

    fn update_enhanced_measurement(
        &self,
        stream: &str,
        settings: &EnhancedMeasurementSettings,
    ) -> Result<EnhancedMeasurementSettings> {
        (**self).update_enhanced_measurement(stream, settings)
    }

    fn get_data_retention(&self, property: &str) -> Result<DataRetentionSettings> {
        (**self).get_data_retention(property)
    }

    fn update_data_retention(
        &self,
        property: &str,
        settings: &DataRetentionSettings,
    ) -> Result<DataRetentionSettings> {
        (**self).update_data_retention(property, settings)
    }
}

/// Admin API REST 客户端
pub struct GoogleAdminClient {
    http: HttpTransport,
    base_url: String,
    token: String,
}

impl GoogleAdminClient {
    pub fn new(http: HttpTransport, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    /// 逐页拉取，直到没有 `nextPageToken`
    fn list_all<R, T>(
        &self,
        resource: &str,
        split: impl Fn(R) -> (Vec<T>, Option<String>),
    ) -> Result<Vec<T>>
    where
        R: serde::de::DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = form_urlencoded::Serializer::new(String::new());
            query.append_pair("pageSize", PAGE_SIZE);
            if let Some(token) = &page_token {
                query.append_pair("pageToken", token);
            }
            let url = format!("{}?{}", self.url(resource), query.finish());
            let page: R = self.http.get_json(&url, &self.token)?;
            let (mut batch, next) = split(page);
            items.append(&mut batch);
            match next {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        debug!("Listed {} item(s) from {}", items.len(), resource);
        Ok(items)
    }
}

impl AdminApi for GoogleAdminClient {
    fn list_custom_dimensions(&self, property: &str) -> Result<Vec<CustomDimension>> {
        self.list_all(
            &format!("{}/customDimensions", property),
            |r: ListCustomDimensionsResponse| (r.custom_dimensions, r.next_page_token),
        )
    }

    fn create_custom_dimension(
        &self,
        property: &str,
        dimension: &CustomDimension,
    ) -> Result<CustomDimension> {
        self.http.post_json(
            &self.url(&format!("{}/customDimensions", property)),
            &self.token,
            dimension,
        )
    }

    fn list_conversion_events(&self, property: &str) -> Result<Vec<ConversionEvent>> {
        self.list_all(
            &format!("{}/conversionEvents", property),
            |r: ListConversionEventsResponse| (r.conversion_events, r.next_page_token),
        )
    }

    fn create_conversion_event(&self, property: &str, event_name: &str) -> Result<ConversionEvent> {
        let body = ConversionEvent {
            event_name: event_name.to_string(),
            ..Default::default()
        };
        self.http.post_json(
            &self.url(&format!("{}/conversionEvents", property)),
            &self.token,
            &body,
        )
    }

    fn list_data_streams(&self, property: &str) -> Result<Vec<DataStream>> {
        self.list_all(
            &format!("{}/dataStreams", property),
            |r: ListDataStreamsResponse| (r.data_streams, r.next_page_token),
        )
    }

    fn get_enhanced_measurement(&self, stream: &str) -> Result<EnhancedMeasurementSettings> {
        self.http.get_json(
            &self.url(&format!("{}/enhancedMeasurementSettings", stream)),
            &self.token,
        )
    }

    fn update_enhanced_measurement(
        &self,
        stream: &str,
        settings: &EnhancedMeasurementSettings,
    ) -> Result<EnhancedMeasurementSettings> {
        self.http.patch_json(
            &self.url(&format!("{}/enhancedMeasurementSettings", stream)),
            &self.token,
            &ENHANCED_MEASUREMENT_FIELDS,
            settings,
        )
    }

    fn get_data_retention(&self, property: &str) -> Result<DataRetentionSettings> {
        self.http.get_json(
            &self.url(&format!("{}/dataRetentionSettings", property)),
            &self.token,
        )
    }

    fn update_data_retention(
        &self,
        property: &str,
        settings: &DataRetentionSettings,
    ) -> Result<DataRetentionSettings> {
        self.http.patch_json(
            &self.url(&format!("{}/dataRetentionSettings", property)),
            &self.token,
            &DATA_RETENTION_FIELDS,
            settings,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_dimension_wire_format() {
        let dim = CustomDimension {
            parameter_name: "campaign_id".to_string(),
            display_name: "Campaign ID".to_string(),
            description: "Print campaign token".to_string(),
            scope: SCOPE_EVENT.to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&dim).unwrap();
        assert_eq!(json["parameterName"], "campaign_id");
        assert_eq!(json["displayName"], "Campaign ID");
        assert_eq!(json["scope"], "EVENT");
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_list_response_parsing() {
        let body = r#"{
            "customDimensions": [
                {"name": "properties/1/customDimensions/9", "parameterName": "utm_term", "scope": "EVENT"}
            ],
            "nextPageToken": "abc"
        }"#;
        let resp: ListCustomDimensionsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.custom_dimensions[0].parameter_name, "utm_term");
        assert_eq!(resp.next_page_token.as_deref(), Some("abc"));

        let empty: ListConversionEventsResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.conversion_events.is_empty());
        assert!(empty.next_page_token.is_none());
    }

    #[test]
    fn test_data_stream_kind() {
        let body = r#"{
            "name": "properties/1/dataStreams/2",
            "type": "WEB_DATA_STREAM",
            "displayName": "Site",
            "webStreamData": {"measurementId": "G-TEST", "defaultUri": "https://example.com"}
        }"#;
        let stream: DataStream = serde_json::from_str(body).unwrap();
        assert!(stream.is_web());
        assert_eq!(stream.web_stream_data.unwrap().measurement_id, "G-TEST");
    }

    #[test]
    fn test_enhanced_measurement_keeps_unknown_fields() {
        let body = r#"{
            "name": "properties/1/dataStreams/2/enhancedMeasurementSettings",
            "streamEnabled": true,
            "searchQueryParameter": "q,s"
        }"#;
        let mut settings: EnhancedMeasurementSettings = serde_json::from_str(body).unwrap();
        assert!(!settings.all_enabled());
        settings.enable_all();
        assert!(settings.all_enabled());

        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["searchQueryParameter"], "q,s");
        for field in ENHANCED_MEASUREMENT_FIELDS {
            assert_eq!(json[field], true, "{} should be enabled", field);
        }
    }

    #[test]
    fn test_retention_period() {
        assert_eq!(retention_period(14), "FOURTEEN_MONTHS");
        assert_eq!(retention_period(2), "TWO_MONTHS");
        assert_eq!(retention_period(26), "TWENTY_SIX_MONTHS");
    }
}
