//! Google Analytics 4 REST clients
//!
//! - `auth`: service account JWT -> access token
//! - `http`: blocking transport and remote error classification
//! - `admin`: Admin API (custom dimensions, conversion events, streams, settings)
//! - `data`: Data API (`runReport`)

pub mod admin;
pub mod auth;
pub mod data;
pub mod http;

pub use admin::{
    AdminApi, ConversionEvent, CustomDimension, DataRetentionSettings, DataStream,
    EnhancedMeasurementSettings, GoogleAdminClient,
};
pub use auth::{SCOPE_ANALYTICS_EDIT, SCOPE_ANALYTICS_READONLY, ServiceAccountAuth};
pub use data::{GoogleDataClient, ReportRow, ReportingApi, RunReportRequest, RunReportResponse};
pub use http::HttpTransport;

use crate::config::{HttpConfig, ServiceAccountKey};
use crate::errors::Result;

/// 认证并构造 Admin API 客户端
///
/// 认证失败直接返回错误，调用方按致命错误处理。
pub fn connect_admin(http_config: &HttpConfig, key: ServiceAccountKey) -> Result<GoogleAdminClient> {
    let http = HttpTransport::new(http_config.timeout_secs);
    let token = ServiceAccountAuth::new(key)?.fetch_access_token(&http, SCOPE_ANALYTICS_EDIT)?;
    Ok(GoogleAdminClient::new(
        http,
        &http_config.admin_base_url,
        token.token,
    ))
}

/// 认证并构造 Data API 客户端
pub fn connect_data(http_config: &HttpConfig, key: ServiceAccountKey) -> Result<GoogleDataClient> {
    let http = HttpTransport::new(http_config.timeout_secs);
    let token =
        ServiceAccountAuth::new(key)?.fetch_access_token(&http, SCOPE_ANALYTICS_READONLY)?;
    Ok(GoogleDataClient::new(
        http,
        &http_config.data_base_url,
        token.token,
    ))
}
