//! Blocking HTTP transport for the Google APIs
//!
//! 所有远程调用都通过同一个 ureq Agent 发出；非 2xx 响应根据
//! Google 错误体中的 `status` 字段归类为对应的错误类型。

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use ureq::Agent;
use ureq::http::Response;

use crate::errors::{PrintlinkerError, Result};

pub struct HttpTransport {
    agent: Agent,
}

impl HttpTransport {
    pub fn new(timeout_secs: u64) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }

    pub fn get_json<T: DeserializeOwned>(&self, url: &str, bearer: &str) -> Result<T> {
        trace!("GET {}", url);
        let resp = self
            .agent
            .get(url)
            .header("Authorization", format!("Bearer {}", bearer))
            .call()?;
        read_json(resp, url)
    }

    pub fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        bearer: &str,
        body: &B,
    ) -> Result<T> {
        trace!("POST {}", url);
        let resp = self
            .agent
            .post(url)
            .header("Authorization", format!("Bearer {}", bearer))
            .send_json(body)?;
        read_json(resp, url)
    }

    /// Partial update with an `updateMask` query parameter.
    pub fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        bearer: &str,
        update_mask: &[&str],
        body: &B,
    ) -> Result<T> {
        let mask = update_mask.join(",");
        trace!("PATCH {} (updateMask={})", url, mask);
        let resp = self
            .agent
            .patch(url)
            .query("updateMask", &mask)
            .header("Authorization", format!("Bearer {}", bearer))
            .send_json(body)?;
        read_json(resp, url)
    }

    pub fn post_form<T: DeserializeOwned>(&self, url: &str, form: &[(&str, &str)]) -> Result<T> {
        trace!("POST (form) {}", url);
        let resp = self.agent.post(url).send_form(form.iter().copied())?;
        read_json(resp, url)
    }
}

fn read_json<T: DeserializeOwned>(resp: Response<ureq::Body>, url: &str) -> Result<T> {
    let status = resp.status().as_u16();
    let body = resp.into_body().read_to_string()?;

    if !(200..300).contains(&status) {
        debug!("Request to {} failed with HTTP {}", url, status);
        return Err(classify_error(status, &body));
    }

    // 空响应体按空对象处理
    let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
    serde_json::from_str(body).map_err(|e| {
        PrintlinkerError::remote_api(format!("Unexpected response from {}: {}", url, e))
    })
}

/// 将 HTTP 状态码与 Google 错误体映射为错误类型
///
/// Google API 错误体格式：
/// `{"error": {"code": 403, "message": "...", "status": "PERMISSION_DENIED"}}`
/// OAuth 端点格式：`{"error": "invalid_grant", "error_description": "..."}`
pub fn classify_error(status: u16, body: &str) -> PrintlinkerError {
    let json: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
    let error = &json["error"];

    let (grpc_status, message) = if error.is_object() {
        (
            error["status"].as_str().unwrap_or_default().to_string(),
            error["message"].as_str().unwrap_or_default().to_string(),
        )
    } else if let Some(code) = error.as_str() {
        let description = json["error_description"].as_str().unwrap_or(code);
        (String::new(), format!("{}: {}", code, description))
    } else {
        (String::new(), body.trim().to_string())
    };

    let message = if message.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, message)
    };

    match grpc_status.as_str() {
        "PERMISSION_DENIED" => return PrintlinkerError::permission_denied(message),
        "UNAUTHENTICATED" => return PrintlinkerError::authentication(message),
        "RESOURCE_EXHAUSTED" => return PrintlinkerError::quota_exceeded(message),
        "NOT_FOUND" => return PrintlinkerError::not_found(message),
        _ => {}
    }

    match status {
        400 if json["error"].is_string() => PrintlinkerError::authentication(message),
        401 => PrintlinkerError::authentication(message),
        403 => PrintlinkerError::permission_denied(message),
        404 => PrintlinkerError::not_found(message),
        429 => PrintlinkerError::quota_exceeded(message),
        _ => PrintlinkerError::remote_api(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_permission_denied() {
        let body = r#"{"error": {"code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED"}}"#;
        let err = classify_error(403, body);
        assert!(matches!(err, PrintlinkerError::PermissionDenied(_)));
        assert!(err.message().contains("does not have permission"));
    }

    #[test]
    fn test_classify_resource_exhausted() {
        let body = r#"{"error": {"code": 400, "message": "limit reached", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert!(matches!(
            classify_error(400, body),
            PrintlinkerError::QuotaExceeded(_)
        ));
    }

    #[test]
    fn test_classify_oauth_error() {
        let body = r#"{"error": "invalid_grant", "error_description": "Invalid JWT Signature."}"#;
        let err = classify_error(400, body);
        assert!(matches!(err, PrintlinkerError::Authentication(_)));
        assert!(err.message().contains("invalid_grant"));
    }

    #[test]
    fn test_classify_by_status_code() {
        assert!(matches!(
            classify_error(401, ""),
            PrintlinkerError::Authentication(_)
        ));
        assert!(matches!(
            classify_error(429, "slow down"),
            PrintlinkerError::QuotaExceeded(_)
        ));
        assert!(matches!(
            classify_error(500, "<html>oops</html>"),
            PrintlinkerError::RemoteApi(_)
        ));
        assert_eq!(classify_error(502, "").message(), "HTTP 502");
    }
}
