//! GA4 property settings and service account credentials

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{PrintlinkerError, Result};

/// Google OAuth 2.0 token endpoint
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// `properties/{id}` resource name used by both Analytics APIs
pub fn property_resource(property_id: &str) -> String {
    format!("properties/{}", property_id.trim())
}

/// `ga4_config.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub property_id: String,
    #[serde(default)]
    pub measurement_id: Option<String>,
}

impl PlatformConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PrintlinkerError::config_file(format!(
                "Failed to read platform config '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content).map_err(|e| match e {
            PrintlinkerError::Serialization(msg) => PrintlinkerError::config_file(format!(
                "Failed to parse '{}': {}",
                path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: PlatformConfig = serde_json::from_str(content)?;
        if config.property_id.trim().is_empty() {
            return Err(PrintlinkerError::config_file(
                "property_id is not set in the platform configuration",
            ));
        }
        debug!("Platform config loaded (property: {})", config.property_id);
        Ok(config)
    }

    /// 示例 JSON 模板
    pub fn template() -> String {
        let template = PlatformConfig {
            property_id: "YOUR_GA4_PROPERTY_ID".to_string(),
            measurement_id: Some("YOUR_MEASUREMENT_ID".to_string()),
        };
        serde_json::to_string_pretty(&template).unwrap_or_default()
    }
}

/// Service account key file downloaded from the Google Cloud console.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

// 不在日志中输出私钥
impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PrintlinkerError::credentials(format!(
                "Failed to read credentials '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            PrintlinkerError::credentials(format!(
                "Failed to parse credentials '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// Best-effort lookup of `client_email` for diagnostics.
pub fn service_account_email<P: AsRef<Path>>(path: P) -> String {
    fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
        .and_then(|json| json["client_email"].as_str().map(String::from))
        .unwrap_or_else(|| "unknown".to_string())
}
