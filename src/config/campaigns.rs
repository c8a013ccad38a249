//! Campaign definitions (`campaigns.yml`)
//!
//! The file carries the campaign list and an optional list of conversion
//! events to provision on the analytics property.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{PrintlinkerError, Result};
use crate::utils::url_validator::validate_url;

/// 一个纸媒广告活动
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    pub target_url: String,
}

impl Campaign {
    /// Whether `date` falls inside `[start_date, end_date]`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// 校验活动字段
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PrintlinkerError::validation("Campaign name cannot be empty"));
        }
        if self.start_date > self.end_date {
            return Err(PrintlinkerError::validation(format!(
                "Campaign '{}': start_date {} is after end_date {}",
                self.name, self.start_date, self.end_date
            )));
        }
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(PrintlinkerError::validation(format!(
                "Campaign '{}': budget must be a non-negative number, got {}",
                self.name, self.budget
            )));
        }
        Ok(())
    }
}

/// 转化事件定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionEventDef {
    pub event_name: String,
    #[serde(default)]
    pub description: String,
}

/// `campaigns.yml` 的完整结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignFile {
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub conversion_events: Vec<ConversionEventDef>,
}

impl CampaignFile {
    /// Load and validate a campaign file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PrintlinkerError::config_file(format!(
                "Failed to read campaign file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let file = Self::from_yaml(&content).map_err(|e| match e {
            PrintlinkerError::ConfigFile(msg) => PrintlinkerError::config_file(format!(
                "Failed to parse '{}': {}",
                path.display(),
                msg
            )),
            other => other,
        })?;
        debug!(
            "Loaded {} campaigns from {}",
            file.campaigns.len(),
            path.display()
        );
        Ok(file)
    }

    /// Parse and validate YAML content.
    pub fn from_yaml(content: &str) -> Result<Self> {
        // 空文件视为没有活动
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: CampaignFile = serde_yaml::from_str(content)?;
        for campaign in &file.campaigns {
            campaign.validate()?;
            if let Err(e) = validate_url(&campaign.target_url) {
                warn!(
                    "Campaign '{}' target_url is not an absolute http(s) URL ({}); attribution parameters will be appended best-effort",
                    campaign.name, e
                );
            }
        }
        Ok(file)
    }

    /// 配置的转化事件；为空时使用默认事件
    pub fn conversion_events_or_default(&self) -> Vec<ConversionEventDef> {
        if self.conversion_events.is_empty() {
            default_conversion_events()
        } else {
            self.conversion_events.clone()
        }
    }
}

/// 默认转化事件
pub fn default_conversion_events() -> Vec<ConversionEventDef> {
    vec![
        ConversionEventDef {
            event_name: "qr_code_scan".to_string(),
            description: "Visit arriving from a printed QR code".to_string(),
        },
        ConversionEventDef {
            event_name: "campaign_click".to_string(),
            description: "Click on a campaign link".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
campaigns:
  - name: Spring Sale
    location: Station Front
    start_date: 2024-03-01
    end_date: 2024-03-31
    budget: 50000
    target_url: https://example.com/sale?ref=flyer
conversion_events:
  - event_name: purchase
    description: Completed order
"#;

    #[test]
    fn test_parse_sample() {
        let file = CampaignFile::from_yaml(SAMPLE).unwrap();
        assert_eq!(file.campaigns.len(), 1);
        let c = &file.campaigns[0];
        assert_eq!(c.name, "Spring Sale");
        assert_eq!(c.start_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(c.budget, 50000.0);
        assert_eq!(file.conversion_events_or_default()[0].event_name, "purchase");
    }

    #[test]
    fn test_default_conversion_events_when_absent() {
        let yaml = "campaigns: []\n";
        let file = CampaignFile::from_yaml(yaml).unwrap();
        let events: Vec<String> = file
            .conversion_events_or_default()
            .into_iter()
            .map(|e| e.event_name)
            .collect();
        assert_eq!(events, vec!["qr_code_scan", "campaign_click"]);
    }

    #[test]
    fn test_rejects_inverted_window() {
        let yaml = r#"
campaigns:
  - name: Broken
    location: Nowhere
    start_date: 2024-05-10
    end_date: 2024-05-01
    budget: 100
    target_url: https://example.com
"#;
        let err = CampaignFile::from_yaml(yaml).unwrap_err();
        assert_eq!(err.code(), "E003");
        assert!(err.message().contains("Broken"));
    }

    #[test]
    fn test_rejects_negative_budget() {
        let yaml = r#"
campaigns:
  - name: Negative
    location: Mall
    start_date: 2024-05-01
    end_date: 2024-05-02
    budget: -1
    target_url: https://example.com
"#;
        assert!(CampaignFile::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = CampaignFile::from_yaml("campaigns: [ {name: ").unwrap_err();
        assert_eq!(err.code(), "E001");
    }

    #[test]
    fn test_missing_file() {
        let err = CampaignFile::load("/definitely/not/here/campaigns.yml").unwrap_err();
        assert!(matches!(err, PrintlinkerError::ConfigFile(_)));
    }

    #[test]
    fn test_is_active_on_inclusive() {
        let file = CampaignFile::from_yaml(SAMPLE).unwrap();
        let c = &file.campaigns[0];
        assert!(c.is_active_on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(c.is_active_on(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
        assert!(!c.is_active_on(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
    }
}
