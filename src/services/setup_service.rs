//! Analytics property configuration sync
//!
//! 每一项操作都是独立且幂等的：先列出现有资源，存在则跳过，不存在才创建。
//! 单项失败只记录日志并返回 `SyncOutcome::Failed`，不会中断其他操作。

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::{ConversionEventDef, property_resource};
use crate::errors::{PrintlinkerError, Result};
use crate::platform::admin::{SCOPE_EVENT, retention_period};
use crate::platform::{AdminApi, CustomDimension, DataRetentionSettings};

/// 每个 property 的自定义维度上限
pub const MAX_CUSTOM_DIMENSIONS: usize = 50;
/// 默认数据保留月数
pub const DEFAULT_RETENTION_MONTHS: u32 = 14;
pub const SETUP_REPORT_FILE: &str = "ga4_setup_report.json";

/// 需要注册的自定义维度定义
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionDef {
    pub parameter_name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
}

/// Print-campaign dimensions plus one per attribution parameter.
pub const CANONICAL_DIMENSIONS: [DimensionDef; 9] = [
    DimensionDef {
        parameter_name: "campaign_id",
        display_name: "Campaign ID",
        description: "Print campaign token",
    },
    DimensionDef {
        parameter_name: "campaign_name",
        display_name: "Campaign Name",
        description: "Print campaign name",
    },
    DimensionDef {
        parameter_name: "campaign_location",
        display_name: "Campaign Location",
        description: "Where the print material was distributed",
    },
    DimensionDef {
        parameter_name: "print_medium",
        display_name: "Print Medium",
        description: "Flyer, poster or other print format",
    },
    DimensionDef {
        parameter_name: "utm_source",
        display_name: "UTM Source",
        description: "Traffic source",
    },
    DimensionDef {
        parameter_name: "utm_medium",
        display_name: "UTM Medium",
        description: "Marketing medium",
    },
    DimensionDef {
        parameter_name: "utm_campaign",
        display_name: "UTM Campaign",
        description: "Campaign token",
    },
    DimensionDef {
        parameter_name: "utm_content",
        display_name: "UTM Content",
        description: "Distribution location",
    },
    DimensionDef {
        parameter_name: "utm_term",
        display_name: "UTM Term",
        description: "Campaign name",
    },
];

/// 单项同步结果
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    Created,
    AlreadyExists,
    Updated,
    Failed(PrintlinkerError),
}

impl SyncOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, SyncOutcome::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            SyncOutcome::Created => "created",
            SyncOutcome::AlreadyExists => "already exists",
            SyncOutcome::Updated => "updated",
            SyncOutcome::Failed(_) => "failed",
        }
    }
}

/// 全部同步操作的结果，按执行顺序排列
#[derive(Debug, Default)]
pub struct SetupSummary {
    pub dimensions: Vec<(String, SyncOutcome)>,
    pub enhanced_measurement: Vec<(String, SyncOutcome)>,
    pub data_retention: Option<SyncOutcome>,
    pub conversion_events: Vec<(String, SyncOutcome)>,
}

impl SetupSummary {
    fn all(&self) -> impl Iterator<Item = &SyncOutcome> {
        self.dimensions
            .iter()
            .map(|(_, o)| o)
            .chain(self.enhanced_measurement.iter().map(|(_, o)| o))
            .chain(self.data_retention.iter())
            .chain(self.conversion_events.iter().map(|(_, o)| o))
    }

    pub fn failure_count(&self) -> usize {
        self.all().filter(|o| o.is_failed()).count()
    }

    pub fn created_count(&self) -> usize {
        self.all()
            .filter(|o| matches!(o, SyncOutcome::Created))
            .count()
    }
}

// ============ Setup report ============

#[derive(Debug, Clone, Serialize)]
pub struct DimensionEntry {
    pub name: String,
    pub display_name: String,
    pub parameter_name: String,
    pub scope: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebStreamEntry {
    pub measurement_id: String,
    pub firebase_app_id: String,
    pub default_uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataStreamEntry {
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub stream_type: String,
    pub web_stream_data: Option<WebStreamEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionEventEntry {
    pub event_name: String,
}

/// Snapshot of the property written after setup.
#[derive(Debug, Clone, Serialize)]
pub struct SetupReport {
    pub setup_date: String,
    pub property_id: String,
    pub custom_dimensions: Vec<DimensionEntry>,
    pub data_streams: Vec<DataStreamEntry>,
    pub conversion_events: Vec<ConversionEventEntry>,
}

/// 配置同步服务
pub struct SetupService<A: AdminApi> {
    api: A,
    property_id: String,
    service_account: String,
}

impl<A: AdminApi> SetupService<A> {
    pub fn new(api: A, property_id: impl Into<String>, service_account: impl Into<String>) -> Self {
        Self {
            api,
            property_id: property_id.into(),
            service_account: service_account.into(),
        }
    }

    fn property(&self) -> String {
        property_resource(&self.property_id)
    }

    /// 记录失败；权限不足时附带授权提示
    fn failed(&self, what: &str, err: PrintlinkerError) -> SyncOutcome {
        error!("{} failed: {}", what, err);
        if matches!(err, PrintlinkerError::PermissionDenied(_)) {
            warn!(
                "Grant the Editor role on property {} to service account {}",
                self.property_id, self.service_account
            );
        }
        SyncOutcome::Failed(err)
    }

    /// Create an EVENT-scoped custom dimension unless one with the same
    /// parameter name exists.
    pub fn ensure_custom_dimension(&self, def: &DimensionDef) -> SyncOutcome {
        let what = format!("Custom dimension '{}'", def.parameter_name);
        let property = self.property();

        let existing = match self.api.list_custom_dimensions(&property) {
            Ok(list) => list,
            Err(e) => return self.failed(&what, e),
        };

        if existing
            .iter()
            .any(|d| d.parameter_name == def.parameter_name)
        {
            info!("{} already exists, skipping", what);
            return SyncOutcome::AlreadyExists;
        }

        if existing.len() >= MAX_CUSTOM_DIMENSIONS {
            return self.failed(
                &what,
                PrintlinkerError::quota_exceeded(format!(
                    "Property already has {} custom dimensions (limit {})",
                    existing.len(),
                    MAX_CUSTOM_DIMENSIONS
                )),
            );
        }

        let dimension = CustomDimension {
            parameter_name: def.parameter_name.to_string(),
            display_name: def.display_name.to_string(),
            description: def.description.to_string(),
            scope: SCOPE_EVENT.to_string(),
            ..Default::default()
        };

        match self.api.create_custom_dimension(&property, &dimension) {
            Ok(_) => {
                info!("{} created", what);
                SyncOutcome::Created
            }
            Err(e) => self.failed(&what, e),
        }
    }

    pub fn ensure_conversion_event(&self, event_name: &str) -> SyncOutcome {
        let what = format!("Conversion event '{}'", event_name);
        let property = self.property();

        let existing = match self.api.list_conversion_events(&property) {
            Ok(list) => list,
            Err(e) => return self.failed(&what, e),
        };

        if existing.iter().any(|e| e.event_name == event_name) {
            info!("{} already exists, skipping", what);
            return SyncOutcome::AlreadyExists;
        }

        match self.api.create_conversion_event(&property, event_name) {
            Ok(_) => {
                info!("{} created", what);
                SyncOutcome::Created
            }
            Err(e) => self.failed(&what, e),
        }
    }

    /// Turn on every enhanced-measurement flag for each web data stream.
    ///
    /// Returns one outcome per web stream, keyed by its display name.
    pub fn enable_enhanced_measurement(&self) -> Vec<(String, SyncOutcome)> {
        let streams = match self.api.list_data_streams(&self.property()) {
            Ok(streams) => streams,
            Err(e) => {
                return vec![(
                    "data streams".to_string(),
                    self.failed("Listing data streams", e),
                )];
            }
        };

        let mut outcomes = Vec::new();
        for stream in streams.iter().filter(|s| s.is_web()) {
            let label = if stream.display_name.is_empty() {
                stream.name.clone()
            } else {
                stream.display_name.clone()
            };
            let what = format!("Enhanced measurement for '{}'", label);

            let outcome = match self.api.get_enhanced_measurement(&stream.name) {
                Ok(mut settings) => {
                    settings.enable_all();
                    match self.api.update_enhanced_measurement(&stream.name, &settings) {
                        Ok(_) => {
                            info!("{} enabled", what);
                            SyncOutcome::Updated
                        }
                        Err(e) => self.failed(&what, e),
                    }
                }
                Err(e) => self.failed(&what, e),
            };
            outcomes.push((label, outcome));
        }

        if outcomes.is_empty() {
            warn!("No web data streams found on property {}", self.property_id);
        }
        outcomes
    }

    pub fn set_data_retention(&self, months: u32, reset_on_new_activity: bool) -> SyncOutcome {
        let what = "Data retention update";
        let property = self.property();

        let mut settings: DataRetentionSettings = match self.api.get_data_retention(&property) {
            Ok(settings) => settings,
            Err(e) => return self.failed(what, e),
        };
        settings.event_data_retention = retention_period(months).to_string();
        settings.reset_user_data_on_new_activity = reset_on_new_activity;

        match self.api.update_data_retention(&property, &settings) {
            Ok(_) => {
                info!(
                    "Data retention set to {} (reset on new activity: {})",
                    settings.event_data_retention, reset_on_new_activity
                );
                SyncOutcome::Updated
            }
            Err(e) => self.failed(what, e),
        }
    }

    /// Run every sync step in order; never stops early.
    pub fn setup_all(&self, conversion_events: &[ConversionEventDef]) -> SetupSummary {
        let dimensions = CANONICAL_DIMENSIONS
            .iter()
            .map(|def| {
                (
                    def.parameter_name.to_string(),
                    self.ensure_custom_dimension(def),
                )
            })
            .collect();

        let enhanced_measurement = self.enable_enhanced_measurement();
        let data_retention = Some(self.set_data_retention(DEFAULT_RETENTION_MONTHS, true));

        let conversion_events = conversion_events
            .iter()
            .map(|event| {
                (
                    event.event_name.clone(),
                    self.ensure_conversion_event(&event.event_name),
                )
            })
            .collect();

        SetupSummary {
            dimensions,
            enhanced_measurement,
            data_retention,
            conversion_events,
        }
    }

    /// 读取当前 property 状态；单项读取失败时该列表为空
    pub fn build_setup_report(&self) -> SetupReport {
        let property = self.property();

        let custom_dimensions = self
            .api
            .list_custom_dimensions(&property)
            .unwrap_or_else(|e| {
                warn!("Failed to list custom dimensions: {}", e);
                Vec::new()
            })
            .into_iter()
            .map(|d| DimensionEntry {
                name: d.name,
                display_name: d.display_name,
                parameter_name: d.parameter_name,
                scope: d.scope,
            })
            .collect();

        let data_streams = self
            .api
            .list_data_streams(&property)
            .unwrap_or_else(|e| {
                warn!("Failed to list data streams: {}", e);
                Vec::new()
            })
            .into_iter()
            .map(|s| DataStreamEntry {
                name: s.name,
                display_name: s.display_name,
                stream_type: s.stream_type,
                web_stream_data: s.web_stream_data.map(|w| WebStreamEntry {
                    measurement_id: w.measurement_id,
                    firebase_app_id: w.firebase_app_id,
                    default_uri: w.default_uri,
                }),
            })
            .collect();

        let conversion_events = self
            .api
            .list_conversion_events(&property)
            .unwrap_or_else(|e| {
                warn!("Failed to list conversion events: {}", e);
                Vec::new()
            })
            .into_iter()
            .map(|e| ConversionEventEntry {
                event_name: e.event_name,
            })
            .collect();

        SetupReport {
            setup_date: Local::now().to_rfc3339(),
            property_id: self.property_id.clone(),
            custom_dimensions,
            data_streams,
            conversion_events,
        }
    }

    /// 写出 `ga4_setup_report.json`
    pub fn save_setup_report<P: AsRef<Path>>(&self, output_dir: P) -> Result<PathBuf> {
        let report = self.build_setup_report();
        write_json(output_dir.as_ref(), SETUP_REPORT_FILE, &report)
    }
}

/// 以缩进 JSON 写入 `dir/file_name`，目录不存在时创建
pub fn write_json<T: Serialize>(dir: &Path, file_name: &str, value: &T) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| {
        PrintlinkerError::file_operation(format!(
            "Failed to create directory {}: {}",
            dir.display(),
            e
        ))
    })?;
    let path = dir.join(file_name);
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, content).map_err(|e| {
        PrintlinkerError::file_operation(format!("Failed to write {}: {}", path.display(), e))
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_dimensions_cover_attribution_params() {
        use crate::attribution::AttributionParam;
        use strum::IntoEnumIterator;

        for param in AttributionParam::iter() {
            assert!(
                CANONICAL_DIMENSIONS
                    .iter()
                    .any(|d| d.parameter_name == param.as_ref()),
                "missing dimension for {}",
                param.as_ref()
            );
        }
        assert!(CANONICAL_DIMENSIONS.len() < MAX_CUSTOM_DIMENSIONS);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(SyncOutcome::Created.label(), "created");
        assert!(SyncOutcome::Failed(PrintlinkerError::network("x")).is_failed());
        assert!(!SyncOutcome::AlreadyExists.is_failed());
    }

    #[test]
    fn test_summary_counts() {
        let summary = SetupSummary {
            dimensions: vec![
                ("a".to_string(), SyncOutcome::Created),
                ("b".to_string(), SyncOutcome::AlreadyExists),
            ],
            enhanced_measurement: vec![(
                "web".to_string(),
                SyncOutcome::Failed(PrintlinkerError::permission_denied("no")),
            )],
            data_retention: Some(SyncOutcome::Updated),
            conversion_events: vec![("qr_code_scan".to_string(), SyncOutcome::Created)],
        };
        assert_eq!(summary.created_count(), 2);
        assert_eq!(summary.failure_count(), 1);
    }
}
