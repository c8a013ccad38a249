//! Tag-manager setup helper
//!
//! 生成 `gtm_setup_helper.json`：URL 查询变量映射、GA4 配置标签字段、
//! 建议的转化事件标签与触发器。仅为参考文件，不调用任何远程 API。

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use strum::IntoEnumIterator;

use super::setup_service::write_json;
use crate::attribution::{AttributionParam, MEDIUM_VALUE, SOURCE_VALUE};
use crate::config::ConversionEventDef;
use crate::errors::Result;

pub const GTM_HELPER_FILE: &str = "gtm_setup_helper.json";
const PRINT_TRIGGER: &str = "Page View - Print Campaign";

#[derive(Debug, Clone, Serialize)]
pub struct VariableMapping {
    pub parameter: String,
    pub variable_name: String,
    pub variable_type: String,
    pub component_type: String,
    pub query_key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldToSet {
    pub field_name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationTag {
    pub tag_name: String,
    pub tag_type: String,
    pub trigger: String,
    pub fields_to_set: Vec<FieldToSet>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventTag {
    pub tag_name: String,
    pub event_name: String,
    pub description: String,
    pub trigger: String,
    pub parameters: Vec<FieldToSet>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trigger {
    pub trigger_name: String,
    pub trigger_type: String,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GtmHelper {
    pub generated_date: String,
    pub utm_parameter_mapping: Vec<VariableMapping>,
    pub ga4_configuration_tag: ConfigurationTag,
    pub conversion_event_tags: Vec<EventTag>,
    pub recommended_triggers: Vec<Trigger>,
}

fn field(name: &str, value: &str) -> FieldToSet {
    FieldToSet {
        field_name: name.to_string(),
        value: value.to_string(),
    }
}

/// Build the helper for the given conversion events.
pub fn build_gtm_helper(conversion_events: &[ConversionEventDef]) -> GtmHelper {
    let utm_parameter_mapping = AttributionParam::iter()
        .map(|p| VariableMapping {
            parameter: p.as_ref().to_string(),
            variable_name: p.variable_name().to_string(),
            variable_type: "URL".to_string(),
            component_type: "Query".to_string(),
            query_key: p.as_ref().to_string(),
        })
        .collect();

    let ga4_configuration_tag = ConfigurationTag {
        tag_name: "GA4 - UTM Parameter Mapping".to_string(),
        tag_type: "Google Analytics: GA4 Configuration".to_string(),
        trigger: "All Pages".to_string(),
        fields_to_set: AttributionParam::iter()
            .map(|p| field(p.as_ref(), p.variable_name()))
            .collect(),
    };

    let conversion_event_tags = conversion_events
        .iter()
        .map(|event| EventTag {
            tag_name: format!("GA4 - {}", event.event_name),
            event_name: event.event_name.clone(),
            description: event.description.clone(),
            trigger: PRINT_TRIGGER.to_string(),
            parameters: vec![
                field("campaign_id", AttributionParam::UtmCampaign.variable_name()),
                field("campaign_location", AttributionParam::UtmContent.variable_name()),
                field("campaign_name", AttributionParam::UtmTerm.variable_name()),
            ],
        })
        .collect();

    let recommended_triggers = vec![Trigger {
        trigger_name: PRINT_TRIGGER.to_string(),
        trigger_type: "Page View".to_string(),
        conditions: vec![
            format!(
                "{} equals \"{}\"",
                AttributionParam::UtmSource.variable_name(),
                SOURCE_VALUE
            ),
            format!(
                "AND {} equals \"{}\"",
                AttributionParam::UtmMedium.variable_name(),
                MEDIUM_VALUE
            ),
        ],
    }];

    GtmHelper {
        generated_date: Local::now().to_rfc3339(),
        utm_parameter_mapping,
        ga4_configuration_tag,
        conversion_event_tags,
        recommended_triggers,
    }
}

/// 写出 `gtm_setup_helper.json`
pub fn save_gtm_helper<P: AsRef<Path>>(
    conversion_events: &[ConversionEventDef],
    output_dir: P,
) -> Result<PathBuf> {
    let helper = build_gtm_helper(conversion_events);
    write_json(output_dir.as_ref(), GTM_HELPER_FILE, &helper)
}
