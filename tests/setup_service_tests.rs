//! 配置同步服务集成测试
//!
//! 使用内存中的 AdminApi 实现，验证幂等性与失败隔离。

use std::cell::RefCell;
use std::collections::HashSet;

use printlinker::config::default_conversion_events;
use printlinker::errors::{PrintlinkerError, Result};
use printlinker::platform::admin::{DataStream, WEB_DATA_STREAM, WebStreamData};
use printlinker::platform::{
    AdminApi, ConversionEvent, CustomDimension, DataRetentionSettings,
    EnhancedMeasurementSettings,
};
use printlinker::services::setup_service::MAX_CUSTOM_DIMENSIONS;
use printlinker::services::{CANONICAL_DIMENSIONS, SetupService, SyncOutcome};
use tempfile::TempDir;

#[derive(Default)]
struct FakeAdmin {
    dimensions: RefCell<Vec<CustomDimension>>,
    events: RefCell<Vec<ConversionEvent>>,
    streams: Vec<DataStream>,
    enhanced_updates: RefCell<Vec<(String, EnhancedMeasurementSettings)>>,
    retention: RefCell<DataRetentionSettings>,
    dimension_creates: RefCell<usize>,
    /// 创建时返回权限错误的参数名
    deny: HashSet<String>,
}

impl FakeAdmin {
    fn with_web_stream() -> Self {
        Self {
            streams: vec![
                DataStream {
                    name: "properties/1/dataStreams/10".to_string(),
                    stream_type: WEB_DATA_STREAM.to_string(),
                    display_name: "Website".to_string(),
                    web_stream_data: Some(WebStreamData {
                        measurement_id: "G-TEST".to_string(),
                        ..Default::default()
                    }),
                },
                DataStream {
                    name: "properties/1/dataStreams/11".to_string(),
                    stream_type: "IOS_APP_DATA_STREAM".to_string(),
                    display_name: "iOS".to_string(),
                    web_stream_data: None,
                },
            ],
            ..Default::default()
        }
    }
}

impl AdminApi for FakeAdmin {
    fn list_custom_dimensions(&self, property: &str) -> Result<Vec<CustomDimension>> {
        assert_eq!(property, "properties/1");
        Ok(self.dimensions.borrow().clone())
    }

    fn create_custom_dimension(
        &self,
        _property: &str,
        dimension: &CustomDimension,
    ) -> Result<CustomDimension> {
        if self.deny.contains(&dimension.parameter_name) {
            return Err(PrintlinkerError::permission_denied(
                "HTTP 403: The caller does not have permission",
            ));
        }
        *self.dimension_creates.borrow_mut() += 1;
        self.dimensions.borrow_mut().push(dimension.clone());
        Ok(dimension.clone())
    }

    fn list_conversion_events(&self, _property: &str) -> Result<Vec<ConversionEvent>> {
        Ok(self.events.borrow().clone())
    }

    fn create_conversion_event(&self, _property: &str, event_name: &str) -> Result<ConversionEvent> {
        let event = ConversionEvent {
            event_name: event_name.to_string(),
            ..Default::default()
        };
        self.events.borrow_mut().push(event.clone());
        Ok(event)
    }

    fn list_data_streams(&self, _property: &str) -> Result<Vec<DataStream>> {
        Ok(self.streams.clone())
    }

    fn get_enhanced_measurement(&self, stream: &str) -> Result<EnhancedMeasurementSettings> {
        Ok(EnhancedMeasurementSettings {
            name: format!("{}/enhancedMeasurementSettings", stream),
            stream_enabled: true,
            ..Default::default()
        })
    }

    fn update_enhanced_measurement(
        &self,
        stream: &str,
        settings: &EnhancedMeasurementSettings,
    ) -> Result<EnhancedMeasurementSettings> {
        self.enhanced_updates
            .borrow_mut()
            .push((stream.to_string(), settings.clone()));
        Ok(settings.clone())
    }

    fn get_data_retention(&self, _property: &str) -> Result<DataRetentionSettings> {
        Ok(self.retention.borrow().clone())
    }

    fn update_data_retention(
        &self,
        _property: &str,
        settings: &DataRetentionSettings,
    ) -> Result<DataRetentionSettings> {
        *self.retention.borrow_mut() = settings.clone();
        Ok(settings.clone())
    }
}

fn service(api: FakeAdmin) -> SetupService<FakeAdmin> {
    SetupService::new(api, "1", "reporter@demo.iam.gserviceaccount.com")
}

#[test]
fn test_ensure_dimension_is_idempotent() {
    let api = FakeAdmin::default();
    let svc = SetupService::new(&api, "1", "sa@example.com");
    let def = &CANONICAL_DIMENSIONS[0];

    assert_eq!(svc.ensure_custom_dimension(def), SyncOutcome::Created);
    assert_eq!(svc.ensure_custom_dimension(def), SyncOutcome::AlreadyExists);
    assert_eq!(svc.ensure_custom_dimension(def), SyncOutcome::AlreadyExists);
    assert_eq!(*api.dimension_creates.borrow(), 1);

    let report = svc.build_setup_report();
    assert_eq!(report.custom_dimensions.len(), 1);
    assert_eq!(report.custom_dimensions[0].parameter_name, "campaign_id");
    assert_eq!(report.custom_dimensions[0].scope, "EVENT");
}

#[test]
fn test_dimension_limit_is_checked_before_create() {
    let api = FakeAdmin::default();
    {
        let mut dims = api.dimensions.borrow_mut();
        for i in 0..MAX_CUSTOM_DIMENSIONS {
            dims.push(CustomDimension {
                parameter_name: format!("existing_{}", i),
                ..Default::default()
            });
        }
    }
    let svc = service(api);

    match svc.ensure_custom_dimension(&CANONICAL_DIMENSIONS[1]) {
        SyncOutcome::Failed(PrintlinkerError::QuotaExceeded(msg)) => assert!(msg.contains("50")),
        other => panic!("expected quota failure, got {:?}", other),
    }
}

#[test]
fn test_permission_failure_does_not_block_siblings() {
    let mut api = FakeAdmin::with_web_stream();
    api.deny.insert("campaign_name".to_string());
    let svc = service(api);

    let summary = svc.setup_all(&default_conversion_events());

    assert_eq!(summary.dimensions.len(), CANONICAL_DIMENSIONS.len());
    let failed: Vec<&str> = summary
        .dimensions
        .iter()
        .filter(|(_, o)| o.is_failed())
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(failed, vec!["campaign_name"]);
    assert_eq!(summary.failure_count(), 1);

    // 其余步骤照常执行
    assert_eq!(summary.data_retention, Some(SyncOutcome::Updated));
    assert_eq!(summary.conversion_events.len(), 2);
    assert!(
        summary
            .conversion_events
            .iter()
            .all(|(_, o)| *o == SyncOutcome::Created)
    );
}

#[test]
fn test_setup_all_twice_creates_nothing_new() {
    let svc = service(FakeAdmin::with_web_stream());

    let first = svc.setup_all(&default_conversion_events());
    assert_eq!(first.created_count(), CANONICAL_DIMENSIONS.len() + 2);

    let second = svc.setup_all(&default_conversion_events());
    assert_eq!(second.created_count(), 0);
    assert!(
        second
            .dimensions
            .iter()
            .all(|(_, o)| *o == SyncOutcome::AlreadyExists)
    );
}

#[test]
fn test_enhanced_measurement_only_touches_web_streams() {
    let api = FakeAdmin::with_web_stream();
    let svc = service(api);

    let outcomes = svc.enable_enhanced_measurement();
    assert_eq!(outcomes, vec![("Website".to_string(), SyncOutcome::Updated)]);
}

#[test]
fn test_enhanced_measurement_sets_all_flags() {
    let api = FakeAdmin::with_web_stream();
    let svc = SetupService::new(&api, "1", "sa@example.com");
    svc.enable_enhanced_measurement();

    let updates = api.enhanced_updates.borrow();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "properties/1/dataStreams/10");
    assert!(updates[0].1.all_enabled());
}

#[test]
fn test_data_retention_values() {
    let api = FakeAdmin::default();
    let svc = SetupService::new(&api, "1", "sa@example.com");

    assert_eq!(svc.set_data_retention(14, true), SyncOutcome::Updated);
    let retention = api.retention.borrow();
    assert_eq!(retention.event_data_retention, "FOURTEEN_MONTHS");
    assert!(retention.reset_user_data_on_new_activity);
}

#[test]
fn test_save_setup_report() {
    let svc = service(FakeAdmin::with_web_stream());
    svc.setup_all(&default_conversion_events());

    let dir = TempDir::new().unwrap();
    let path = svc.save_setup_report(dir.path().join("reports")).unwrap();
    assert!(path.ends_with("ga4_setup_report.json"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["property_id"], "1");
    assert_eq!(
        json["custom_dimensions"].as_array().unwrap().len(),
        CANONICAL_DIMENSIONS.len()
    );
    assert_eq!(json["data_streams"][0]["type"], "WEB_DATA_STREAM");
    assert_eq!(
        json["data_streams"][0]["web_stream_data"]["measurement_id"],
        "G-TEST"
    );
    assert_eq!(json["conversion_events"][0]["event_name"], "qr_code_scan");
}
