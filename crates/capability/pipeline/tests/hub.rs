use async_trait::async_trait;
use domain::{DeviceId, HvacMode, PropertyMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use uiot_control::{ControlClient, ControlError, ControlService};
use uiot_entity::{ClimateCommand, Entity};
use uiot_pipeline::{EntityHub, EntitySink, NoopSink, PipelineError};

#[derive(Default)]
struct RecordingSink {
    added: Mutex<Vec<String>>,
    changed: Mutex<Vec<String>>,
}

#[async_trait]
impl EntitySink for RecordingSink {
    async fn entity_added(&self, entity: &Entity) {
        self.added.lock().await.push(entity.unique_id().to_string());
    }

    async fn state_changed(&self, entity: &Entity) {
        self.changed.lock().await.push(entity.unique_id().to_string());
    }
}

const DEVICE_LIST: &str = r#"{"deviceList":[
    {"deviceId":1,"deviceName":"客厅空调","model":"hvac_ac_e3","channelNum":1,
     "properties":{"thermostatMode":"heat","powerSwitch":"on","targetTemperature":"22"}},
    {"deviceId":2,"deviceName":"网关","model":"hvac_ac_e3","channelNum":0},
    {"deviceId":3,"deviceName":"温湿度","model":"env_temp_hum_sensor","properties":{}},
    {"deviceId":4,"deviceName":"未知","model":"no_such_model"}
]}"#;

async fn seeded_hub(sink: Arc<dyn EntitySink>) -> EntityHub {
    let hub = EntityHub::new(sink);
    let records = uiot_classify::classify(DEVICE_LIST).expect("classified");
    hub.on_snapshot(&records).await;
    hub
}

#[tokio::test]
async fn snapshot_creates_entities_once() {
    let sink = Arc::new(RecordingSink::default());
    let hub = seeded_hub(sink.clone()).await;
    assert_eq!(hub.len().await, 4);
    assert_eq!(
        sink.added.lock().await.as_slice(),
        &["1", "battery_level_3", "temperature_3", "humidity_3"]
    );

    let records = uiot_classify::classify(DEVICE_LIST).expect("classified");
    assert_eq!(hub.on_snapshot(&records).await, 0);
    assert_eq!(hub.len().await, 4);
}

#[tokio::test]
async fn state_change_notifies_only_changed_entities() {
    let sink = Arc::new(RecordingSink::default());
    let hub = seeded_hub(sink.clone()).await;

    let payload = br#"{"data":{"deviceId":3,"properties":{"temperature":"25.5"}}}"#;
    let changed = hub.on_message("uiot/state_report", payload).await.expect("applied");
    assert_eq!(changed, vec!["temperature_3".to_string()]);

    let again = hub.on_message("uiot/state_report", payload).await.expect("applied");
    assert!(again.is_empty());
    assert_eq!(sink.changed.lock().await.len(), 1);
}

#[tokio::test]
async fn online_report_marks_device_unavailable() {
    let hub = seeded_hub(Arc::new(NoopSink)).await;
    let payload = br#"{"data":{"deviceList":[{"deviceId":1,"netState":0}]}}"#;
    let changed = hub.on_message("uiot/online_report", payload).await.expect("applied");
    assert_eq!(changed, vec!["1".to_string()]);
    let Some(Entity::Climate(climate)) = hub.entity("1").await else {
        panic!("climate entity expected");
    };
    assert!(!climate.state().available);
    assert_eq!(climate.state().hvac_mode, HvacMode::Heat);
}

#[tokio::test]
async fn network_report_adds_new_devices() {
    let sink = Arc::new(RecordingSink::default());
    let hub = seeded_hub(sink.clone()).await;
    let payload = r#"{"data":{"deviceList":[
        {"deviceId":5,"deviceName":"门磁","model":"ss_smart_door_sensor","properties":{"contactState":"close"}}
    ]}}"#.as_bytes();
    hub.on_message("uiot/network_report", payload).await.expect("applied");
    assert!(hub.entity("contact_5").await.is_some());
}

#[tokio::test]
async fn malformed_payload_is_rejected_without_changes() {
    let hub = seeded_hub(Arc::new(NoopSink)).await;
    let before = hub.entities().await;
    let err = hub
        .on_message("uiot/state_report", b"{broken")
        .await
        .expect_err("invalid json");
    assert!(matches!(err, PipelineError::Message(_)));
    assert_eq!(hub.entities().await, before);
}

#[tokio::test]
async fn update_mutates_entity_in_place() {
    let sink = Arc::new(RecordingSink::default());
    let hub = seeded_hub(sink.clone()).await;
    let changed = hub
        .update("1", |entity| match entity {
            Entity::Climate(climate) => climate.apply_optimistic(ClimateCommand::TurnOff),
            Entity::Sensor(_) => false,
        })
        .await;
    assert_eq!(changed, Some(true));
    assert_eq!(sink.changed.lock().await.as_slice(), &["1"]);

    assert_eq!(hub.update("1", |_| ()).await, Some(()));
    assert_eq!(sink.changed.lock().await.len(), 1);
    assert!(hub.update("missing", |_| ()).await.is_none());
}

/// 记录下发的属性补丁；`fail` 为真时全部拒绝。
#[derive(Default)]
struct RecordingClient {
    sent: Mutex<Vec<PropertyMap>>,
    fail: bool,
}

#[async_trait]
impl ControlClient for RecordingClient {
    async fn send_control(
        &self,
        _device_id: &DeviceId,
        properties: &PropertyMap,
    ) -> Result<(), ControlError> {
        if self.fail {
            return Err(ControlError::Dispatch("offline".to_string()));
        }
        self.sent.lock().await.push(properties.clone());
        Ok(())
    }
}

#[tokio::test]
async fn climate_command_updates_hub_and_notifies() {
    let sink = Arc::new(RecordingSink::default());
    let hub = seeded_hub(sink.clone()).await;
    let client = Arc::new(RecordingClient::default());
    let control = ControlService::new(client.clone());

    let changed = hub
        .execute_climate(&control, "1", ClimateCommand::SetHvacMode(HvacMode::Cool))
        .await
        .expect("sent");
    assert!(changed);
    assert_eq!(client.sent.lock().await.len(), 1);
    assert_eq!(sink.changed.lock().await.as_slice(), &["1"]);
    let Some(Entity::Climate(climate)) = hub.entity("1").await else {
        panic!("climate entity expected");
    };
    assert_eq!(climate.state().hvac_mode, HvacMode::Cool);

    let changed = hub
        .execute_climate(&control, "1", ClimateCommand::SetTemperature(24.0))
        .await
        .expect("sent");
    assert!(!changed);
    assert_eq!(sink.changed.lock().await.len(), 1);
}

#[tokio::test]
async fn failed_climate_command_leaves_state_untouched() {
    let sink = Arc::new(RecordingSink::default());
    let hub = seeded_hub(sink.clone()).await;
    let control = ControlService::new(Arc::new(RecordingClient {
        fail: true,
        ..RecordingClient::default()
    }));
    let before = hub.entities().await;

    let err = hub
        .execute_climate(&control, "1", ClimateCommand::TurnOff)
        .await
        .expect_err("rejected");
    assert!(matches!(err, PipelineError::Control(_)));
    assert_eq!(hub.entities().await, before);
    assert!(sink.changed.lock().await.is_empty());

    let err = hub
        .execute_climate(&control, "temperature_3", ClimateCommand::TurnOff)
        .await
        .expect_err("not a climate");
    assert!(matches!(err, PipelineError::ClimateNotFound(id) if id == "temperature_3"));
}
