use async_trait::async_trait;
use domain::{DeviceId, DeviceRecord, EntityType, HvacMode, PropertyMap};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use uiot_control::{ControlClient, ControlError, ControlService, NoopControlClient};
use uiot_entity::{ClimateCommand, ClimateEntity};

/// 记录每次下发；`fail_at` 指定第几次调用（从 0 开始）返回失败。
#[derive(Default)]
struct RecordingClient {
    sent: Mutex<Vec<(DeviceId, PropertyMap)>>,
    fail_at: Option<usize>,
}

#[async_trait]
impl ControlClient for RecordingClient {
    async fn send_control(
        &self,
        device_id: &DeviceId,
        properties: &PropertyMap,
    ) -> Result<(), ControlError> {
        let mut sent = self.sent.lock().await;
        if self.fail_at == Some(sent.len()) {
            return Err(ControlError::Dispatch("forced failure".to_string()));
        }
        sent.push((device_id.clone(), properties.clone()));
        Ok(())
    }
}

fn climate(power: &str) -> ClimateEntity {
    let mut record = DeviceRecord::new("11", "hvac_ac_e3", EntityType::Climate);
    record.channel_num = Some(1);
    record.properties = PropertyMap::from_value(&json!({
        "thermostatMode": "cool",
        "powerSwitch": power,
        "targetTemperature": "26"
    }))
    .expect("object");
    ClimateEntity::from_record(&record)
}

#[tokio::test]
async fn set_mode_while_off_turns_on_first() {
    let client = Arc::new(RecordingClient::default());
    let service = ControlService::new(client.clone());
    let mut entity = climate("off");

    let changed = service
        .execute_climate(&mut entity, ClimateCommand::SetHvacMode(HvacMode::Heat))
        .await
        .expect("sent");
    assert!(changed);
    assert_eq!(entity.state().hvac_mode, HvacMode::Heat);

    let sent = client.sent.lock().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, DeviceId::new("11"));
    assert_eq!(sent[0].1.get_str("powerSwitch"), Some("on"));
    assert_eq!(sent[1].1.get_str("thermostatMode"), Some("heat"));
}

#[tokio::test]
async fn failure_stops_sequence_and_keeps_state() {
    let client = Arc::new(RecordingClient {
        fail_at: Some(1),
        ..RecordingClient::default()
    });
    let service = ControlService::new(client.clone());
    let mut entity = climate("off");
    let before = entity.clone();

    let err = service
        .execute_climate(&mut entity, ClimateCommand::SetHvacMode(HvacMode::Heat))
        .await
        .expect_err("second patch fails");
    assert!(matches!(err, ControlError::Dispatch(_)));
    assert_eq!(client.sent.lock().await.len(), 1);
    assert_eq!(entity, before);
}

#[tokio::test]
async fn set_temperature_sends_rounded_string() {
    let client = Arc::new(RecordingClient::default());
    let service = ControlService::new(client.clone());
    let mut entity = climate("on");

    let changed = service
        .execute_climate(&mut entity, ClimateCommand::SetTemperature(23.8))
        .await
        .expect("sent");
    assert!(!changed);
    let sent = client.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1.get_str("targetTemperature"), Some("24"));
}

#[tokio::test]
async fn turn_off_updates_state_with_noop_client() {
    let service = ControlService::new(Arc::new(NoopControlClient));
    let mut entity = climate("on");
    let changed = service
        .execute_climate(&mut entity, ClimateCommand::TurnOff)
        .await
        .expect("sent");
    assert!(changed);
    assert_eq!(entity.state().hvac_mode, HvacMode::Off);
}
