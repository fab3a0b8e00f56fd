//! 状态合并引擎：设备记录 → 实体，入站消息 → 实体状态。
//!
//! 所有操作同步、无 I/O；调用方负责按发布顺序串行投递消息。

pub mod climate;
pub mod message;
pub mod sensor;

pub use climate::{ClimateCommand, ClimateEntity, ClimateState, ClimateTraits, ControlPatch, ModeKey};
pub use message::{
    InboundMessage, MessageError, NetState, OnlineReport, PropertyReport, decode_message,
    parse_message,
};
pub use sensor::{
    SensorDescriptor, SensorDeviceClass, SensorEntity, SensorKind, SensorState, StateClass,
    sensor_entities_for,
};

use domain::{DeviceId, DeviceRecord, EntityType};
use tracing::debug;

/// 由合并引擎维护状态的实体。
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Climate(ClimateEntity),
    Sensor(SensorEntity),
}

impl Entity {
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::Climate(climate) => climate.device_id(),
            Self::Sensor(sensor) => sensor.device_id(),
        }
    }

    pub fn unique_id(&self) -> &str {
        match self {
            Self::Climate(climate) => climate.unique_id(),
            Self::Sensor(sensor) => sensor.unique_id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Climate(climate) => climate.name(),
            Self::Sensor(sensor) => sensor.name(),
        }
    }

    pub fn available(&self) -> bool {
        match self {
            Self::Climate(climate) => climate.state().available,
            Self::Sensor(sensor) => sensor.available(),
        }
    }

    pub fn apply(&mut self, message: &InboundMessage) -> bool {
        match self {
            Self::Climate(climate) => climate.apply(message),
            Self::Sensor(sensor) => sensor.apply(message),
        }
    }
}

/// 一条设备记录对应的实体。空调要求通道号非零（父节点不建实体）；
/// 其余非空调、非传感器类型不在本引擎范围内。
pub fn entities_for(record: &DeviceRecord) -> Vec<Entity> {
    match record.entity_type {
        EntityType::Climate => {
            if record.channel_number().unwrap_or(0) == 0 {
                debug!(
                    target: "uiot.entity",
                    device_id = %record.device_id,
                    "climate skipped: parent device"
                );
                return Vec::new();
            }
            vec![Entity::Climate(ClimateEntity::from_record(record))]
        }
        EntityType::Sensor => sensor_entities_for(record)
            .into_iter()
            .map(Entity::Sensor)
            .collect(),
        _ => Vec::new(),
    }
}
