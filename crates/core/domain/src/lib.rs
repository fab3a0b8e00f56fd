//! UIOT 桥接共享领域模型。

pub mod climate;
pub mod data;

pub use climate::{FanMode, HvacMode, UnknownMode};
pub use data::{
    DeviceId, DeviceInfo, DeviceRecord, EntityType, MANUFACTURER, PropertyMap, is_offline_flag,
};
