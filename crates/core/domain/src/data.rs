use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// 设备标识：线上可能是整数也可能是字符串，统一按字符串比较。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 从 JSON 值提取设备标识（字符串原样，数字转字符串，其余视为缺失）。
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self(text.clone())),
            Value::Number(number) => Some(Self(number.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 判断 JSON 值是否指向当前设备。
    pub fn matches(&self, value: &Value) -> bool {
        Self::from_value(value).is_some_and(|other| other == *self)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for DeviceId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

/// 稀疏属性表：只包含厂商实际上报的字段。
///
/// 缺失的键表示"本次未上报"，调用方据此保持原状态不变。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap(Map<String, Value>);

impl PropertyMap {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// 对象转属性表，非对象返回 None。
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(|map| Self(map.clone()))
    }

    pub fn try_get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// 字符串字段；非字符串返回 None。
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// 字段存在且非空（空字符串、0、false、null、空集合都视为空）。
    pub fn is_set(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(is_truthy)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// 补全缺失的键，已有值保持不变。返回补入的键数。
    pub fn merge_defaults(&mut self, defaults: &PropertyMap) -> usize {
        let mut inserted = 0;
        for (key, value) in defaults.0.iter() {
            if !self.0.contains_key(key) {
                self.0.insert(key.clone(), value.clone());
                inserted += 1;
            }
        }
        inserted
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|v| v != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// 在线状态字段判定：仅数值 0 表示离线，缺失或其他值均视为在线。
pub fn is_offline_flag(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_f64)
        .is_some_and(|flag| flag == 0.0)
}

/// 实体类型（由型号目录决定，从不由用户设置）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Light,
    Switch,
    /// 厂商线上拼写为 `senser`。
    #[serde(rename = "senser")]
    Sensor,
    Cover,
    Climate,
    Fan,
    WaterHeater,
    MediaPlayer,
    Scene,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Switch => "switch",
            Self::Sensor => "senser",
            Self::Cover => "cover",
            Self::Climate => "climate",
            Self::Fan => "fan",
            Self::WaterHeater => "water_heater",
            Self::MediaPlayer => "media_player",
            Self::Scene => "scene",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 分类后的设备记录（物理设备或多路设备中的单个通道）。
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRecord {
    pub device_id: DeviceId,
    pub device_name: String,
    pub model: String,
    pub entity_type: EntityType,
    pub channel_num: Option<i64>,
    pub channel: Option<i64>,
    pub ability_type: Option<u8>,
    pub properties: PropertyMap,
    pub room_name: String,
    pub software_version: String,
    pub hardware_version: String,
    pub device_online_state: Option<Value>,
    /// 其余原始字段，原样透传。
    pub extra: Map<String, Value>,
}

impl DeviceRecord {
    /// 构造只含必要字段的记录（其余字段为空）。
    pub fn new(device_id: impl Into<DeviceId>, model: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            device_id: device_id.into(),
            device_name: String::new(),
            model: model.into(),
            entity_type,
            channel_num: None,
            channel: None,
            ability_type: None,
            properties: PropertyMap::new(),
            room_name: String::new(),
            software_version: String::new(),
            hardware_version: String::new(),
            device_online_state: None,
            extra: Map::new(),
        }
    }

    /// 通道号：优先 `channelNum`，其次 `channel`。
    pub fn channel_number(&self) -> Option<i64> {
        self.channel_num.or(self.channel)
    }

    pub fn is_online(&self) -> bool {
        !is_offline_flag(self.device_online_state.as_ref())
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifier: self.device_id.clone(),
            name: self.device_name.clone(),
            manufacturer: MANUFACTURER.to_string(),
            suggested_area: self.room_name.clone(),
            model: self.model.clone(),
            sw_version: self.software_version.clone(),
            hw_version: self.hardware_version.clone(),
        }
    }
}

/// 设备信息中的厂商名称。
pub const MANUFACTURER: &str = "UIOT";

/// 实体所属设备的展示信息。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifier: DeviceId,
    pub name: String,
    pub manufacturer: String,
    pub suggested_area: String,
    pub model: String,
    pub sw_version: String,
    pub hw_version: String,
}
