//! 设备列表分类：按型号目录过滤、定型、拆分多路能力并补全默认属性。

use domain::{DeviceId, DeviceRecord, EntityType, PropertyMap, is_offline_flag};
use serde_json::{Map, Value};
use tracing::{debug, info};
use uiot_catalog::ModelSpec;
use uiot_telemetry::record_classification;

/// 分类错误。
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("invalid device list json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid scene list: {0}")]
    SceneList(String),
}

/// 解析原始设备列表 JSON（`{"deviceList": [...]}`）并分类。
pub fn classify(raw: &str) -> Result<Vec<DeviceRecord>, ClassifyError> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(classify_value(&value))
}

/// 对已解码的设备列表分类。缺失 `deviceList` 时返回空列表。
pub fn classify_value(payload: &Value) -> Vec<DeviceRecord> {
    let entries = payload
        .get("deviceList")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut devices = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(entry) = entry.as_object() else {
            debug!(target: "uiot.classify", "device entry skipped: not an object");
            continue;
        };
        if let Some(record) = classify_entry(entry) {
            devices.push(record);
        }
    }

    let dropped = entries.len().saturating_sub(devices.len());
    record_classification(devices.len() as u64, dropped as u64);
    info!(
        target: "uiot.classify",
        total = entries.len(),
        kept = devices.len(),
        dropped = dropped,
        "device_list_classified"
    );
    devices
}

fn classify_entry(entry: &Map<String, Value>) -> Option<DeviceRecord> {
    let model = entry.get("model").and_then(Value::as_str).unwrap_or("");
    let Some(spec) = uiot_catalog::lookup(model) else {
        debug!(target: "uiot.classify", model = %model, "device skipped: unknown model");
        return None;
    };

    let mut ability_type = None;
    if let Some(ability) = spec.ability {
        if is_parent_channel(entry) {
            debug!(
                target: "uiot.classify",
                model = %model,
                device_id = ?entry.get("deviceId"),
                "device skipped: parent channel"
            );
            return None;
        }
        ability_type = Some(ability);
    }

    let mut properties = entry
        .get("properties")
        .and_then(PropertyMap::from_value)
        .unwrap_or_default();
    if spec.has_defaults() {
        apply_defaults(&mut properties, spec);
    }

    Some(build_record(entry, spec, ability_type, properties))
}

/// 声明了通道号且为 0 的条目是父节点/网关，不对应可控通道。
fn is_parent_channel(entry: &Map<String, Value>) -> bool {
    ["channel", "channelNum"]
        .iter()
        .any(|key| entry.contains_key(*key) && is_offline_flag(entry.get(*key)))
}

fn apply_defaults(properties: &mut PropertyMap, spec: &ModelSpec) {
    properties.merge_defaults(&spec.default_properties());
    if properties.contains("humanActiveState")
        && properties.get_str("humanDetectedState") == Some("noPerson")
    {
        properties.insert("humanActiveState", "noFeatures");
    }
}

const KNOWN_FIELDS: [&str; 10] = [
    "deviceId",
    "deviceName",
    "model",
    "channelNum",
    "channel",
    "properties",
    "roomName",
    "softwareVersion",
    "hardwareVersion",
    "deviceOnlineState",
];

fn build_record(
    entry: &Map<String, Value>,
    spec: &ModelSpec,
    ability_type: Option<u8>,
    properties: PropertyMap,
) -> DeviceRecord {
    let text = |key: &str| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let extra = entry
        .iter()
        .filter(|(key, _)| !KNOWN_FIELDS.contains(&key.as_str()) && key.as_str() != "type")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    DeviceRecord {
        device_id: entry
            .get("deviceId")
            .and_then(DeviceId::from_value)
            .unwrap_or_else(|| DeviceId::new("")),
        device_name: text("deviceName"),
        model: spec.model.to_string(),
        entity_type: spec.entity_type,
        channel_num: entry.get("channelNum").and_then(Value::as_i64),
        channel: entry.get("channel").and_then(Value::as_i64),
        ability_type,
        properties,
        room_name: text("roomName"),
        software_version: text("softwareVersion"),
        hardware_version: text("hardwareVersion"),
        device_online_state: entry.get("deviceOnlineState").cloned(),
        extra,
    }
}

/// 合并场景列表：消息的 `data` 字段是内嵌 JSON 字符串，含 `smartList`。
/// 每个场景追加为 `scene` 类型记录。
pub fn append_scenes(
    message: &Value,
    mut devices: Vec<DeviceRecord>,
) -> Result<Vec<DeviceRecord>, ClassifyError> {
    let data = match message.get("data") {
        Some(Value::String(text)) => serde_json::from_str::<Value>(text)?,
        Some(other) => other.clone(),
        None => return Err(ClassifyError::SceneList("missing data".to_string())),
    };
    let scenes = data
        .get("smartList")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for scene in scenes.iter().filter_map(Value::as_object) {
        let device_id = ["smartId", "deviceId"]
            .iter()
            .find_map(|key| scene.get(*key).and_then(DeviceId::from_value))
            .unwrap_or_else(|| DeviceId::new(""));
        let mut record = DeviceRecord::new(device_id, "", EntityType::Scene);
        record.device_name = scene
            .get("smartName")
            .or_else(|| scene.get("deviceName"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        record.extra = scene.clone();
        devices.push(record);
    }
    debug!(target: "uiot.classify", scenes = scenes.len(), "scene_list_appended");
    Ok(devices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parent_channel_requires_declared_zero() {
        let entry = json!({"channel": 0});
        assert!(is_parent_channel(entry.as_object().expect("object")));
        let entry = json!({"channelNum": 0, "channel": 2});
        assert!(is_parent_channel(entry.as_object().expect("object")));
        let entry = json!({"channelNum": 1});
        assert!(!is_parent_channel(entry.as_object().expect("object")));
        let entry = json!({});
        assert!(!is_parent_channel(entry.as_object().expect("object")));
    }

    #[test]
    fn unknown_fields_are_carried_through() {
        let payload = json!({"deviceList": [{
            "deviceId": 7,
            "model": "l_dimmer_switch",
            "deviceName": "Lamp",
            "gatewayId": "gw-1"
        }]});
        let devices = classify_value(&payload);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].device_name, "Lamp");
        assert_eq!(devices[0].extra.get("gatewayId"), Some(&json!("gw-1")));
        assert!(!devices[0].extra.contains_key("model"));
    }
}
