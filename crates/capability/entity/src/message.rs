//! 入站上报消息模型。
//!
//! 两条逻辑通道的消息形状互不相交：在线上报（online_report）携带
//! `deviceId`/`netState` 列表；状态上报携带单个设备的稀疏属性增量。
//! 网络上报（network_report）携带完整设备列表，用于刷新快照。

use domain::{DeviceId, PropertyMap, is_offline_flag};
use serde_json::Value;

/// 在线上报主题标识。
pub const ONLINE_REPORT_TOPIC: &str = "online_report";
/// 网络上报（设备列表刷新）主题标识。
pub const NETWORK_REPORT_TOPIC: &str = "network_report";

/// 消息解析错误（仅结构性错误）。
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("invalid message json: {0}")]
    Json(#[from] serde_json::Error),
}

/// 在线上报中的单条设备状态。
#[derive(Debug, Clone, PartialEq)]
pub struct NetState {
    pub device_id: DeviceId,
    pub net_state: Option<Value>,
}

impl NetState {
    /// `netState == 0` 为离线，其余（含缺失）为在线。
    pub fn is_online(&self) -> bool {
        !is_offline_flag(self.net_state.as_ref())
    }
}

/// 在线/离线上报。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OnlineReport {
    pub entries: Vec<NetState>,
}

impl OnlineReport {
    /// 依次查找目标设备的在线状态；同一设备出现多次时以最后一条为准。
    pub fn online_state_of(&self, device_id: &DeviceId) -> Option<bool> {
        self.entries
            .iter()
            .filter(|entry| entry.device_id == *device_id)
            .map(NetState::is_online)
            .last()
    }
}

/// 属性增量上报。
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyReport {
    pub device_id: DeviceId,
    pub device_online_state: Option<Value>,
    pub properties: PropertyMap,
}

/// 已解码的入站消息。
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    OnlineReport(OnlineReport),
    PropertyReport(PropertyReport),
    /// 完整设备列表载荷（`{"deviceList": [...]}`），交给分类器处理。
    Snapshot(Value),
    /// 形状不符，按无操作处理。
    Ignored,
}

/// 按主题与载荷解析入站消息。JSON 非法时返回错误，其余形状差异均为 `Ignored`。
pub fn parse_message(topic: &str, payload: &[u8]) -> Result<InboundMessage, MessageError> {
    let value: Value = serde_json::from_slice(payload)?;
    Ok(decode_message(topic, &value))
}

/// 对已解码的 JSON 按主题分派。
pub fn decode_message(topic: &str, value: &Value) -> InboundMessage {
    if topic.contains(ONLINE_REPORT_TOPIC) {
        return decode_online_report(value);
    }
    if topic.contains(NETWORK_REPORT_TOPIC) {
        return decode_snapshot(value);
    }
    decode_property_report(value)
}

fn decode_online_report(value: &Value) -> InboundMessage {
    let Some(list) = value
        .get("data")
        .and_then(|data| data.get("deviceList"))
        .and_then(Value::as_array)
    else {
        return InboundMessage::Ignored;
    };
    let entries = list
        .iter()
        .filter_map(|entry| {
            let device_id = entry.get("deviceId").and_then(DeviceId::from_value)?;
            Some(NetState {
                device_id,
                net_state: entry.get("netState").cloned(),
            })
        })
        .collect();
    InboundMessage::OnlineReport(OnlineReport { entries })
}

fn decode_snapshot(value: &Value) -> InboundMessage {
    let data = match value.get("data") {
        Some(Value::String(text)) => serde_json::from_str::<Value>(text).ok(),
        Some(other) => Some(other.clone()),
        None => None,
    };
    if let Some(data) = data.filter(|data| data.get("deviceList").is_some()) {
        return InboundMessage::Snapshot(data);
    }
    if value.get("deviceList").is_some() {
        return InboundMessage::Snapshot(value.clone());
    }
    InboundMessage::Ignored
}

fn decode_property_report(value: &Value) -> InboundMessage {
    let Some(data) = value.get("data") else {
        return InboundMessage::Ignored;
    };
    let Some(device_id) = data.get("deviceId").and_then(DeviceId::from_value) else {
        return InboundMessage::Ignored;
    };
    let properties = data
        .get("properties")
        .and_then(PropertyMap::from_value)
        .unwrap_or_default();
    if properties.is_empty() {
        return InboundMessage::Ignored;
    }
    InboundMessage::PropertyReport(PropertyReport {
        device_id,
        device_online_state: data.get("deviceOnlineState").cloned(),
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn online_report_parses_entries() {
        let message = parse_message(
            "uiot/online_report/1",
            br#"{"data":{"deviceList":[{"deviceId":1,"netState":0},{"deviceId":"2","netState":1}]}}"#,
        )
        .expect("parsed");
        let InboundMessage::OnlineReport(report) = message else {
            panic!("expected online report");
        };
        assert_eq!(report.online_state_of(&DeviceId::from(1_i64)), Some(false));
        assert_eq!(report.online_state_of(&DeviceId::from(2_i64)), Some(true));
        assert_eq!(report.online_state_of(&DeviceId::from(3_i64)), None);
    }

    #[test]
    fn online_report_without_list_is_ignored() {
        let message = decode_message("x/online_report", &json!({"data": {}}));
        assert_eq!(message, InboundMessage::Ignored);
    }

    #[test]
    fn property_report_requires_id_and_properties() {
        let report = decode_message(
            "x/state_report",
            &json!({"data": {"deviceId": 5, "properties": {"powerSwitch": "on"}}}),
        );
        assert!(matches!(report, InboundMessage::PropertyReport(_)));

        let empty = decode_message(
            "x/state_report",
            &json!({"data": {"deviceId": 5, "properties": {}}}),
        );
        assert_eq!(empty, InboundMessage::Ignored);

        let anonymous = decode_message("x/state_report", &json!({"data": {"properties": {"a": 1}}}));
        assert_eq!(anonymous, InboundMessage::Ignored);
    }

    #[test]
    fn network_report_accepts_nested_or_top_level_list() {
        let nested = decode_message("x/network_report", &json!({"data": {"deviceList": []}}));
        assert_eq!(nested, InboundMessage::Snapshot(json!({"deviceList": []})));

        let top = decode_message("x/network_report", &json!({"deviceList": []}));
        assert_eq!(top, InboundMessage::Snapshot(json!({"deviceList": []})));

        let encoded = decode_message(
            "x/network_report",
            &json!({"data": "{\"deviceList\":[{\"deviceId\":1}]}"}),
        );
        assert!(matches!(encoded, InboundMessage::Snapshot(_)));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_message("x/state_report", b"{not json").is_err());
    }
}
