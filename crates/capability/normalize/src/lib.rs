//! 厂商属性值 → 领域值的标准化函数。
//!
//! 所有函数都是全函数：固件可能上报已知集合之外的值，遇到未知输入时
//! 返回文档约定的兜底值，从不失败。

use domain::{FanMode, HvacMode, PropertyMap};
use serde_json::Value;

/// 传感器标签值。
pub mod label {
    pub const PRESENT: &str = "present";
    pub const ABSENT: &str = "absent";
    pub const STILL: &str = "still";
    pub const NO_SIGNATURE: &str = "no-signature";
    pub const ACTIVE: &str = "active";
    pub const CLOSED: &str = "closed";
    pub const OPEN: &str = "open";
    pub const NORMAL: &str = "normal";
    pub const ALARM: &str = "alarm";
    pub const AWAY: &str = "away";
    pub const INTRUSION: &str = "intrusion";
    pub const SENSOR: &str = "sensor";
    pub const SECURITY: &str = "security";
}

/// thermostatMode / workMode → HvacMode，未知值兜底为 Auto。
pub fn thermostat_mode(vendor: &str) -> HvacMode {
    match vendor {
        "cool" => HvacMode::Cool,
        "heat" => HvacMode::Heat,
        "fan" => HvacMode::FanOnly,
        "dehumidification" => HvacMode::Dry,
        _ => HvacMode::Auto,
    }
}

/// windSpeed → FanMode，未知值兜底为 Auto。
pub fn fan_speed(vendor: &str) -> FanMode {
    match vendor {
        "low" => FanMode::Low,
        "mid" => FanMode::Medium,
        "high" => FanMode::High,
        "off" => FanMode::Off,
        _ => FanMode::Auto,
    }
}

/// HvacMode → 厂商模式值。`Off` 不是厂商模式，由 powerSwitch 表达，兜底为 auto。
pub fn hvac_to_vendor(mode: HvacMode) -> &'static str {
    match mode {
        HvacMode::Cool => "cool",
        HvacMode::Heat => "heat",
        HvacMode::FanOnly => "fan",
        HvacMode::Dry => "dehumidification",
        HvacMode::Auto | HvacMode::Off => "auto",
    }
}

/// FanMode → 厂商 windSpeed 值。
pub fn fan_to_vendor(mode: FanMode) -> &'static str {
    match mode {
        FanMode::Low => "low",
        FanMode::Medium => "mid",
        FanMode::High => "high",
        FanMode::Auto => "auto",
        FanMode::Off => "off",
    }
}

/// 有人/无人（humanDetectedState 与 someonePass 共用）。
pub fn presence(vendor: &str) -> &'static str {
    match vendor {
        "havePerson" | "someone" => label::PRESENT,
        _ => label::ABSENT,
    }
}

/// 体动特征。
pub fn human_activity(vendor: &str) -> &'static str {
    match vendor {
        "inactivity" => label::STILL,
        "active" => label::ACTIVE,
        _ => label::NO_SIGNATURE,
    }
}

/// 门磁开合。
pub fn contact(vendor: &str) -> &'static str {
    match vendor {
        "close" => label::CLOSED,
        _ => label::OPEN,
    }
}

/// 报警状态（alarmState / securityAlarm）。
pub fn alarm(vendor: &str) -> &'static str {
    match vendor {
        "normal" => label::NORMAL,
        _ => label::ALARM,
    }
}

/// 幕帘报警状态。
pub fn curtain_alarm(vendor: &str) -> &'static str {
    match vendor {
        "out" => label::AWAY,
        "intrude" => label::INTRUSION,
        _ => label::NORMAL,
    }
}

/// 传感器工作模式。
pub fn work_mode(vendor: &str) -> &'static str {
    match vendor {
        "sensor" => label::SENSOR,
        _ => label::SECURITY,
    }
}

/// 布防状态下的入侵判定：依次检查 someonePass、curtainAlarmState、
/// humanDetectedState，取第一个出现的字段。都不存在时返回 None。
pub fn intrusion_detected(properties: &PropertyMap) -> Option<bool> {
    const RULES: [(&str, &str); 3] = [
        ("someonePass", "someone"),
        ("curtainAlarmState", "intrude"),
        ("humanDetectedState", "havePerson"),
    ];
    RULES.iter().find_map(|(key, active)| {
        properties
            .try_get(key)
            .map(|value| value.as_str() == Some(*active))
    })
}

/// 原始读数转文本：字符串原样，数字/布尔打印，null 为空串。
pub fn property_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// 温度解析：数字或数字字符串，空串与非法值返回 None。
pub fn parse_temperature(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// 字符串属性值；非字符串视为空串（与厂商缺省行为一致）。
pub fn vendor_str(value: &Value) -> &str {
    value.as_str().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn thermostat_mode_maps_known_values() {
        assert_eq!(thermostat_mode("cool"), HvacMode::Cool);
        assert_eq!(thermostat_mode("heat"), HvacMode::Heat);
        assert_eq!(thermostat_mode("fan"), HvacMode::FanOnly);
        assert_eq!(thermostat_mode("dehumidification"), HvacMode::Dry);
        assert_eq!(thermostat_mode("auto"), HvacMode::Auto);
    }

    #[test]
    fn fan_speed_maps_known_values() {
        assert_eq!(fan_speed("low"), FanMode::Low);
        assert_eq!(fan_speed("mid"), FanMode::Medium);
        assert_eq!(fan_speed("high"), FanMode::High);
        assert_eq!(fan_speed("auto"), FanMode::Auto);
        assert_eq!(fan_speed("off"), FanMode::Off);
    }

    #[test]
    fn vendor_mapping_round_trips_for_real_modes() {
        for mode in [HvacMode::Cool, HvacMode::Heat, HvacMode::FanOnly, HvacMode::Dry, HvacMode::Auto] {
            assert_eq!(thermostat_mode(hvac_to_vendor(mode)), mode);
        }
        for mode in [FanMode::Low, FanMode::Medium, FanMode::High, FanMode::Auto, FanMode::Off] {
            assert_eq!(fan_speed(fan_to_vendor(mode)), mode);
        }
    }

    #[test]
    fn intrusion_checks_fields_in_order() {
        let props: PropertyMap = [("someonePass", json!("normal")), ("humanDetectedState", json!("havePerson"))]
            .into_iter()
            .collect();
        assert_eq!(intrusion_detected(&props), Some(false));

        let props: PropertyMap = [("curtainAlarmState", json!("intrude"))].into_iter().collect();
        assert_eq!(intrusion_detected(&props), Some(true));

        assert_eq!(intrusion_detected(&PropertyMap::new()), None);
    }

    #[test]
    fn temperature_parsing() {
        assert_eq!(parse_temperature(&json!("22")), Some(22.0));
        assert_eq!(parse_temperature(&json!(21.5)), Some(21.5));
        assert_eq!(parse_temperature(&json!("")), None);
        assert_eq!(parse_temperature(&json!("n/a")), None);
    }

    #[test]
    fn property_text_renders_numbers() {
        assert_eq!(property_text(&json!("55")), "55");
        assert_eq!(property_text(&json!(55)), "55");
        assert_eq!(property_text(&json!(null)), "");
    }
}
