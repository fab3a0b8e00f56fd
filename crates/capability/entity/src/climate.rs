//! 空调/温控实体：属性增量合并与控制指令规划。

use crate::message::{InboundMessage, PropertyReport};
use domain::{DeviceId, DeviceInfo, DeviceRecord, FanMode, HvacMode, PropertyMap, is_offline_flag};
use serde_json::Value;
use tracing::{debug, warn};
use uiot_normalize::{self as normalize, parse_temperature, vendor_str};

const DEFAULT_TARGET_TEMPERATURE: f64 = 20.0;

/// 设备上报模式所用的属性键，构造时确定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKey {
    ThermostatMode,
    WorkMode,
}

impl ModeKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThermostatMode => "thermostatMode",
            Self::WorkMode => "workMode",
        }
    }
}

/// 构造后不再变化的能力描述。
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateTraits {
    pub min_temp: f64,
    pub max_temp: f64,
    pub hvac_modes: Vec<HvacMode>,
    pub fan_modes: Vec<FanMode>,
    pub temperature_unit: &'static str,
    pub target_temperature_step: f64,
    pub mode_key: ModeKey,
}

/// 空调的可观测状态。
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateState {
    pub hvac_mode: HvacMode,
    pub fan_mode: FanMode,
    pub target_temperature: f64,
    /// 0 表示无读数。
    pub current_temperature: f64,
    pub available: bool,
}

impl ClimateState {
    /// 当前温度读数；0 或未设置时为 None。
    pub fn current_reading(&self) -> Option<f64> {
        (self.current_temperature > 0.0).then_some(self.current_temperature)
    }
}

/// 面向空调的控制指令。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClimateCommand {
    TurnOn,
    TurnOff,
    SetTemperature(f64),
    SetHvacMode(HvacMode),
    SetFanMode(FanMode),
}

/// 一次下发给厂商接口的属性补丁。
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPatch {
    pub device_id: DeviceId,
    pub properties: PropertyMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClimateEntity {
    device_id: DeviceId,
    name: String,
    device_info: DeviceInfo,
    traits: ClimateTraits,
    /// 最近一次已知的运行模式（不含 Off），开机但未带模式时沿用。
    operating_mode: HvacMode,
    state: ClimateState,
}

impl ClimateEntity {
    pub fn from_record(record: &DeviceRecord) -> Self {
        let properties = &record.properties;
        let mode_key = if properties.contains(ModeKey::ThermostatMode.as_str()) {
            ModeKey::ThermostatMode
        } else {
            ModeKey::WorkMode
        };
        let operating_mode = normalize::thermostat_mode(
            properties.get_str(mode_key.as_str()).unwrap_or("auto"),
        );

        let target_temperature = match properties.try_get("targetTemperature") {
            Some(value) => parse_temperature(value).unwrap_or_else(|| {
                warn!(
                    target: "uiot.entity",
                    device_id = %record.device_id,
                    value = %value,
                    "invalid target temperature, using default"
                );
                DEFAULT_TARGET_TEMPERATURE
            }),
            None => DEFAULT_TARGET_TEMPERATURE,
        };
        let current_temperature = properties
            .try_get("currentTemperature")
            .and_then(parse_temperature)
            .unwrap_or(0.0);
        let fan_mode = normalize::fan_speed(properties.get_str("windSpeed").unwrap_or("low"));
        let hvac_mode = if properties.get_str("powerSwitch") == Some("off") {
            HvacMode::Off
        } else {
            operating_mode
        };

        let traits = ClimateTraits {
            min_temp: temperature_limit(properties, "temperature_min"),
            max_temp: temperature_limit(properties, "temperature_max"),
            hvac_modes: parse_modes(properties, "hvac_modes"),
            fan_modes: parse_modes(properties, "fan_modes"),
            temperature_unit: "°C",
            target_temperature_step: 1.0,
            mode_key,
        };

        let entity = Self {
            device_id: record.device_id.clone(),
            name: record.device_name.clone(),
            device_info: record.device_info(),
            traits,
            operating_mode,
            state: ClimateState {
                hvac_mode,
                fan_mode,
                target_temperature,
                current_temperature,
                available: record.is_online(),
            },
        };
        debug!(
            target: "uiot.entity",
            device_id = %entity.device_id,
            hvac_mode = %entity.state.hvac_mode,
            fan_mode = %entity.state.fan_mode,
            available = entity.state.available,
            "climate_entity_created"
        );
        entity
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// 空调的唯一标识即设备 id。
    pub fn unique_id(&self) -> &str {
        self.device_id.as_str()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    pub fn traits(&self) -> &ClimateTraits {
        &self.traits
    }

    pub fn state(&self) -> &ClimateState {
        &self.state
    }

    /// 应用一条入站消息，返回可观测状态是否变化。
    pub fn apply(&mut self, message: &InboundMessage) -> bool {
        let before = self.state.clone();
        match message {
            InboundMessage::OnlineReport(report) => {
                if let Some(online) = report.online_state_of(&self.device_id) {
                    self.state.available = online;
                }
            }
            InboundMessage::PropertyReport(report) if report.device_id == self.device_id => {
                self.apply_report(report);
            }
            _ => {}
        }
        self.state != before
    }

    fn apply_report(&mut self, report: &PropertyReport) {
        let properties = &report.properties;
        if properties.is_set("powerSwitch") {
            if properties.get_str("powerSwitch") == Some("off") {
                self.state.hvac_mode = HvacMode::Off;
            } else {
                if let Some(mode) = properties.try_get(self.traits.mode_key.as_str()) {
                    self.operating_mode = normalize::thermostat_mode(vendor_str(mode));
                }
                self.state.hvac_mode = self.operating_mode;
                if let Some(value) = properties.try_get("currentTemperature") {
                    self.update_temperature(value, Target::Current);
                }
                if let Some(value) = properties.try_get("targetTemperature") {
                    self.update_temperature(value, Target::Setpoint);
                }
            }
        }
        if let Some(speed) = properties.try_get("windSpeed") {
            self.state.fan_mode = normalize::fan_speed(vendor_str(speed));
        }
        if let Some(online) = &report.device_online_state {
            self.state.available = !is_offline_flag(Some(online));
        }
    }

    fn update_temperature(&mut self, value: &Value, target: Target) {
        if target == Target::Current && value.as_str() == Some("") {
            self.state.current_temperature = 0.0;
            return;
        }
        match parse_temperature(value) {
            Some(parsed) => match target {
                Target::Current => self.state.current_temperature = parsed,
                Target::Setpoint => self.state.target_temperature = parsed,
            },
            None => warn!(
                target: "uiot.entity",
                device_id = %self.device_id,
                value = %value,
                "unparsable temperature ignored"
            ),
        }
    }

    /// 把控制指令翻译为按顺序下发的属性补丁。
    pub fn plan(&self, command: ClimateCommand) -> Vec<ControlPatch> {
        let power = |state: &str| self.patch([("powerSwitch", Value::from(state))]);
        let is_off = self.state.hvac_mode == HvacMode::Off;
        match command {
            ClimateCommand::TurnOn => vec![power("on")],
            ClimateCommand::TurnOff | ClimateCommand::SetHvacMode(HvacMode::Off) => {
                vec![power("off")]
            }
            ClimateCommand::SetTemperature(temperature) => {
                let rounded = (((temperature * 2.0) + 0.5) / 2.0).trunc() as i64;
                let mut patches = Vec::with_capacity(2);
                if is_off {
                    patches.push(power("on"));
                }
                patches.push(self.patch([("targetTemperature", Value::from(rounded.to_string()))]));
                patches
            }
            ClimateCommand::SetHvacMode(mode) => {
                let mut patches = Vec::with_capacity(2);
                if is_off {
                    patches.push(power("on"));
                }
                patches.push(self.patch([(
                    self.traits.mode_key.as_str(),
                    Value::from(normalize::hvac_to_vendor(mode)),
                )]));
                patches
            }
            ClimateCommand::SetFanMode(mode) => {
                vec![self.patch([("windSpeed", Value::from(normalize::fan_to_vendor(mode)))])]
            }
        }
    }

    /// 下发成功后的本地乐观更新。开机与调温等待设备回报。
    pub fn apply_optimistic(&mut self, command: ClimateCommand) -> bool {
        let before = self.state.clone();
        match command {
            ClimateCommand::TurnOff | ClimateCommand::SetHvacMode(HvacMode::Off) => {
                self.state.hvac_mode = HvacMode::Off;
            }
            ClimateCommand::SetHvacMode(mode) => {
                self.operating_mode = mode;
                self.state.hvac_mode = mode;
            }
            ClimateCommand::TurnOn
            | ClimateCommand::SetTemperature(_)
            | ClimateCommand::SetFanMode(_) => {}
        }
        self.state != before
    }

    fn patch<const N: usize>(&self, entries: [(&str, Value); N]) -> ControlPatch {
        ControlPatch {
            device_id: self.device_id.clone(),
            properties: entries.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Current,
    Setpoint,
}

fn temperature_limit(properties: &PropertyMap, key: &str) -> f64 {
    properties
        .try_get(key)
        .and_then(parse_temperature)
        .unwrap_or(0.0)
}

/// 模式列表中无法识别的项被丢弃。
fn parse_modes<T: std::str::FromStr>(properties: &PropertyMap, key: &str) -> Vec<T> {
    properties
        .try_get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|item| item.parse().ok())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::EntityType;
    use serde_json::json;

    fn entity(properties: Value) -> ClimateEntity {
        let mut record = DeviceRecord::new("3", "hvac_ac_e3", EntityType::Climate);
        record.channel_num = Some(1);
        record.properties = PropertyMap::from_value(&properties).expect("object");
        ClimateEntity::from_record(&record)
    }

    #[test]
    fn work_mode_key_is_used_when_thermostat_mode_absent() {
        let climate = entity(json!({"workMode": "cool", "powerSwitch": "on"}));
        assert_eq!(climate.traits().mode_key, ModeKey::WorkMode);
        assert_eq!(climate.state().hvac_mode, HvacMode::Cool);
    }

    #[test]
    fn construction_defaults() {
        let climate = entity(json!({}));
        let state = climate.state();
        assert_eq!(state.hvac_mode, HvacMode::Auto);
        assert_eq!(state.fan_mode, FanMode::Low);
        assert_eq!(state.target_temperature, 20.0);
        assert_eq!(state.current_reading(), None);
        assert!(state.available);
        assert_eq!(climate.traits().min_temp, 0.0);
        assert!(climate.traits().hvac_modes.is_empty());
    }

    #[test]
    fn mode_lists_skip_unknown_entries() {
        let climate = entity(json!({
            "hvac_modes": ["cool", "heat", "turbo"],
            "fan_modes": ["low", "medium", "quiet"]
        }));
        assert_eq!(climate.traits().hvac_modes, vec![HvacMode::Cool, HvacMode::Heat]);
        assert_eq!(climate.traits().fan_modes, vec![FanMode::Low, FanMode::Medium]);
    }

    #[test]
    fn temperature_rounding_matches_half_step() {
        let climate = entity(json!({"powerSwitch": "on"}));
        let value = |t| {
            climate.plan(ClimateCommand::SetTemperature(t))[0]
                .properties
                .get_str("targetTemperature")
                .map(str::to_string)
        };
        assert_eq!(value(22.0).as_deref(), Some("22"));
        assert_eq!(value(22.5).as_deref(), Some("22"));
        assert_eq!(value(22.75).as_deref(), Some("23"));
    }
}
