//! 传感器实体：一条设备记录按属性展开为多个单值传感器。

use crate::message::{InboundMessage, PropertyReport};
use domain::{DeviceId, DeviceInfo, DeviceRecord, PropertyMap};
use serde::Serialize;
use tracing::debug;
use uiot_normalize::{self as normalize, label, vendor_str};

/// 传感器设备类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorDeviceClass {
    Battery,
    Temperature,
    Humidity,
    SoundPressure,
    #[serde(rename = "carbon_dioxide")]
    Co2,
}

impl SensorDeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Battery => "battery",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::SoundPressure => "sound_pressure",
            Self::Co2 => "carbon_dioxide",
        }
    }
}

/// 统计类别；当前只有瞬时测量值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
}

/// 单个传感器种类的展示元数据。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorDescriptor {
    pub name_suffix: &'static str,
    pub device_class: Option<SensorDeviceClass>,
    pub unit: Option<&'static str>,
    pub state_class: Option<StateClass>,
    pub icon: &'static str,
}

/// 传感器种类。每个种类对应一个属性键与一套标准化规则。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    BatteryLevel,
    Illuminance,
    SecurityAlarmState,
    HumanDetected,
    HumanPass,
    HumanDistance,
    HumanDistanceAlt,
    HumanActive,
    Contact,
    SensorWorkMode,
    Temperature,
    Humidity,
    Pm25,
    Noise,
    Co2,
    Tvoc,
    Formaldehyde,
    AlarmState,
    SecurityAlarm,
}

impl SensorKind {
    /// 传感器类型标签，同时用作唯一标识前缀。
    pub fn tag(&self) -> &'static str {
        match self {
            Self::BatteryLevel => "battery_level",
            Self::Illuminance => "illuminance",
            Self::SecurityAlarmState => "security_alarm_state",
            Self::HumanDetected => "human_detected_state",
            Self::HumanPass => "human_detected_state_1",
            Self::HumanDistance => "human_distance_state",
            Self::HumanDistanceAlt => "human_distance_state_1",
            Self::HumanActive => "human_active_state",
            Self::Contact => "contact",
            Self::SensorWorkMode => "sensor_work_mode",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Pm25 => "pm25",
            Self::Noise => "noise",
            Self::Co2 => "co2",
            Self::Tvoc => "tvoc",
            Self::Formaldehyde => "formaldehyde",
            Self::AlarmState => "alarmState",
            Self::SecurityAlarm => "securityAlarm",
        }
    }

    /// 读数所在的属性键。
    pub fn property_key(&self) -> &'static str {
        match self {
            Self::BatteryLevel => "batteryPercentage",
            Self::Illuminance => "illumination",
            Self::SecurityAlarmState => "curtainAlarmState",
            Self::HumanDetected => "humanDetectedState",
            Self::HumanPass => "someonePass",
            Self::HumanDistance => "humanDistanceState",
            Self::HumanDistanceAlt => "humanDistanceState_1",
            Self::HumanActive => "humanActiveState",
            Self::Contact => "contactState",
            Self::SensorWorkMode => "sensorWorkMode",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Pm25 => "pm25",
            Self::Noise => "noise",
            Self::Co2 => "co2",
            Self::Tvoc => "tvoc",
            Self::Formaldehyde => "formaldehyde",
            Self::AlarmState => "alarmState",
            Self::SecurityAlarm => "securityAlarm",
        }
    }

    pub fn descriptor(&self) -> SensorDescriptor {
        use SensorDeviceClass as Class;
        let plain = |name_suffix, icon| SensorDescriptor {
            name_suffix,
            device_class: None,
            unit: None,
            state_class: None,
            icon,
        };
        let measured = |name_suffix, device_class, unit, icon| SensorDescriptor {
            name_suffix,
            device_class,
            unit: Some(unit),
            state_class: Some(StateClass::Measurement),
            icon,
        };
        match self {
            Self::BatteryLevel => measured("电量", Some(Class::Battery), "%", "mdi:battery"),
            Self::Illuminance => SensorDescriptor {
                unit: Some("lux"),
                ..plain("光照", "mdi:brightness-5")
            },
            Self::SecurityAlarmState => plain("报警状态", "mdi:alarm-light"),
            Self::HumanDetected | Self::HumanPass => plain("有人无人状态", "mdi:account"),
            Self::HumanDistance | Self::HumanDistanceAlt => SensorDescriptor {
                unit: Some("m"),
                ..plain("检测距离", "mdi:ruler")
            },
            Self::HumanActive => plain("体动特征", "mdi:walk"),
            Self::Contact => plain("开合状态", "mdi:door-closed"),
            Self::SensorWorkMode => plain("工作模式", "mdi:shield-home"),
            Self::Temperature => {
                measured("温度", Some(Class::Temperature), "°C", "mdi:thermometer")
            }
            Self::Humidity => measured("湿度", Some(Class::Humidity), "%", "mdi:water-percent"),
            Self::Pm25 => measured("PM2.5", None, "µg/m³", "mdi:blur"),
            Self::Noise => measured("噪音", Some(Class::SoundPressure), "dB", "mdi:volume-high"),
            Self::Co2 => measured("CO2", Some(Class::Co2), "ppm", "mdi:molecule-co2"),
            Self::Tvoc => measured("TVOC", None, "ppb", "mdi:chemical-weapon"),
            Self::Formaldehyde => measured("甲醛", None, "µg/m³", "mdi:chemical-weapon"),
            Self::AlarmState | Self::SecurityAlarm => plain("报警状态", "mdi:shield-alert"),
        }
    }

    /// 从属性增量计算新值；None 表示该增量与本种类无关，状态不变。
    /// securityAlarm 每条增量都重新判定：本条增量布防且检测到入侵才报警。
    fn reading(&self, properties: &PropertyMap) -> Option<String> {
        let normalized = |map: fn(&str) -> &'static str| {
            properties
                .try_get(self.property_key())
                .map(|value| map(vendor_str(value)).to_string())
        };
        match self {
            Self::SecurityAlarmState => normalized(normalize::curtain_alarm),
            Self::HumanDetected | Self::HumanPass => normalized(normalize::presence),
            Self::HumanActive => {
                if properties.get_str("humanDetectedState") == Some("noPerson") {
                    Some(label::NO_SIGNATURE.to_string())
                } else {
                    normalized(normalize::human_activity)
                }
            }
            Self::Contact if properties.is_set("contactState") => normalized(normalize::contact),
            Self::SensorWorkMode if properties.is_set("sensorWorkMode") => {
                normalized(normalize::work_mode)
            }
            Self::Contact | Self::SensorWorkMode => None,
            Self::AlarmState => normalized(normalize::alarm),
            Self::SecurityAlarm => {
                let armed = properties.get_str("securitySwitch") == Some("armed");
                let value = if armed && normalize::intrusion_detected(properties) == Some(true) {
                    label::ALARM
                } else {
                    label::NORMAL
                };
                Some(value.to_string())
            }
            _ => properties
                .try_get(self.property_key())
                .map(normalize::property_text),
        }
    }
}

/// 展开顺序；同一元组内为互斥分支，取第一个命中者。
const EXPANSION: &[&[SensorKind]] = &[
    &[SensorKind::BatteryLevel],
    &[SensorKind::Illuminance],
    &[SensorKind::SecurityAlarmState],
    &[SensorKind::HumanDetected, SensorKind::HumanPass],
    &[SensorKind::HumanDistance, SensorKind::HumanDistanceAlt],
    &[SensorKind::HumanActive],
    &[SensorKind::Contact],
    &[SensorKind::SensorWorkMode],
    &[SensorKind::Temperature],
    &[SensorKind::Humidity],
    &[SensorKind::Pm25],
    &[SensorKind::Noise],
    &[SensorKind::Co2],
    &[SensorKind::Tvoc],
    &[SensorKind::Formaldehyde],
    &[SensorKind::AlarmState, SensorKind::SecurityAlarm],
];

/// 报警类只要求键存在，其余种类要求值非空。
fn is_expanded(kind: SensorKind, properties: &PropertyMap) -> bool {
    match kind {
        SensorKind::AlarmState | SensorKind::SecurityAlarm => {
            properties.contains(kind.property_key())
        }
        _ => properties.is_set(kind.property_key()),
    }
}

/// 设备记录 → 传感器实体列表，顺序固定。
pub fn sensor_entities_for(record: &DeviceRecord) -> Vec<SensorEntity> {
    EXPANSION
        .iter()
        .filter_map(|group| {
            group
                .iter()
                .copied()
                .find(|kind| is_expanded(*kind, &record.properties))
        })
        .map(|kind| SensorEntity::from_record(record, kind))
        .collect()
}

/// 传感器的可观测状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorState {
    pub value: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorEntity {
    kind: SensorKind,
    device_id: DeviceId,
    unique_id: String,
    name: String,
    device_info: DeviceInfo,
    /// 最近一次已知的布防状态，仅供展示。
    armed: bool,
    state: SensorState,
}

impl SensorEntity {
    pub fn from_record(record: &DeviceRecord, kind: SensorKind) -> Self {
        let armed = record.properties.get_str("securitySwitch") == Some("armed");
        let value = match kind {
            SensorKind::SecurityAlarm => record
                .properties
                .try_get(kind.property_key())
                .map(|value| normalize::alarm(vendor_str(value)).to_string()),
            _ => kind.reading(&record.properties),
        };
        let entity = Self {
            kind,
            device_id: record.device_id.clone(),
            unique_id: format!("{}_{}", kind.tag(), record.device_id),
            name: format!("{}：{}", record.device_name, kind.descriptor().name_suffix),
            device_info: record.device_info(),
            armed,
            state: SensorState {
                value: coerce_empty(value.unwrap_or_default()),
                available: record.is_online(),
            },
        };
        debug!(
            target: "uiot.entity",
            unique_id = %entity.unique_id,
            value = %entity.state.value,
            available = entity.state.available,
            "sensor_entity_created"
        );
        entity
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    pub fn state(&self) -> &SensorState {
        &self.state
    }

    pub fn value(&self) -> &str {
        &self.state.value
    }

    pub fn available(&self) -> bool {
        self.state.available
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn descriptor(&self) -> SensorDescriptor {
        self.kind.descriptor()
    }

    /// 当前图标；开合、工作模式与电量随读数变化。
    pub fn icon(&self) -> &'static str {
        let value = self.state.value.as_str();
        match self.kind {
            SensorKind::Contact if value == label::OPEN => "mdi:door-open",
            SensorKind::Contact => "mdi:door-closed",
            SensorKind::SensorWorkMode if value == label::SENSOR => "mdi:gauge",
            SensorKind::SensorWorkMode => "mdi:shield-home",
            SensorKind::BatteryLevel => match value.trim().parse::<f64>() {
                Ok(level) if level > 90.0 => "mdi:battery",
                Ok(level) if level > 70.0 => "mdi:battery-80",
                Ok(level) if level > 50.0 => "mdi:battery-60",
                Ok(level) if level > 30.0 => "mdi:battery-40",
                Ok(level) if level > 15.0 => "mdi:battery-20",
                Ok(_) => "mdi:battery-alert",
                Err(_) => self.kind.descriptor().icon,
            },
            _ => self.kind.descriptor().icon,
        }
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
        if self.kind == SensorKind::SecurityAlarm
            && let Some(switch) = properties.try_get("securitySwitch")
        {
            self.armed = vendor_str(switch) == "armed";
        }
        if let Some(value) = self.kind.reading(properties) {
            self.state.value = coerce_empty(value);
        }
    }
}

fn coerce_empty(value: String) -> String {
    if value.is_empty() {
        "0".to_string()
    } else {
        value
    }
}
