use crate::DefaultValue::{self, Int, List, Text};
use crate::ModelSpec;
use domain::EntityType::{self, Climate, Cover, Fan, Light, MediaPlayer, Sensor, Switch, WaterHeater};

type Defaults = &'static [(&'static str, DefaultValue)];

const NONE: Defaults = &[];

// ---- 窗帘电机 ----

const MOTOR_WITH_POSITION: Defaults = &[("curtainPosition", Int(0)), ("motorSwitch", Text("off"))];

const MOTOR_SWITCH_ONLY: Defaults = &[("motorSwitch", Text("off"))];

const DREAM_CURTAIN_MOTOR: Defaults = &[
    ("curtainPosition", Int(0)),
    ("motorSwitch", Text("off")),
    ("blindAngle", Text("shading135")),
];

// ---- 安防/人体传感器 ----

const DOOR_SENSOR: Defaults = &[
    ("contactState", Text("close")),
    ("batteryPercentage", Text("100")),
    ("batteryState", Text("normal")),
    ("sensorWorkMode", Text("sensor")),
];

const IR_CURTAIN_SENSOR: Defaults = &[
    ("illumination", Text("500")),
    ("batteryPercentage", Text("100")),
    ("batteryState", Text("normal")),
    ("curtainAlarmState", Text("normal")),
    ("securityAlarm", Text("normal")),
    ("sensorWorkMode", Text("sensor")),
];

const EXIST_HUMAN_DETECTOR: Defaults = &[
    ("illumination", Text("500")),
    ("humanDetectedState", Text("havePerson")),
    ("humanDistanceState", Text("0.1")),
    ("humanDirectionState", Text("noMovement")),
    ("humanActiveState", Text("inactivity")),
    ("securityAlarm", Text("normal")),
    ("sensorWorkMode", Text("sensor")),
];

const HUMAN_AREA_EXIST_DETECTOR: Defaults = &[
    ("illumination", Text("500")),
    ("humanDetectedState", Text("havePerson")),
    ("sensorWorkMode", Text("sensor")),
];

const EXIST_HUMAN_DETECTOR_PRO: Defaults = &[
    ("illumination", Text("500")),
    ("humanDetectedState", Text("havePerson")),
    ("humanDistanceState_1", Text("0.1")),
    ("securityAlarm", Text("normal")),
    ("sensorWorkMode", Text("sensor")),
];

const IR_HUMAN_DETECTOR: Defaults = &[
    ("batteryPercentage", Text("100")),
    ("batteryState", Text("normal")),
    ("someonePass", Text("normal")),
    ("securityAlarm", Text("normal")),
    ("sensorWorkMode", Text("sensor")),
];

const IR_CURTAIN_DETECTOR: Defaults = &[
    ("batteryPercentage", Text("100")),
    ("batteryState", Text("normal")),
    ("curtainAlarmState", Text("normal")),
    ("securityAlarm", Text("normal")),
    ("sensorWorkMode", Text("sensor")),
];

const IR_CURTAIN_DETECTOR_ACTIVE: Defaults = &[
    ("curtainAlarmState", Text("normal")),
    ("securityAlarm", Text("normal")),
    ("sensorWorkMode", Text("sensor")),
];

const IR_RADAR_HUMAN_DETECTOR: Defaults = &[
    ("humanDetectedState", Text("havePerson")),
    ("humanActiveState", Text("inactivity")),
    ("batteryPercentage", Text("100")),
    ("sensorWorkMode", Text("sensor")),
];

// ---- 环境传感器 ----

const TEMP_HUM_SENSOR: Defaults = &[
    ("batteryPercentage", Text("100")),
    ("temperature", Text("20.0")),
    ("humidity", Text("30.0")),
];

const AIR_4_1_FORMALDEHYDE: Defaults = &[
    ("illumination", Text("500")),
    ("formaldehyde", Text("0.01")),
    ("humidity", Text("30.0")),
    ("temperature", Text("25.0")),
];

const AIR_4_1_CO2: Defaults = &[
    ("illumination", Text("500")),
    ("co2", Text("100")),
    ("humidity", Text("30.0")),
    ("temperature", Text("25.0")),
];

const AIR_4_1_PM25: Defaults = &[
    ("illumination", Text("500")),
    ("pm25", Text("10")),
    ("humidity", Text("30.0")),
    ("temperature", Text("25.0")),
];

const AIR_5_1_CO2: Defaults = &[
    ("illumination", Text("500")),
    ("co2", Text("100")),
    ("humidity", Text("30.0")),
    ("temperature", Text("25.0")),
    ("tvoc", Text("30")),
];

const AIR_6_1: Defaults = &[
    ("illumination", Text("500")),
    ("co2", Text("100")),
    ("humidity", Text("30.0")),
    ("temperature", Text("25.0")),
    ("pm25", Text("10")),
    ("noise", Text("30")),
];

const AIR_7_1_TVOC: Defaults = &[
    ("illumination", Text("500")),
    ("co2", Text("100")),
    ("humidity", Text("30.0")),
    ("temperature", Text("25.0")),
    ("pm25", Text("10")),
    ("noise", Text("30")),
    ("tvoc", Text("30")),
];

const AIR_7_1_FORMALDEHYDE: Defaults = &[
    ("illumination", Text("500")),
    ("co2", Text("100")),
    ("humidity", Text("30.0")),
    ("temperature", Text("25.0")),
    ("pm25", Text("10")),
    ("noise", Text("30")),
    ("formaldehyde", Text("0.01")),
];

const AIR_8_1: Defaults = &[
    ("illumination", Text("500")),
    ("co2", Text("100")),
    ("humidity", Text("30.0")),
    ("temperature", Text("25.0")),
    ("pm25", Text("10")),
    ("noise", Text("30")),
    ("formaldehyde", Text("0.01")),
    ("tvoc", Text("30")),
];

// ---- 家居安全 ----

const BATTERY_ALARM: Defaults = &[("batteryPercentage", Text("100")), ("alarmState", Text("normal"))];

const ALARM_ONLY: Defaults = &[("alarmState", Text("normal"))];

// ---- 空调 ----

const HVAC_MODES_STANDARD: &[&str] = &["off", "cool", "heat", "dry", "fan_only"];
const HVAC_MODES_WITH_AUTO: &[&str] = &["off", "cool", "heat", "dry", "fan_only", "auto"];
const HVAC_MODES_NO_DRY: &[&str] = &["off", "cool", "heat", "fan_only"];
const FAN_MODES_AC: &[&str] = &["low", "medium", "high", "auto"];
const FAN_MODES_THREE: &[&str] = &["low", "medium", "high"];
const FAN_MODES_WITH_OFF: &[&str] = &["low", "medium", "high", "off"];

const AC_STANDARD: Defaults = &[
    ("currentTemperature", Text("0")),
    ("targetTemperature", Text("26")),
    ("thermostatMode", Text("cool")),
    ("powerSwitch", Text("off")),
    ("windSpeed", Text("low")),
    ("temperature_max", Int(32)),
    ("temperature_min", Int(16)),
    ("hvac_modes", List(HVAC_MODES_STANDARD)),
    ("fan_modes", List(FAN_MODES_AC)),
];

const AC_PRO_MS: Defaults = &[
    ("currentTemperature", Text("0")),
    ("targetTemperature", Text("26")),
    ("thermostatMode", Text("cool")),
    ("powerSwitch", Text("off")),
    ("windSpeed", Text("low")),
    ("temperature_max", Int(30)),
    ("temperature_min", Int(19)),
    ("hvac_modes", List(HVAC_MODES_STANDARD)),
    ("fan_modes", List(FAN_MODES_AC)),
];

const AC_485: Defaults = &[
    ("currentTemperature", Text("0")),
    ("targetTemperature", Text("26")),
    ("thermostatMode", Text("cool")),
    ("powerSwitch", Text("off")),
    ("windSpeed", Text("low")),
    ("temperature_max", Int(30)),
    ("temperature_min", Int(16)),
    ("hvac_modes", List(HVAC_MODES_WITH_AUTO)),
    ("fan_modes", List(FAN_MODES_AC)),
];

const AC_IR_MAKU: Defaults = &[
    ("targetTemperature", Text("26")),
    ("workMode", Text("cool")),
    ("powerSwitch", Text("off")),
    ("windSpeed", Text("low")),
    ("temperature_max", Int(30)),
    ("temperature_min", Int(16)),
    ("hvac_modes", List(&["off", "cool", "auto", "heat", "dry", "fan_only"])),
    ("fan_modes", List(FAN_MODES_AC)),
];

const AC_3H1_C_CHILD: Defaults = &[
    ("targetTemperature", Text("26")),
    ("workMode", Text("cool")),
    ("powerSwitch", Text("off")),
    ("windSpeed", Text("low")),
    ("temperature_max", Int(32)),
    ("temperature_min", Int(16)),
    ("hvac_modes", List(HVAC_MODES_STANDARD)),
    ("fan_modes", List(FAN_MODES_THREE)),
];

const FAN_COIL: Defaults = &[
    ("currentTemperature", Text("0")),
    ("targetTemperature", Text("26")),
    ("thermostatMode", Text("cool")),
    ("powerSwitch", Text("off")),
    ("windSpeed", Text("low")),
    ("temperature_max", Int(32)),
    ("temperature_min", Int(16)),
    ("hvac_modes", List(HVAC_MODES_NO_DRY)),
    ("fan_modes", List(FAN_MODES_THREE)),
];

const RELAY_FAN_COIL: Defaults = &[
    ("currentTemperature", Text("0")),
    ("targetTemperature", Text("26")),
    ("thermostatMode", Text("cool")),
    ("powerSwitch", Text("off")),
    ("windSpeed", Text("low")),
    ("temperature_max", Int(32)),
    ("temperature_min", Int(16)),
    ("hvac_modes", List(HVAC_MODES_NO_DRY)),
    ("fan_modes", List(FAN_MODES_WITH_OFF)),
];

// ---- 新风 ----

const FRESH_AIR: Defaults = &[
    ("powerSwitch", Text("off")),
    ("windSpeed", Text("low")),
    ("fan_modes", List(&["low", "mid", "high"])),
];

const RELAY_FRESH_AIR: Defaults = &[
    ("powerSwitch", Text("off")),
    ("windSpeed", Text("low")),
    ("fan_modes", List(&["off", "low", "mid", "high"])),
];

const RELAY_FRESH_AIR_LV2: Defaults = &[
    ("powerSwitch", Text("off")),
    ("windSpeed", Text("low")),
    ("fan_modes", List(&["off", "low", "high"])),
];

// ---- 地暖 ----

const WATER_VALVE_HEATING: Defaults = &[
    ("currentTemperature", Text("0")),
    ("targetTemperature", Text("26")),
    ("powerSwitch", Text("off")),
    ("temperature_max", Int(32)),
    ("temperature_min", Int(16)),
    ("value_switch_type", Text("waterValveSwitch")),
];

const ELECTRIC_HEATING: Defaults = &[
    ("currentTemperature", Text("0")),
    ("targetTemperature", Text("26")),
    ("powerSwitch", Text("off")),
    ("temperature_max", Int(32)),
    ("temperature_min", Int(16)),
    ("value_switch_type", Text("heatingSwitch")),
];

const HEATING_485_YA_TE: Defaults = &[
    ("currentTemperature", Text("0")),
    ("targetTemperature", Text("26")),
    ("powerSwitch", Text("off")),
    ("temperature_max", Int(45)),
    ("temperature_min", Int(5)),
    ("value_switch_type", Text("")),
];

const HEATING_485_ORG: Defaults = &[
    ("currentTemperature", Text("0")),
    ("targetTemperature", Text("26")),
    ("powerSwitch", Text("off")),
    ("temperature_max", Int(35)),
    ("temperature_min", Int(5)),
    ("value_switch_type", Text("")),
];

const fn plain(model: &'static str, entity_type: EntityType) -> ModelSpec {
    ModelSpec {
        model,
        entity_type,
        ability: None,
        defaults: NONE,
    }
}

const fn with_defaults(model: &'static str, entity_type: EntityType, defaults: Defaults) -> ModelSpec {
    ModelSpec {
        model,
        entity_type,
        ability: None,
        defaults,
    }
}

const fn motor(model: &'static str, ability: u8, defaults: Defaults) -> ModelSpec {
    ModelSpec {
        model,
        entity_type: Cover,
        ability: Some(ability),
        defaults,
    }
}

pub(crate) const MODELS: &[ModelSpec] = &[
    // 灯光
    plain("l_dimmer_switch", Light),
    plain("l_smart_strip_controller", Light),
    plain("l_smart_color_temperature_spotlight", Light),
    plain("l_smart_dimming_controller", Light),
    plain("l_smart_tube_spotlight", Light),
    plain("l_magnetic_color_controller", Light),
    plain("l_smart_dimming_dali", Light),
    plain("l_smart_color_temperature_dali", Light),
    plain("l_smart_color_light", Light),
    plain("l_smart_dimming_spotlight", Light),
    plain("l_smart_color_temperature_light", Light),
    // 开关
    plain("l_zf_single_switch", Switch),
    plain("l_zf_double_switch", Switch),
    plain("l_zf_three_switch", Switch),
    plain("l_zf_four_switch", Switch),
    plain("l_m_single_switch_box", Switch),
    plain("l_m_double_switch_box", Switch),
    plain("l_m_three_switch_box", Switch),
    plain("l_m_four_switch_box", Switch),
    plain("l_f_single_switch", Switch),
    plain("l_f_double_switch", Switch),
    plain("l_f_three_switch", Switch),
    plain("l_zf_single_switch_ai_smart_screen_config_switch", Switch),
    plain("l_zf_single_switch_ai_smart_screen_e_series", Switch),
    plain("l_zf_double_switch_ai_smart_large_screen", Switch),
    plain("l_zf_single_switch_ai_smart_screen", Switch),
    plain("hvac_general_module_child_relay_switch", Switch),
    plain("hvac_general_module_child_relay_garagedoor", Switch),
    plain("ha_smart_socket", Switch),
    plain("ha_ir_socket_kookong", Switch),
    plain("multi_series_panel_switch", Switch),
    // 安防传感器
    with_defaults("ss_smart_door_sensor", Sensor, DOOR_SENSOR),
    with_defaults("ss_ir_curtain_sensor", Sensor, IR_CURTAIN_SENSOR),
    with_defaults("ss_exist_human_detector", Sensor, EXIST_HUMAN_DETECTOR),
    with_defaults("ss_ir_radar_human_detector", Sensor, IR_RADAR_HUMAN_DETECTOR),
    with_defaults("ss_human_area_exist_detector", Sensor, HUMAN_AREA_EXIST_DETECTOR),
    with_defaults("ss_exist_human_detector_pro", Sensor, EXIST_HUMAN_DETECTOR_PRO),
    with_defaults("ss_ir_human_detector", Sensor, IR_HUMAN_DETECTOR),
    with_defaults("ss_ir_curtain_detector", Sensor, IR_CURTAIN_DETECTOR),
    with_defaults("ss_ir_curtain_detector_active", Sensor, IR_CURTAIN_DETECTOR_ACTIVE),
    // 环境传感器
    with_defaults("env_temp_hum_sensor", Sensor, TEMP_HUM_SENSOR),
    with_defaults("env_4_1_air_genius_formaldehyde", Sensor, AIR_4_1_FORMALDEHYDE),
    with_defaults("env_4_1_air_genius_co2", Sensor, AIR_4_1_CO2),
    with_defaults("env_4_1_air_genius_pm25", Sensor, AIR_4_1_PM25),
    with_defaults("env_4_1_air_box_pm25", Sensor, AIR_4_1_PM25),
    with_defaults("env_5_1_air_genius_co2", Sensor, AIR_5_1_CO2),
    with_defaults("env_6_1_air_genius", Sensor, AIR_6_1),
    with_defaults("env_7_1_air_genius_tvoc", Sensor, AIR_7_1_TVOC),
    with_defaults("env_7_1_air_box_tvoc", Sensor, AIR_7_1_TVOC),
    with_defaults("env_7_1_air_genius", Sensor, AIR_7_1_FORMALDEHYDE),
    with_defaults("env_7_1_air_box", Sensor, AIR_7_1_FORMALDEHYDE),
    with_defaults("env_8_1_air_genius", Sensor, AIR_8_1),
    with_defaults("env_8_1_air_box", Sensor, AIR_8_1),
    // 家居安全
    with_defaults("hs_smoke_detector", Sensor, BATTERY_ALARM),
    with_defaults("hs_water_leak_detector", Sensor, BATTERY_ALARM),
    with_defaults("hs_flammable_gas_detector", Sensor, ALARM_ONLY),
    with_defaults("hs_gas_leak_detector", Sensor, ALARM_ONLY),
    with_defaults("hs_sos_button", Sensor, BATTERY_ALARM),
    // 窗帘/开窗器（多路）
    motor("wc_smart_roller_motor", 2, MOTOR_WITH_POSITION),
    motor("wc_smart_curtain_motor", 2, MOTOR_WITH_POSITION),
    motor("wc_sliding_window_opener", 2, MOTOR_WITH_POSITION),
    motor("wc_panning_window_opener", 2, MOTOR_WITH_POSITION),
    motor("wc_single_motor_control_panel", 1, MOTOR_SWITCH_ONLY),
    motor("wc_double_motor_control_panel", 1, MOTOR_SWITCH_ONLY),
    motor("ai_smart_screen_config_motor", 1, MOTOR_SWITCH_ONLY),
    motor("wc_dream_curtain_motor", 3, DREAM_CURTAIN_MOTOR),
    motor("wc_smart_curtain_motor_box", 2, MOTOR_WITH_POSITION),
    motor("multi_series_panel_motor", 1, MOTOR_WITH_POSITION),
    // 空调
    with_defaults("hvac_thermostat_3h1_e3_child_ac", Climate, AC_STANDARD),
    with_defaults("hvac_smart_gateway_engineering_ac", Climate, AC_STANDARD),
    with_defaults("hvac_smart_gateway_general_ac", Climate, AC_STANDARD),
    with_defaults("hvac_smart_gateway_pro_ms_ac", Climate, AC_PRO_MS),
    with_defaults("hvac_ac_e3", Climate, AC_STANDARD),
    with_defaults("hvac_ir_air_conditioner_maku", Climate, AC_IR_MAKU),
    with_defaults("hvac_thermostat_3h1_c_child_ac", Climate, AC_3H1_C_CHILD),
    with_defaults("hvac_super_temp_panel_child_fan", Climate, AC_STANDARD),
    with_defaults("hvac_485_ac_gree_fgr35d", Climate, AC_485),
    with_defaults("hvac_485_ac_hitachi_pcpihhq", Climate, AC_485),
    with_defaults("hvac_485_ac_haier_casarte_ycja001", Climate, AC_485),
    with_defaults("hvac_fan_coil_3h1_th", Climate, FAN_COIL),
    with_defaults(
        "smart_protocol_conversion_module_child_relay_fan",
        Climate,
        RELAY_FAN_COIL,
    ),
    with_defaults("hvac_general_module_child_relay_fan", Climate, RELAY_FAN_COIL),
    // 新风
    with_defaults("hvac_thermostat_3h1_e3_child_fair_power", Fan, FRESH_AIR),
    with_defaults("hvac_fresh_air_3h1_th", Fan, FRESH_AIR),
    with_defaults("hvac_general_module_child_relay_fair", Fan, RELAY_FRESH_AIR),
    with_defaults("hvac_general_module_child_relay_fair_lv2", Fan, RELAY_FRESH_AIR_LV2),
    with_defaults("hvac_485_fair_chino", Fan, FRESH_AIR),
    with_defaults("hvac_485_fair_bole_cs2", Fan, FRESH_AIR),
    with_defaults("hvac_485_fair_aidishi_kf800rm", Fan, FRESH_AIR),
    // 地暖
    with_defaults("hvac_thermostat_3h1_e3_child_wfh", WaterHeater, WATER_VALVE_HEATING),
    with_defaults("hvac_wfh_e3", WaterHeater, WATER_VALVE_HEATING),
    with_defaults("hvac_water_floor_heating_3h1_th", WaterHeater, WATER_VALVE_HEATING),
    with_defaults("hvac_water_floor_heating_th", WaterHeater, WATER_VALVE_HEATING),
    with_defaults("hvac_thermostat_3h1_c_child_efh", WaterHeater, ELECTRIC_HEATING),
    with_defaults("hvac_485_wfh_ya_te_lee6606", WaterHeater, HEATING_485_YA_TE),
    with_defaults("hvac_485_efh_org", WaterHeater, HEATING_485_ORG),
    with_defaults("hvac_485_wfh_org", WaterHeater, HEATING_485_ORG),
    with_defaults("hvac_floor_heating_panel_2s1_child_efh", WaterHeater, ELECTRIC_HEATING),
    with_defaults("hvac_floor_heating_panel_2s1_child_wfh", WaterHeater, WATER_VALVE_HEATING),
    with_defaults("hvac_water_floor_heating_3h1_child_wfh", WaterHeater, WATER_VALVE_HEATING),
    with_defaults("hvac_general_module_child_relay_wfh", WaterHeater, ELECTRIC_HEATING),
    // 音箱
    plain("i_smart_cloud_speaker_X10", MediaPlayer),
];
