//! 桥接运行配置加载。

use std::env;
use std::path::PathBuf;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 桥接运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    /// 上报主题前缀，订阅 `{prefix}/#`。
    pub mqtt_topic_prefix: String,
    pub mqtt_qos: u8,
    /// 启动时加载的设备列表快照（`{"deviceList": [...]}`）。
    pub device_list_path: Option<PathBuf>,
    /// 场景列表（`{"data": "<含 smartList 的 JSON 字符串>"}`），并入设备快照。
    pub scene_list_path: Option<PathBuf>,
    pub ingest_enabled: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let mqtt_host = env::var("UIOT_MQTT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let mqtt_port = read_u16_with_default("UIOT_MQTT_PORT", 1883)?;
        let mqtt_username = read_optional("UIOT_MQTT_USERNAME");
        let mqtt_password = read_optional("UIOT_MQTT_PASSWORD");
        let mqtt_topic_prefix =
            env::var("UIOT_MQTT_TOPIC_PREFIX").unwrap_or_else(|_| "uiot".to_string());
        let mqtt_qos = read_u8_with_default("UIOT_MQTT_QOS", 1)?;
        let device_list_path = read_optional("UIOT_DEVICE_LIST_PATH").map(PathBuf::from);
        let scene_list_path = read_optional("UIOT_SCENE_LIST_PATH").map(PathBuf::from);
        let ingest_enabled = read_bool_with_default("UIOT_INGEST", false);

        Ok(Self {
            mqtt_host,
            mqtt_port,
            mqtt_username,
            mqtt_password,
            mqtt_topic_prefix,
            mqtt_qos,
            device_list_path,
            scene_list_path,
            ingest_enabled,
        })
    }
}

fn read_u16_with_default(key: &str, default: u16) -> Result<u16, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u16>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u8_with_default(key: &str, default: u8) -> Result<u8, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    match value.parse::<u8>() {
        Ok(parsed) if parsed <= 2 => Ok(parsed),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
