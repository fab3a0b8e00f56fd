use uiot_config::{AppConfig, ConfigError};

#[test]
fn out_of_range_qos_is_rejected() {
    // 独立测试进程，避免与其他用例竞争环境变量。
    unsafe {
        std::env::set_var("UIOT_MQTT_QOS", "3");
    }

    let err = AppConfig::from_env().expect_err("invalid qos");
    assert!(matches!(err, ConfigError::Invalid(key, value) if key == "UIOT_MQTT_QOS" && value == "3"));
}
