//! 接入链路装配模块
//!
//! 该模块负责把 MQTT 接入源与实体中枢连接起来：接入源按到达顺序
//! 投递 `(topic, payload)`，处理器交给中枢解析、合并并通知订阅方。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uiot_config::AppConfig;
use uiot_ingest::{IngestError, MessageHandler, MqttSource, MqttSourceConfig, NoopSource, Source};
use uiot_pipeline::EntityHub;

/// 中枢处理器
///
/// 实现 `MessageHandler`，把每条上报交给实体中枢。中枢内部持有锁，
/// 同一时刻只合并一条消息，保证实体状态按发布顺序演进。
struct HubHandler {
    /// 实体中枢（克隆共享同一份状态）
    hub: EntityHub,
}

#[async_trait]
impl MessageHandler for HubHandler {
    async fn handle(&self, topic: &str, payload: &[u8]) -> Result<(), IngestError> {
        match self.hub.on_message(topic, payload).await {
            Ok(changed) => {
                debug!(
                    target: "uiot.bridge",
                    topic = %topic,
                    changed = changed.len(),
                    "message_handled"
                );
                Ok(())
            }
            Err(err) => {
                // 结构性错误只影响本条消息，接入源记录后继续
                warn!(target: "uiot.bridge", topic = %topic, error = %err, "message_failed");
                Err(IngestError::Handler(err.to_string()))
            }
        }
    }
}

/// 启动接入任务
///
/// 根据配置选择 MQTT 接入源或占位源，并在后台任务中运行。
pub fn spawn_ingest(config: &AppConfig, hub: EntityHub) -> tokio::task::JoinHandle<()> {
    let handler = Arc::new(HubHandler { hub });

    // 选择接入源：启用时订阅 MQTT，否则使用占位源
    let source: Arc<dyn Source> = if config.ingest_enabled {
        let mqtt_config = MqttSourceConfig {
            host: config.mqtt_host.clone(),
            port: config.mqtt_port,
            username: config.mqtt_username.clone(),
            password: config.mqtt_password.clone(),
            topic_prefix: config.mqtt_topic_prefix.clone(),
            qos: config.mqtt_qos,
        };
        info!(
            target: "uiot.bridge",
            "ingest source: mqtt {}:{} prefix={}",
            mqtt_config.host, mqtt_config.port, mqtt_config.topic_prefix
        );
        Arc::new(MqttSource::new(mqtt_config))
    } else {
        info!(target: "uiot.bridge", "ingest source: noop (UIOT_INGEST=off)");
        Arc::new(NoopSource)
    };

    tokio::spawn(async move {
        if let Err(err) = source.run(handler).await {
            warn!(target: "uiot.bridge", "ingest stopped: {}", err);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uiot_pipeline::NoopSink;

    #[tokio::test]
    async fn handler_forwards_messages_to_hub() {
        let hub = EntityHub::new(Arc::new(NoopSink));
        let handler = HubHandler { hub: hub.clone() };
        let payload = br#"{"deviceList":[{"deviceId":9,"model":"env_temp_hum_sensor","properties":{}}]}"#;
        handler
            .handle("uiot/network_report", payload)
            .await
            .expect("handled");
        assert_eq!(hub.len().await, 3);

        let err = handler
            .handle("uiot/state_report", b"not json")
            .await
            .expect_err("invalid");
        assert!(matches!(err, IngestError::Handler(_)));
    }
}
