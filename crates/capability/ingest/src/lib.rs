use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 接入错误。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("handler error: {0}")]
    Handler(String),
    #[error("source error: {0}")]
    Source(String),
}

/// 上报消息处理器，按到达顺序串行调用。
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, topic: &str, payload: &[u8]) -> Result<(), IngestError>;
}

/// 接入源抽象。
#[async_trait]
pub trait Source: Send + Sync {
    async fn run(&self, handler: Arc<dyn MessageHandler>) -> Result<(), IngestError>;
}

/// 占位源（用于接线与测试）。
#[derive(Debug, Default)]
pub struct NoopSource;

#[async_trait]
impl Source for NoopSource {
    async fn run(&self, _handler: Arc<dyn MessageHandler>) -> Result<(), IngestError> {
        Ok(())
    }
}

/// MQTT 接入源配置。
#[derive(Debug, Clone)]
pub struct MqttSourceConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub topic_prefix: String,
    pub qos: u8,
}

impl MqttSourceConfig {
    /// 订阅过滤器：前缀下的全部主题。
    pub fn topic_filter(&self) -> String {
        let prefix = self.topic_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            "#".to_string()
        } else {
            format!("{}/#", prefix)
        }
    }
}

/// MQTT 接入源：订阅状态上报、在线上报与网络上报，逐条交给处理器。
#[derive(Debug, Clone)]
pub struct MqttSource {
    config: MqttSourceConfig,
}

impl MqttSource {
    pub fn new(config: MqttSourceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MqttSourceConfig {
        &self.config
    }
}

#[async_trait]
impl Source for MqttSource {
    async fn run(&self, handler: Arc<dyn MessageHandler>) -> Result<(), IngestError> {
        let client_id = format!("uiot-bridge-{}", uuid::Uuid::new_v4());
        let mut options = MqttOptions::new(client_id, self.config.host.clone(), self.config.port);
        options.set_keep_alive(Duration::from_secs(30));
        if let (Some(username), Some(password)) =
            (self.config.username.as_ref(), self.config.password.as_ref())
        {
            options.set_credentials(username, password);
        }

        let (client, mut eventloop) = AsyncClient::new(options, 10);
        let topic = self.config.topic_filter();
        client
            .subscribe(topic.clone(), qos_from_u8(self.config.qos))
            .await
            .map_err(|err| IngestError::Source(err.to_string()))?;
        info!(
            target: "uiot.ingest",
            host = %self.config.host,
            port = self.config.port,
            topic = %topic,
            "mqtt_subscribed"
        );

        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    debug!(
                        target: "uiot.ingest",
                        topic = %publish.topic,
                        payload_size = publish.payload.len(),
                        "mqtt_message_received"
                    );
                    if let Err(err) = handler.handle(&publish.topic, &publish.payload).await {
                        warn!(
                            target: "uiot.ingest",
                            topic = %publish.topic,
                            error = %err,
                            "message handler failed"
                        );
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(target: "uiot.ingest", "mqtt ingest eventloop error: {}", err);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }
}

fn qos_from_u8(value: u8) -> QoS {
    match value {
        0 => QoS::AtMostOnce,
        1 => QoS::AtLeastOnce,
        2 => QoS::ExactlyOnce,
        _ => QoS::AtLeastOnce,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    fn config(prefix: &str) -> MqttSourceConfig {
        MqttSourceConfig {
            host: "127.0.0.1".to_string(),
            port: 1883,
            username: None,
            password: None,
            topic_prefix: prefix.to_string(),
            qos: 1,
        }
    }

    #[test]
    fn topic_filter_appends_wildcard() {
        assert_eq!(config("uiot/home/").topic_filter(), "uiot/home/#");
        assert_eq!(config("").topic_filter(), "#");
    }

    #[test]
    fn qos_falls_back_to_at_least_once() {
        assert_eq!(qos_from_u8(0), QoS::AtMostOnce);
        assert_eq!(qos_from_u8(2), QoS::ExactlyOnce);
        assert_eq!(qos_from_u8(9), QoS::AtLeastOnce);
    }

    #[derive(Default)]
    struct CountingHandler {
        topics: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MessageHandler for CountingHandler {
        async fn handle(&self, topic: &str, _payload: &[u8]) -> Result<(), IngestError> {
            self.topics.lock().await.push(topic.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn noop_source_returns_without_messages() {
        let handler = Arc::new(CountingHandler::default());
        NoopSource.run(handler.clone()).await.expect("noop run");
        assert!(handler.topics.lock().await.is_empty());
    }
}
