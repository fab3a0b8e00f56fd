//! 实体中枢：维护全部实体，接收快照刷新与上报消息并通知订阅方。

use async_trait::async_trait;
use domain::{DeviceId, DeviceRecord};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uiot_control::{ControlError, ControlService};
use uiot_entity::{
    ClimateCommand, ClimateEntity, Entity, InboundMessage, MessageError, entities_for,
    parse_message,
};
use uiot_telemetry::{
    record_entities_created, record_message_ignored, record_message_invalid,
    record_message_received, record_snapshot_applied, record_state_changes,
};

/// 中枢处理错误。
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("message error: {0}")]
    Message(#[from] MessageError),
    #[error("control error: {0}")]
    Control(#[from] ControlError),
    #[error("climate entity not found: {0}")]
    ClimateNotFound(String),
}

/// 实体变化订阅方。
#[async_trait]
pub trait EntitySink: Send + Sync {
    async fn entity_added(&self, entity: &Entity);

    async fn state_changed(&self, entity: &Entity);
}

/// 空订阅方（用于接线与测试）。
#[derive(Debug, Default)]
pub struct NoopSink;

#[async_trait]
impl EntitySink for NoopSink {
    async fn entity_added(&self, _entity: &Entity) {}

    async fn state_changed(&self, _entity: &Entity) {}
}

/// 以日志输出实体变化。
#[derive(Debug, Default)]
pub struct LoggingSink;

#[async_trait]
impl EntitySink for LoggingSink {
    async fn entity_added(&self, entity: &Entity) {
        info!(
            target: "uiot.pipeline",
            unique_id = %entity.unique_id(),
            name = %entity.name(),
            available = entity.available(),
            "entity_added"
        );
    }

    async fn state_changed(&self, entity: &Entity) {
        match entity {
            Entity::Climate(climate) => {
                let state = climate.state();
                info!(
                    target: "uiot.pipeline",
                    unique_id = %climate.unique_id(),
                    hvac_mode = %state.hvac_mode,
                    fan_mode = %state.fan_mode,
                    target_temperature = state.target_temperature,
                    current_temperature = ?state.current_reading(),
                    available = state.available,
                    "climate_state_changed"
                );
            }
            Entity::Sensor(sensor) => {
                info!(
                    target: "uiot.pipeline",
                    unique_id = %sensor.unique_id(),
                    value = %sensor.value(),
                    available = sensor.available(),
                    "sensor_state_changed"
                );
            }
        }
    }
}

#[derive(Default)]
struct HubState {
    entities: Vec<Entity>,
    devices: HashSet<DeviceId>,
}

impl HubState {
    /// 为尚未出现过的设备创建实体，返回新实体。
    fn add_records(&mut self, records: &[DeviceRecord]) -> Vec<Entity> {
        let mut added = Vec::new();
        for record in records {
            if self.devices.contains(&record.device_id) {
                continue;
            }
            let entities = entities_for(record);
            if entities.is_empty() {
                continue;
            }
            self.devices.insert(record.device_id.clone());
            added.extend(entities.iter().cloned());
            self.entities.extend(entities);
        }
        added
    }

    fn climate(&self, unique_id: &str) -> Option<&ClimateEntity> {
        self.entities.iter().find_map(|entity| match entity {
            Entity::Climate(climate) if climate.unique_id() == unique_id => Some(climate),
            _ => None,
        })
    }

    /// 把消息分发给全部实体，返回状态发生变化的实体。
    fn dispatch(&mut self, message: &InboundMessage) -> Vec<Entity> {
        self.entities
            .iter_mut()
            .filter_map(|entity| entity.apply(message).then(|| entity.clone()))
            .collect()
    }
}

struct HubInner {
    sink: Arc<dyn EntitySink>,
    state: Mutex<HubState>,
}

/// 实体中枢。克隆共享同一份状态；消息在锁内串行合并。
#[derive(Clone)]
pub struct EntityHub {
    inner: Arc<HubInner>,
}

impl EntityHub {
    pub fn new(sink: Arc<dyn EntitySink>) -> Self {
        Self {
            inner: Arc::new(HubInner {
                sink,
                state: Mutex::new(HubState::default()),
            }),
        }
    }

    /// 应用一份设备列表快照，返回新建实体数。已存在的设备不重复创建。
    pub async fn on_snapshot(&self, records: &[DeviceRecord]) -> usize {
        let mut state = self.inner.state.lock().await;
        let added = state.add_records(records);
        drop(state);

        record_snapshot_applied();
        record_entities_created(added.len() as u64);
        info!(
            target: "uiot.pipeline",
            records = records.len(),
            entities_created = added.len(),
            "snapshot_applied"
        );
        for entity in &added {
            self.inner.sink.entity_added(entity).await;
        }
        added.len()
    }

    /// 解析并分发一条消息，返回状态变化实体的唯一标识。
    /// 解析失败时不做任何修改。
    pub async fn on_message(
        &self,
        topic: &str,
        payload: &[u8],
    ) -> Result<Vec<String>, PipelineError> {
        record_message_received();
        let message = match parse_message(topic, payload) {
            Ok(message) => message,
            Err(err) => {
                record_message_invalid();
                warn!(target: "uiot.pipeline", topic = %topic, error = %err, "message rejected");
                return Err(err.into());
            }
        };

        match message {
            InboundMessage::Ignored => {
                record_message_ignored();
                debug!(target: "uiot.pipeline", topic = %topic, "message ignored");
                Ok(Vec::new())
            }
            InboundMessage::Snapshot(payload) => {
                let records = uiot_classify::classify_value(&payload);
                self.on_snapshot(&records).await;
                Ok(Vec::new())
            }
            message => {
                let mut state = self.inner.state.lock().await;
                let changed = state.dispatch(&message);
                drop(state);

                record_state_changes(changed.len() as u64);
                debug!(
                    target: "uiot.pipeline",
                    topic = %topic,
                    changed = changed.len(),
                    "message_applied"
                );
                let mut ids = Vec::with_capacity(changed.len());
                for entity in &changed {
                    self.inner.sink.state_changed(entity).await;
                    ids.push(entity.unique_id().to_string());
                }
                Ok(ids)
            }
        }
    }

    /// 当前全部实体的快照副本。
    pub async fn entities(&self) -> Vec<Entity> {
        self.inner.state.lock().await.entities.clone()
    }

    pub async fn entity(&self, unique_id: &str) -> Option<Entity> {
        let state = self.inner.state.lock().await;
        state
            .entities
            .iter()
            .find(|entity| entity.unique_id() == unique_id)
            .cloned()
    }

    /// 在锁内修改指定的实体，返回闭包结果；实体不存在时返回 None。
    /// 修改导致状态变化时通知订阅方。
    pub async fn update<R>(
        &self,
        unique_id: &str,
        update: impl FnOnce(&mut Entity) -> R,
    ) -> Option<R> {
        let mut state = self.inner.state.lock().await;
        let entity = state
            .entities
            .iter_mut()
            .find(|entity| entity.unique_id() == unique_id)?;
        let before = entity.clone();
        let result = update(&mut *entity);
        let changed = (*entity != before).then(|| entity.clone());
        drop(state);

        if let Some(entity) = changed {
            self.notify_changed(&entity).await;
        }
        Some(result)
    }

    /// 对空调实体执行指令：锁内规划，释放锁后下发，全部成功再做乐观更新。
    /// 返回本地状态是否变化；下发失败时状态不变。
    pub async fn execute_climate(
        &self,
        control: &ControlService,
        unique_id: &str,
        command: ClimateCommand,
    ) -> Result<bool, PipelineError> {
        let (device_id, patches) = {
            let state = self.inner.state.lock().await;
            match state.climate(unique_id) {
                Some(climate) => (climate.device_id().clone(), climate.plan(command)),
                None => return Err(PipelineError::ClimateNotFound(unique_id.to_string())),
            }
        };

        control.send_plan(&device_id, command, &patches).await?;

        let changed = self
            .update(unique_id, |entity| match entity {
                Entity::Climate(climate) => climate.apply_optimistic(command),
                Entity::Sensor(_) => false,
            })
            .await;
        Ok(changed.unwrap_or(false))
    }

    async fn notify_changed(&self, entity: &Entity) {
        record_state_changes(1);
        debug!(
            target: "uiot.pipeline",
            unique_id = %entity.unique_id(),
            "entity_updated"
        );
        self.inner.sink.state_changed(entity).await;
    }

    pub async fn len(&self) -> usize {
        self.inner.state.lock().await.entities.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
