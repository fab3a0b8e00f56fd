use async_trait::async_trait;
use domain::{DeviceId, PropertyMap};
use std::sync::Arc;
use tracing::{info, warn};
use uiot_entity::{ClimateCommand, ClimateEntity, ControlPatch};
use uiot_telemetry::{new_message_id, record_control_failed, record_control_sent};

/// 控制链路错误。
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("dispatch error: {0}")]
    Dispatch(String),
}

/// 属性下发抽象（厂商控制接口）。
#[async_trait]
pub trait ControlClient: Send + Sync {
    async fn send_control(
        &self,
        device_id: &DeviceId,
        properties: &PropertyMap,
    ) -> Result<(), ControlError>;
}

/// 空下发器（用于占位）。
#[derive(Debug, Default)]
pub struct NoopControlClient;

#[async_trait]
impl ControlClient for NoopControlClient {
    async fn send_control(
        &self,
        _device_id: &DeviceId,
        _properties: &PropertyMap,
    ) -> Result<(), ControlError> {
        Ok(())
    }
}

/// 控制服务：规划补丁、按序下发、成功后做乐观更新。
#[derive(Clone)]
pub struct ControlService {
    client: Arc<dyn ControlClient>,
}

impl ControlService {
    pub fn new(client: Arc<dyn ControlClient>) -> Self {
        Self { client }
    }

    /// 执行空调指令。遇到第一个失败立即返回，不重试，也不更新本地状态。
    /// 成功时返回本地状态是否因乐观更新而变化。
    pub async fn execute_climate(
        &self,
        climate: &mut ClimateEntity,
        command: ClimateCommand,
    ) -> Result<bool, ControlError> {
        let patches = climate.plan(command);
        self.send_plan(climate.device_id(), command, &patches).await?;
        Ok(climate.apply_optimistic(command))
    }

    /// 按序下发已规划的补丁，遇到第一个失败立即返回。
    pub async fn send_plan(
        &self,
        device_id: &DeviceId,
        command: ClimateCommand,
        patches: &[ControlPatch],
    ) -> Result<(), ControlError> {
        let command_id = new_message_id();
        info!(
            target: "uiot.control",
            command_id = %command_id,
            device_id = %device_id,
            command = ?command,
            patches = patches.len(),
            "climate_command_planned"
        );

        for patch in patches {
            match self
                .client
                .send_control(&patch.device_id, &patch.properties)
                .await
            {
                Ok(()) => {
                    record_control_sent();
                    info!(
                        target: "uiot.control",
                        command_id = %command_id,
                        device_id = %patch.device_id,
                        properties = ?patch.properties,
                        "control_sent"
                    );
                }
                Err(err) => {
                    record_control_failed();
                    warn!(
                        target: "uiot.control",
                        command_id = %command_id,
                        device_id = %patch.device_id,
                        error = %err,
                        "control_failed"
                    );
                    return Err(err);
                }
            }
        }
        Ok(())
    }
}
