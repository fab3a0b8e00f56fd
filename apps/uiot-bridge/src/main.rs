//! UIOT 桥接运行时：加载设备快照、订阅上报并维护实体状态。

mod ingest;
mod snapshot;

use std::sync::Arc;
use tracing::{info, warn};
use uiot_config::AppConfig;
use uiot_pipeline::{EntityHub, LoggingSink};
use uiot_telemetry::{init_tracing, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // 实体中枢：变化以日志输出
    let hub = EntityHub::new(Arc::new(LoggingSink));

    // 启动快照：配置了设备列表文件时先建立实体
    let mut records = match config.device_list_path.as_deref() {
        Some(path) => snapshot::load_device_list(path).await?,
        None => Vec::new(),
    };
    if let Some(path) = config.scene_list_path.as_deref() {
        records = snapshot::load_scene_list(path, records).await?;
    }
    if !records.is_empty() {
        hub.on_snapshot(&records).await;
    }
    info!(target: "uiot.bridge", entities = hub.len().await, "bridge_started");

    // 上报接入：在后台任务中串行投递到中枢
    let ingest = ingest::spawn_ingest(&config, hub.clone());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!(target: "uiot.bridge", "shutdown requested");
        }
        // 未启用接入时占位源立即返回，桥接只完成快照后退出
        result = ingest => match result {
            Ok(()) => info!(target: "uiot.bridge", "ingest finished"),
            Err(err) => warn!(target: "uiot.bridge", error = %err, "ingest task aborted"),
        }
    }

    let snapshot = metrics().snapshot();
    info!(
        target: "uiot.bridge",
        messages_received = snapshot.messages_received,
        state_changes = snapshot.state_changes,
        entities_created = snapshot.entities_created,
        "bridge_stopped"
    );
    Ok(())
}
