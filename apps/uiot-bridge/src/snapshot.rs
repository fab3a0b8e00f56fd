//! 设备列表快照加载。

use domain::DeviceRecord;
use std::path::Path;
use tracing::info;
use uiot_classify::ClassifyError;

/// 快照加载错误。
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("read device list failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scene list: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// 读取设备列表文件并分类。
pub async fn load_device_list(path: &Path) -> Result<Vec<DeviceRecord>, SnapshotError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let records = uiot_classify::classify(&raw)?;
    info!(
        target: "uiot.bridge",
        path = %path.display(),
        devices = records.len(),
        "device_list_loaded"
    );
    Ok(records)
}

/// 读取场景列表文件并追加到设备记录之后。
pub async fn load_scene_list(
    path: &Path,
    records: Vec<DeviceRecord>,
) -> Result<Vec<DeviceRecord>, SnapshotError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let message: serde_json::Value = serde_json::from_str(&raw)?;
    let devices = records.len();
    let records = uiot_classify::append_scenes(&message, records)?;
    info!(
        target: "uiot.bridge",
        path = %path.display(),
        scenes = records.len() - devices,
        "scene_list_loaded"
    );
    Ok(records)
}
