//! 追踪初始化、消息 ID 生成与计数指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub messages_received: u64,
    pub messages_ignored: u64,
    pub messages_invalid: u64,
    pub snapshots_applied: u64,
    pub state_changes: u64,
    pub devices_classified: u64,
    pub devices_dropped: u64,
    pub entities_created: u64,
    pub control_sent: u64,
    pub control_failed: u64,
}

/// 基础指标。
pub struct TelemetryMetrics {
    messages_received: AtomicU64,
    messages_ignored: AtomicU64,
    messages_invalid: AtomicU64,
    snapshots_applied: AtomicU64,
    state_changes: AtomicU64,
    devices_classified: AtomicU64,
    devices_dropped: AtomicU64,
    entities_created: AtomicU64,
    control_sent: AtomicU64,
    control_failed: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            messages_received: AtomicU64::new(0),
            messages_ignored: AtomicU64::new(0),
            messages_invalid: AtomicU64::new(0),
            snapshots_applied: AtomicU64::new(0),
            state_changes: AtomicU64::new(0),
            devices_classified: AtomicU64::new(0),
            devices_dropped: AtomicU64::new(0),
            entities_created: AtomicU64::new(0),
            control_sent: AtomicU64::new(0),
            control_failed: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_ignored: self.messages_ignored.load(Ordering::Relaxed),
            messages_invalid: self.messages_invalid.load(Ordering::Relaxed),
            snapshots_applied: self.snapshots_applied.load(Ordering::Relaxed),
            state_changes: self.state_changes.load(Ordering::Relaxed),
            devices_classified: self.devices_classified.load(Ordering::Relaxed),
            devices_dropped: self.devices_dropped.load(Ordering::Relaxed),
            entities_created: self.entities_created.load(Ordering::Relaxed),
            control_sent: self.control_sent.load(Ordering::Relaxed),
            control_failed: self.control_failed.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成单条入站消息的追踪 ID。
pub fn new_message_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 记录入站消息次数。
pub fn record_message_received() {
    metrics().messages_received.fetch_add(1, Ordering::Relaxed);
}

/// 记录被忽略的消息（形状不符或无匹配实体）。
pub fn record_message_ignored() {
    metrics().messages_ignored.fetch_add(1, Ordering::Relaxed);
}

/// 记录无法解析的消息。
pub fn record_message_invalid() {
    metrics().messages_invalid.fetch_add(1, Ordering::Relaxed);
}

/// 记录设备列表快照刷新次数。
pub fn record_snapshot_applied() {
    metrics().snapshots_applied.fetch_add(1, Ordering::Relaxed);
}

/// 记录实体状态变化次数。
pub fn record_state_changes(count: u64) {
    metrics().state_changes.fetch_add(count, Ordering::Relaxed);
}

/// 记录分类保留/丢弃的设备数。
pub fn record_classification(kept: u64, dropped: u64) {
    let metrics = metrics();
    metrics
        .devices_classified
        .fetch_add(kept, Ordering::Relaxed);
    metrics
        .devices_dropped
        .fetch_add(dropped, Ordering::Relaxed);
}

/// 记录新建实体数。
pub fn record_entities_created(count: u64) {
    metrics().entities_created.fetch_add(count, Ordering::Relaxed);
}

/// 记录控制下发成功次数。
pub fn record_control_sent() {
    metrics().control_sent.fetch_add(1, Ordering::Relaxed);
}

/// 记录控制下发失败次数。
pub fn record_control_failed() {
    metrics().control_failed.fetch_add(1, Ordering::Relaxed);
}
