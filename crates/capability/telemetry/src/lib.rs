//! 追踪、请求 ID 生成与进程级计数器。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 计数器快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub dashboards_served: u64,
    pub degraded_queries: u64,
    pub issues_submitted: u64,
    pub issues_resolved: u64,
    pub issues_reopened: u64,
    pub searches: u64,
    pub image_uploads: u64,
}

/// 进程级计数器。
pub struct TelemetryMetrics {
    dashboards_served: AtomicU64,
    degraded_queries: AtomicU64,
    issues_submitted: AtomicU64,
    issues_resolved: AtomicU64,
    issues_reopened: AtomicU64,
    searches: AtomicU64,
    image_uploads: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            dashboards_served: AtomicU64::new(0),
            degraded_queries: AtomicU64::new(0),
            issues_submitted: AtomicU64::new(0),
            issues_resolved: AtomicU64::new(0),
            issues_reopened: AtomicU64::new(0),
            searches: AtomicU64::new(0),
            image_uploads: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            dashboards_served: self.dashboards_served.load(Ordering::Relaxed),
            degraded_queries: self.degraded_queries.load(Ordering::Relaxed),
            issues_submitted: self.issues_submitted.load(Ordering::Relaxed),
            issues_resolved: self.issues_resolved.load(Ordering::Relaxed),
            issues_reopened: self.issues_reopened.load(Ordering::Relaxed),
            searches: self.searches.load(Ordering::Relaxed),
            image_uploads: self.image_uploads.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局计数器实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info，可由 RUST_LOG 覆盖）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录仪表盘返回次数。
pub fn record_dashboard_served() {
    metrics().dashboards_served.fetch_add(1, Ordering::Relaxed);
}

/// 记录并行子查询降级次数。
pub fn record_degraded_query() {
    metrics().degraded_queries.fetch_add(1, Ordering::Relaxed);
}

pub fn record_issue_submitted() {
    metrics().issues_submitted.fetch_add(1, Ordering::Relaxed);
}

pub fn record_issue_resolved() {
    metrics().issues_resolved.fetch_add(1, Ordering::Relaxed);
}

pub fn record_issue_reopened() {
    metrics().issues_reopened.fetch_add(1, Ordering::Relaxed);
}

pub fn record_search() {
    metrics().searches.fetch_add(1, Ordering::Relaxed);
}

/// 记录房间图片上传成功次数。
pub fn record_image_upload() {
    metrics().image_uploads.fetch_add(1, Ordering::Relaxed);
}
