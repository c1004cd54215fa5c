//! 追踪与请求 ID 生成。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub shares_initiated: u64,
    pub shares_confirmed: u64,
    pub shares_rejected: u64,
    pub transfers_confirmed: u64,
    pub relations_removed: u64,
    pub notify_published: u64,
    pub notify_failed: u64,
    pub sleep_reports_built: u64,
    pub vitals_reports_built: u64,
    pub report_latency_ms_total: u64,
    pub report_latency_ms_count: u64,
}

/// 基础指标。
pub struct TelemetryMetrics {
    shares_initiated: AtomicU64,
    shares_confirmed: AtomicU64,
    shares_rejected: AtomicU64,
    transfers_confirmed: AtomicU64,
    relations_removed: AtomicU64,
    notify_published: AtomicU64,
    notify_failed: AtomicU64,
    sleep_reports_built: AtomicU64,
    vitals_reports_built: AtomicU64,
    report_latency_ms_total: AtomicU64,
    report_latency_ms_count: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            shares_initiated: AtomicU64::new(0),
            shares_confirmed: AtomicU64::new(0),
            shares_rejected: AtomicU64::new(0),
            transfers_confirmed: AtomicU64::new(0),
            relations_removed: AtomicU64::new(0),
            notify_published: AtomicU64::new(0),
            notify_failed: AtomicU64::new(0),
            sleep_reports_built: AtomicU64::new(0),
            vitals_reports_built: AtomicU64::new(0),
            report_latency_ms_total: AtomicU64::new(0),
            report_latency_ms_count: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            shares_initiated: self.shares_initiated.load(Ordering::Relaxed),
            shares_confirmed: self.shares_confirmed.load(Ordering::Relaxed),
            shares_rejected: self.shares_rejected.load(Ordering::Relaxed),
            transfers_confirmed: self.transfers_confirmed.load(Ordering::Relaxed),
            relations_removed: self.relations_removed.load(Ordering::Relaxed),
            notify_published: self.notify_published.load(Ordering::Relaxed),
            notify_failed: self.notify_failed.load(Ordering::Relaxed),
            sleep_reports_built: self.sleep_reports_built.load(Ordering::Relaxed),
            vitals_reports_built: self.vitals_reports_built.load(Ordering::Relaxed),
            report_latency_ms_total: self.report_latency_ms_total.load(Ordering::Relaxed),
            report_latency_ms_count: self.report_latency_ms_count.load(Ordering::Relaxed),
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

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录分享发起次数。
pub fn record_share_initiated() {
    metrics().shares_initiated.fetch_add(1, Ordering::Relaxed);
}

/// 记录分享确认次数。
pub fn record_share_confirmed() {
    metrics().shares_confirmed.fetch_add(1, Ordering::Relaxed);
}

/// 记录分享拒绝/撤销次数。
pub fn record_share_rejected() {
    metrics().shares_rejected.fetch_add(1, Ordering::Relaxed);
}

/// 记录转让确认次数。
pub fn record_transfer_confirmed() {
    metrics().transfers_confirmed.fetch_add(1, Ordering::Relaxed);
}

/// 记录关系移除次数。
pub fn record_relation_removed() {
    metrics().relations_removed.fetch_add(1, Ordering::Relaxed);
}

/// 记录通知发布成功次数。
pub fn record_notify_published() {
    metrics().notify_published.fetch_add(1, Ordering::Relaxed);
}

/// 记录通知发布失败次数。
pub fn record_notify_failed() {
    metrics().notify_failed.fetch_add(1, Ordering::Relaxed);
}

/// 记录睡眠报告构建次数。
pub fn record_sleep_report_built() {
    metrics().sleep_reports_built.fetch_add(1, Ordering::Relaxed);
}

/// 记录体征报告构建次数。
pub fn record_vitals_report_built() {
    metrics().vitals_reports_built.fetch_add(1, Ordering::Relaxed);
}

/// 记录报告构建耗时（毫秒）。
pub fn record_report_latency_ms(latency_ms: u64) {
    let metrics = metrics();
    metrics
        .report_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .report_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}
