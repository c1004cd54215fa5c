//! 运行指标 handler
//!
//! - GET /metrics - 指标快照（JSON 计数器）

use axum::{Json, response::IntoResponse};
use hms_telemetry::metrics;

/// 指标快照
pub async fn metrics_snapshot() -> impl IntoResponse {
    let snapshot = metrics().snapshot();
    Json(serde_json::json!({
        "sharesInitiated": snapshot.shares_initiated,
        "sharesConfirmed": snapshot.shares_confirmed,
        "sharesRejected": snapshot.shares_rejected,
        "transfersConfirmed": snapshot.transfers_confirmed,
        "relationsRemoved": snapshot.relations_removed,
        "notifyPublished": snapshot.notify_published,
        "notifyFailed": snapshot.notify_failed,
        "sleepReportsBuilt": snapshot.sleep_reports_built,
        "vitalsReportsBuilt": snapshot.vitals_reports_built,
        "reportLatencyMsTotal": snapshot.report_latency_ms_total,
        "reportLatencyMsCount": snapshot.report_latency_ms_count,
    }))
}
