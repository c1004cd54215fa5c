//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查：/health
//! - 认证接口：/login, /refresh-token
//! - 设备管理：/devices/*
//! - 分享工作流：/shares/*
//! - 转让工作流：/transfers/*
//! - 报告查询：/reports/*
//! - 通知设置：/notify-settings
//! - 运行指标：/metrics

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
        .route("/devices", get(list_devices).post(register_device))
        .route("/devices/:device_id", patch(patch_device))
        .route("/devices/:device_id/relation", delete(remove_user_device))
        .route("/shares", get(list_shares).post(initiate_share))
        .route("/shares/confirm", post(confirm_share))
        .route("/shares/:share_id", delete(revoke_share))
        .route("/transfers", post(initiate_transfer))
        .route("/transfers/confirm", post(confirm_transfer))
        .route("/reports/sleep", get(sleep_report))
        .route("/reports/vitals", get(vitals_stats))
        .route(
            "/notify-settings",
            get(get_notify_setting).put(update_notify_setting),
        )
        .route("/metrics", get(metrics_snapshot))
}
