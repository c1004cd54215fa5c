//! 报告查询 handlers
//!
//! - GET /reports/sleep?deviceId&start&end - 睡眠报告
//! - GET /reports/vitals?deviceId&start&end - 体征分箱统计
//!
//! 权限要求：调用者必须持有该设备的关系（Normal 或 Shared）。

use crate::AppState;
use crate::middleware::require_user;
use crate::utils::response::{
    bad_request_error, no_permission_error, not_found_error, report_error,
    sleep_report_to_dto, storage_error, vitals_stats_to_dto,
};
use api_contract::{ApiResponse, ReportQuery};
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::UserContext;
use hms_storage::DeviceRecord;

/// 校验查询范围并加载设备（需调用者持有关系）。
async fn load_device_for_query(
    state: &AppState,
    ctx: &UserContext,
    query: &ReportQuery,
) -> Result<DeviceRecord, Response> {
    if query.start > query.end {
        return Err(bad_request_error("start after end"));
    }
    let device = match state.devices.find_device(&query.device_id).await {
        Ok(Some(device)) => device,
        Ok(None) => return Err(not_found_error()),
        Err(err) => return Err(storage_error(err)),
    };
    match state.relations.find(&ctx.user_id, &device.device_id).await {
        Ok(Some(_)) => Ok(device),
        Ok(None) => Err(no_permission_error()),
        Err(err) => Err(storage_error(err)),
    }
}

/// 睡眠报告查询
pub async fn sleep_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let device = match load_device_for_query(&state, &ctx, &query).await {
        Ok(device) => device,
        Err(response) => return response,
    };
    match state
        .reports
        .sleep_report(&device, query.start, query.end)
        .await
    {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(sleep_report_to_dto(report))),
        )
            .into_response(),
        Err(err) => report_error(err),
    }
}

/// 体征分箱统计查询
pub async fn vitals_stats(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let device = match load_device_for_query(&state, &ctx, &query).await {
        Ok(device) => device,
        Err(response) => return response,
    };
    match state
        .reports
        .vitals_stats(&device, query.start, query.end)
        .await
    {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(vitals_stats_to_dto(stats))),
        )
            .into_response(),
        Err(err) => report_error(err),
    }
}
