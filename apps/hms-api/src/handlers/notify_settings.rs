//! 通知设置 handlers
//!
//! - GET /notify-settings?deviceId - 查询调用者在该设备上的通知设置
//! - PUT /notify-settings - 部分更新（不存在时以默认值创建再应用更新）

use crate::AppState;
use crate::middleware::require_user;
use crate::utils::normalize_required;
use crate::utils::response::{
    no_permission_error, notify_setting_to_dto, storage_error,
};
use api_contract::{ApiResponse, UpdateNotifySettingRequest};
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use hms_storage::{NotifySettingRecord, NotifySettingUpdate};

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifySettingQuery {
    device_id: String,
}

/// 查询通知设置（未配置时返回默认值，不落库）
pub async fn get_notify_setting(
    State(state): State<AppState>,
    Query(query): Query<NotifySettingQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state
        .relations
        .find(&ctx.user_id, &query.device_id)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => return no_permission_error(),
        Err(err) => return storage_error(err),
    }
    match state
        .notify_settings
        .find(&ctx.user_id, &query.device_id)
        .await
    {
        Ok(Some(record)) => (
            StatusCode::OK,
            Json(ApiResponse::success(notify_setting_to_dto(record))),
        )
            .into_response(),
        Ok(None) => {
            let record = NotifySettingRecord::default_for(&ctx.user_id, &query.device_id);
            (
                StatusCode::OK,
                Json(ApiResponse::success(notify_setting_to_dto(record))),
            )
                .into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 更新通知设置
pub async fn update_notify_setting(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UpdateNotifySettingRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let device_id = match normalize_required(req.device_id, "deviceId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state.relations.find(&ctx.user_id, &device_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return no_permission_error(),
        Err(err) => return storage_error(err),
    }
    let update = NotifySettingUpdate {
        alarm_enabled: req.alarm_enabled,
        heart_rate_high: req.heart_rate_high,
        heart_rate_low: req.heart_rate_low,
        leave_bed_alarm: req.leave_bed_alarm,
    };
    let updated = state
        .notify_settings
        .update(&ctx.user_id, &device_id, update.clone())
        .await;
    match updated {
        Ok(Some(record)) => (
            StatusCode::OK,
            Json(ApiResponse::success(notify_setting_to_dto(record))),
        )
            .into_response(),
        Ok(None) => {
            // 首次配置：以默认值为基础应用本次更新
            let mut record = NotifySettingRecord::default_for(&ctx.user_id, &device_id);
            if let Some(alarm_enabled) = update.alarm_enabled {
                record.alarm_enabled = alarm_enabled;
            }
            if let Some(high) = update.heart_rate_high {
                record.heart_rate_high = Some(high);
            }
            if let Some(low) = update.heart_rate_low {
                record.heart_rate_low = Some(low);
            }
            if let Some(leave_bed_alarm) = update.leave_bed_alarm {
                record.leave_bed_alarm = leave_bed_alarm;
            }
            match state.notify_settings.insert(record).await {
                Ok(record) => (
                    StatusCode::OK,
                    Json(ApiResponse::success(notify_setting_to_dto(record))),
                )
                    .into_response(),
                Err(err) => storage_error(err),
            }
        }
        Err(err) => storage_error(err),
    }
}
