//! 设备 handlers
//!
//! 提供设备注册与管理接口：
//! - POST /devices - 注册设备（按 mac upsert，首次注册绑定拥有者）
//! - GET /devices - 列出调用者的设备及关系类型
//! - PATCH /devices/{id} - 部分更新设备（仅拥有者）
//! - DELETE /devices/{id}/relation - 移除调用者与设备的关系
//!
//! 权限要求：
//! - 所有接口需要 Bearer token 认证
//! - 更新设备需要 Normal 关系（拥有者）

use crate::AppState;
use crate::middleware::require_user;
use crate::utils::response::{
    bad_request_error, device_to_dto, no_permission_error, ownership_error, storage_error,
};
use crate::utils::{normalize_optional, normalize_required, parse_device_kind};
use api_contract::{ApiResponse, DeviceDto, PatchDeviceRequest, RegisterDeviceRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::RelationFlag;
use hms_ownership::RegisterDevice;
use hms_storage::DevicePatch;

#[derive(serde::Deserialize)]
pub struct DevicePath {
    device_id: String,
}

/// 注册设备
///
/// 按 mac 幂等注册：首次创建设备并绑定调用者为拥有者；重复注册
/// 更新设备字段。已有其他拥有者时返回 409。
pub async fn register_device(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterDeviceRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let mac = match normalize_required(req.mac, "mac") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let name = match normalize_required(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let kind = match parse_device_kind(&req.kind, "kind") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let input = RegisterDevice {
        mac,
        name,
        kind,
        remark: req.remark,
    };
    match state.ownership.register_device(&ctx, input).await {
        Ok(device) => {
            let relation = match state
                .relations
                .find(&ctx.user_id, &device.device_id)
                .await
            {
                Ok(relation) => relation.map(|item| item.flag),
                Err(err) => return storage_error(err),
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(device_to_dto(device, relation))),
            )
                .into_response()
        }
        Err(err) => ownership_error(err),
    }
}

/// 列出调用者的设备
pub async fn list_devices(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let relations = match state.relations.list_for_user(&ctx.user_id).await {
        Ok(relations) => relations,
        Err(err) => return storage_error(err),
    };
    let mut data: Vec<DeviceDto> = Vec::with_capacity(relations.len());
    for relation in relations {
        match state.devices.find_device(&relation.device_id).await {
            Ok(Some(device)) => data.push(device_to_dto(device, Some(relation.flag))),
            // 关系指向的设备已不存在时跳过该行
            Ok(None) => {}
            Err(err) => return storage_error(err),
        }
    }
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 部分更新设备（仅拥有者）
pub async fn patch_device(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
    Json(req): Json<PatchDeviceRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.relations.find(&ctx.user_id, &path.device_id).await {
        Ok(Some(relation)) if relation.flag == RelationFlag::Normal => {}
        Ok(_) => return no_permission_error(),
        Err(err) => return storage_error(err),
    }
    let name = match normalize_optional(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let kind = match req.kind {
        Some(value) => match parse_device_kind(&value, "kind") {
            Ok(kind) => Some(kind),
            Err(response) => return response,
        },
        None => None,
    };
    let remark = req.remark;
    let patch = DevicePatch { name, kind, remark };
    if patch.is_empty() {
        return bad_request_error("empty update");
    }
    match state.devices.update_device(&path.device_id, patch).await {
        Ok(Some(device)) => {
            let dto = device_to_dto(device, Some(RelationFlag::Normal));
            (StatusCode::OK, Json(ApiResponse::success(dto))).into_response()
        }
        Ok(None) => crate::utils::response::not_found_error(),
        Err(err) => storage_error(err),
    }
}

/// 移除调用者与设备的关系
///
/// 拥有者解绑会级联清理分享授权、转让记录、总览缓存与设备主题订阅。
pub async fn remove_user_device(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state
        .ownership
        .remove_user_device(&ctx, &path.device_id)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(err) => ownership_error(err),
    }
}
