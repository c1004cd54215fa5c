//! 分享/转让工作流 handlers
//!
//! - POST /shares - 发起分享（waitConfirm=false 时立即生效）
//! - POST /shares/confirm - 接收方确认或拒绝分享
//! - DELETE /shares/{id} - 发起方撤销分享
//! - GET /shares - 列出与调用者相关的分享
//! - POST /transfers - 发起归属转让
//! - POST /transfers/confirm - 接收方确认或拒绝转让
//!
//! 状态机语义见 hms-ownership；此处只做参数验证与错误映射。

use crate::AppState;
use crate::middleware::require_user;
use crate::utils::response::{
    ownership_error, share_to_dto, storage_error, transfer_to_dto,
};
use crate::utils::{normalize_optional, normalize_required};
use api_contract::{
    ApiResponse, ConfirmShareRequest, ConfirmTransferRequest, InitiateShareRequest,
    InitiateTransferRequest, ShareDto,
};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

#[derive(serde::Deserialize)]
pub struct SharePath {
    share_id: String,
}

/// 发起分享
pub async fn initiate_share(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<InitiateShareRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let to_user_id = match normalize_required(req.to_user_id, "toUserId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let device_id = match normalize_required(req.device_id, "deviceId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let remark = match normalize_optional(req.remark, "remark") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let wait_confirm = req.wait_confirm.unwrap_or(true);
    match state
        .ownership
        .initiate_share(&ctx, &to_user_id, &device_id, remark, wait_confirm)
        .await
    {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::success(share_to_dto(record))),
        )
            .into_response(),
        Err(err) => ownership_error(err),
    }
}

/// 确认或拒绝分享
pub async fn confirm_share(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ConfirmShareRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let device_id = match normalize_required(req.device_id, "deviceId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .ownership
        .confirm_share(&ctx, &device_id, req.accept)
        .await
    {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::success(share_to_dto(record))),
        )
            .into_response(),
        Err(err) => ownership_error(err),
    }
}

/// 撤销分享
pub async fn revoke_share(
    State(state): State<AppState>,
    Path(path): Path<SharePath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.ownership.revoke_share(&ctx, &path.share_id).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(err) => ownership_error(err),
    }
}

/// 列出与调用者相关的分享
pub async fn list_shares(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.shares.list_for_user(&ctx.user_id).await {
        Ok(items) => {
            let data: Vec<ShareDto> = items.into_iter().map(share_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 发起归属转让
pub async fn initiate_transfer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<InitiateTransferRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let to_user_id = match normalize_required(req.to_user_id, "toUserId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let device_id = match normalize_required(req.device_id, "deviceId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let remark = match normalize_optional(req.remark, "remark") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .ownership
        .initiate_transfer(&ctx, &to_user_id, &device_id, remark)
        .await
    {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::success(transfer_to_dto(record))),
        )
            .into_response(),
        Err(err) => ownership_error(err),
    }
}

/// 确认或拒绝转让
pub async fn confirm_transfer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ConfirmTransferRequest>,
) -> Response {
    let ctx = match require_user(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let device_id = match normalize_required(req.device_id, "deviceId") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .ownership
        .confirm_transfer(&ctx, &device_id, req.accept)
        .await
    {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::success(transfer_to_dto(record))),
        )
            .into_response(),
        Err(err) => ownership_error(err),
    }
}
