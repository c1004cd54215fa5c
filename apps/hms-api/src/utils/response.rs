//! HTTP 响应辅助函数和 DTO 转换
//!
//! 提供统一的错误响应构造函数和 DTO 转换函数：
//! - 错误响应：auth_error, bad_request_error, not_found_error,
//!   no_permission_error, ownership_error, report_error, storage_error
//! - DTO 转换：device_to_dto, share_to_dto, transfer_to_dto,
//!   sleep_report_to_dto, vitals_stats_to_dto, notify_setting_to_dto
//!
//! 设计原则：
//! - 所有错误返回统一的 ApiResponse 格式
//! - HTTP 状态码与错误码对应
//! - DTO 转换保持 Record 和 DTO 字段一致

use api_contract::{
    ApiResponse, DeviceDto, NotifySettingDto, ShareDto, SleepReportDto, SleepSessionDto,
    StageSegmentDto, TransferDto, VitalsStatsDto, VitalsWindowDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::RelationFlag;
use hms_auth::AuthError;
use hms_ownership::OwnershipError;
use hms_report::{ReportError, SleepReport, VitalsStats};
use hms_storage::{
    DeviceRecord, NotifySettingRecord, ShareRecord, StorageError, TransferRecord,
};

/// 认证错误响应
pub fn auth_error(status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()>::error(
            "AUTH.UNAUTHORIZED",
            "unauthorized",
        )),
    )
        .into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("PARAM.INVALID", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("DATA.NOT_FOUND", "not found")),
    )
        .into_response()
}

/// 无权限错误响应
pub fn no_permission_error() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::<()>::error(
            "RELATION.NO_PERMISSION",
            "no permission",
        )),
    )
        .into_response()
}

/// 认证内部错误响应
pub fn internal_auth_error(err: AuthError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// 归属操作错误响应
pub fn ownership_error(err: OwnershipError) -> Response {
    let message = err.to_string();
    let (status, code) = match &err {
        OwnershipError::SameUser => (StatusCode::BAD_REQUEST, "SHARE.SAME_USER"),
        OwnershipError::NotFound(_) => (StatusCode::NOT_FOUND, "DATA.NOT_FOUND"),
        OwnershipError::Duplicate => (StatusCode::CONFLICT, "SHARE.REPEAT"),
        OwnershipError::AlreadyBound => (StatusCode::CONFLICT, "RELATION.ALREADY_BOUND"),
        OwnershipError::NoPermission => (StatusCode::FORBIDDEN, "RELATION.NO_PERMISSION"),
        OwnershipError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL.ERROR"),
    };
    (status, Json(ApiResponse::<()>::error(code, message))).into_response()
}

/// 报告构建错误响应
pub fn report_error(err: ReportError) -> Response {
    let message = err.to_string();
    match err {
        ReportError::Unsupported(_) => bad_request_error(message),
        ReportError::Storage(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
        )
            .into_response(),
    }
}

/// DeviceRecord 转 DeviceDto
pub fn device_to_dto(record: DeviceRecord, relation: Option<RelationFlag>) -> DeviceDto {
    DeviceDto {
        device_id: record.device_id,
        mac: record.mac,
        name: record.name,
        kind: record.kind.as_str().to_string(),
        remark: record.remark,
        relation: relation.map(|flag| flag.as_str().to_string()),
    }
}

/// ShareRecord 转 ShareDto
pub fn share_to_dto(record: ShareRecord) -> ShareDto {
    ShareDto {
        share_id: record.share_id,
        from_user_id: record.from_user_id,
        to_user_id: record.to_user_id,
        device_id: record.device_id,
        remark: record.remark,
        confirm: record.confirm.as_str().to_string(),
    }
}

/// TransferRecord 转 TransferDto
pub fn transfer_to_dto(record: TransferRecord) -> TransferDto {
    TransferDto {
        transfer_id: record.transfer_id,
        from_user_id: record.from_user_id,
        to_user_id: record.to_user_id,
        device_id: record.device_id,
        remark: record.remark,
        confirm: record.confirm.as_str().to_string(),
    }
}

/// SleepReport 转 SleepReportDto
pub fn sleep_report_to_dto(report: SleepReport) -> SleepReportDto {
    SleepReportDto {
        start_time: report.start_time,
        end_time: report.end_time,
        sleep_num: report.sleep_num,
        sleep_light: report.sleep_light,
        sleep_deep: report.sleep_deep,
        sleep_long: report.sleep_long,
        awake_long: report.awake_long,
        turn_over: report.turn_over,
        leave_bed_num: report.leave_bed_num,
        leave_bed_time: report.leave_bed_time,
        sleep_time_list: report
            .sleep_time_list
            .into_iter()
            .map(|session| SleepSessionDto {
                begin: session.begin,
                end: session.end,
            })
            .collect(),
        stages_sleep_time: report
            .stages_sleep_time
            .into_iter()
            .map(|segment| StageSegmentDto {
                stage: segment.stage.as_str().to_string(),
                begin: segment.begin,
                end: segment.end,
            })
            .collect(),
    }
}

/// VitalsStats 转 VitalsStatsDto
pub fn vitals_stats_to_dto(stats: VitalsStats) -> VitalsStatsDto {
    VitalsStatsDto {
        avg_heart_rate: stats.avg_heart_rate,
        avg_breath_rate: stats.avg_breath_rate,
        avg_physical: stats.avg_physical,
        max_heart_rate: stats.max_heart_rate,
        max_breath_rate: stats.max_breath_rate,
        max_physical: stats.max_physical,
        windows: stats
            .windows
            .into_iter()
            .map(|window| VitalsWindowDto {
                begin: window.begin,
                heart_high: window.heart_high,
                heart_low: window.heart_low,
                breath_high: window.breath_high,
                breath_low: window.breath_low,
                physical_high: window.physical_high,
                physical_low: window.physical_low,
            })
            .collect(),
    }
}

/// NotifySettingRecord 转 NotifySettingDto
pub fn notify_setting_to_dto(record: NotifySettingRecord) -> NotifySettingDto {
    NotifySettingDto {
        user_id: record.user_id,
        device_id: record.device_id,
        alarm_enabled: record.alarm_enabled,
        heart_rate_high: record.heart_rate_high,
        heart_rate_low: record.heart_rate_low,
        leave_bed_alarm: record.leave_bed_alarm,
    }
}
