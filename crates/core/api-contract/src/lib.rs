//! 稳定的 DTO 与 API 响应契约。

use serde::{Deserialize, Serialize};

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 登录请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 登录响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires: u64,
    pub user_id: String,
    pub username: String,
}

/// 刷新 token 请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(alias = "refresh_token")]
    pub refresh_token: String,
}

/// 刷新 token 响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires: u64,
}

/// 设备注册请求体（按 mac 幂等注册）。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceRequest {
    pub mac: String,
    pub name: String,
    pub kind: String,
    pub remark: Option<String>,
}

/// 设备部分更新请求体。
///
/// 字段缺省即不修改；至少需提供一个字段。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchDeviceRequest {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub remark: Option<String>,
}

/// 设备返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDto {
    pub device_id: String,
    pub mac: String,
    pub name: String,
    pub kind: String,
    pub remark: Option<String>,
    /// 调用者对该设备的关系：normal | shared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

/// 分享发起请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateShareRequest {
    pub to_user_id: String,
    pub device_id: String,
    pub remark: Option<String>,
    /// false 时跳过待确认状态，立即生效
    pub wait_confirm: Option<bool>,
}

/// 分享确认请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmShareRequest {
    pub device_id: String,
    pub accept: bool,
}

/// 分享记录返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareDto {
    pub share_id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub device_id: String,
    pub remark: Option<String>,
    pub confirm: String,
}

/// 转让发起请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateTransferRequest {
    pub to_user_id: String,
    pub device_id: String,
    pub remark: Option<String>,
}

/// 转让确认请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmTransferRequest {
    pub device_id: String,
    pub accept: bool,
}

/// 转让记录返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDto {
    pub transfer_id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub device_id: String,
    pub remark: Option<String>,
    pub confirm: String,
}

/// 睡眠报告查询参数。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub device_id: String,
    /// 起始时间（epoch 秒，含）
    pub start: i64,
    /// 结束时间（epoch 秒，含）
    pub end: i64,
}

/// 睡眠阶段片段。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSegmentDto {
    /// awake | light | deep
    pub stage: String,
    pub begin: i64,
    pub end: i64,
}

/// 单次睡眠会话。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSessionDto {
    pub begin: i64,
    pub end: i64,
}

/// 睡眠报告返回结构（按查询即时聚合，不持久化）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepReportDto {
    pub start_time: i64,
    pub end_time: i64,
    pub sleep_num: u32,
    /// 浅睡累计（秒）
    pub sleep_light: i64,
    /// 深睡累计（秒）
    pub sleep_deep: i64,
    /// 睡眠累计 = 浅睡 + 深睡（秒）
    pub sleep_long: i64,
    /// 清醒累计（秒）
    pub awake_long: i64,
    pub turn_over: u32,
    pub leave_bed_num: u32,
    pub leave_bed_time: Vec<i64>,
    pub sleep_time_list: Vec<SleepSessionDto>,
    pub stages_sleep_time: Vec<StageSegmentDto>,
}

/// 单个半小时窗口的体征高低值。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsWindowDto {
    pub begin: i64,
    pub heart_high: i32,
    pub heart_low: i32,
    pub breath_high: i32,
    pub breath_low: i32,
    pub physical_high: i32,
    pub physical_low: i32,
}

/// 体征分箱统计返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsStatsDto {
    pub avg_heart_rate: i64,
    pub avg_breath_rate: i64,
    pub avg_physical: i64,
    pub max_heart_rate: i32,
    pub max_breath_rate: i32,
    pub max_physical: i32,
    pub windows: Vec<VitalsWindowDto>,
}

/// 通知设置返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifySettingDto {
    pub user_id: String,
    pub device_id: String,
    pub alarm_enabled: bool,
    pub heart_rate_high: Option<i32>,
    pub heart_rate_low: Option<i32>,
    pub leave_bed_alarm: bool,
}

/// 通知设置更新请求体（缺省字段不修改）。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotifySettingRequest {
    pub device_id: String,
    pub alarm_enabled: Option<bool>,
    pub heart_rate_high: Option<i32>,
    pub heart_rate_low: Option<i32>,
    pub leave_bed_alarm: Option<bool>,
}
