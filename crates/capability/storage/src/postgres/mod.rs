//! # PostgreSQL 存储实现模块
//!
//! 本模块提供所有存储接口的 PostgreSQL 实现，用于生产环境。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 查询使用参数绑定，防止 SQL 注入攻击
//! 2. **枚举列存文本**：DeviceKind / RelationFlag / ConfirmState 以文本列存储，
//!    读取时解析回领域枚举
//! 3. **连接池管理**：使用连接池复用数据库连接（见 `connection.rs`）
//!
//! ## 数据库模式要求
//!
//! - `users`：用户表（user_id, username, password, refresh_jti）
//! - `devices`：设备表（device_id, mac unique, name, kind, remark）
//! - `user_device_relations`：关系表（relation_id, user_id, device_id, flag）
//!   - 唯一索引 (user_id, device_id)
//! - `user_share_devices`：分享表（share_id, from_user_id, to_user_id, device_id, remark, confirm）
//! - `user_transfer_devices`：转让表（transfer_id, from_user_id, to_user_id, device_id, remark, confirm)
//! - `sleep_samples`：逐样本睡眠数据（device_id, ts, stage, turn_over, active）
//! - `sleep_periods`：分期报告数据（device_id, ts, periodization, event, session_start, session_end）
//! - `vitals_samples`：体征样本（device_id, ts, heart_rate, breath_rate, physical）
//! - `notify_settings`：通知设置（user_id, device_id, alarm_enabled, heart_rate_high, heart_rate_low, leave_bed_alarm）
//!   - 唯一索引 (user_id, device_id)
//!
//! ## 索引建议
//!
//! - `idx_relations_device`：(device_id)
//! - `idx_shares_device_from`：(from_user_id, device_id)
//! - `idx_sleep_samples_device_ts`：(device_id, ts)
//! - `idx_vitals_samples_device_ts`：(device_id, ts)

pub mod device;
pub mod notify_setting;
pub mod relation;
pub mod share;
pub mod sleep;
pub mod transfer;
pub mod user;
pub mod vitals;

pub use device::*;
pub use notify_setting::*;
pub use relation::*;
pub use share::*;
pub use sleep::*;
pub use transfer::*;
pub use user::*;
pub use vitals::*;
