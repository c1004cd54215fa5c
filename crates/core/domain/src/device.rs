use std::fmt;
use std::str::FromStr;

/// 设备型号分类。
///
/// 数据存储与 API 均使用下划线小写字符串表示：
/// `heart_rate` | `fall_check` | `lamp` | `ed713` | `x1` | `x1s` | `h03` | `t1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// 心率监测设备（逐样本睡眠数据）
    HeartRate,
    /// 跌倒检测设备
    FallCheck,
    /// 智能灯具（无数据报告）
    Lamp,
    /// ED713 睡眠带（分期报告数据）
    Ed713,
    /// X1 床垫（分期报告数据）
    X1,
    /// X1S 床垫（分期报告数据）
    X1s,
    /// H03 桌面传感器
    H03,
    /// T1 学习桌传感器
    T1,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::HeartRate => "heart_rate",
            DeviceKind::FallCheck => "fall_check",
            DeviceKind::Lamp => "lamp",
            DeviceKind::Ed713 => "ed713",
            DeviceKind::X1 => "x1",
            DeviceKind::X1s => "x1s",
            DeviceKind::H03 => "h03",
            DeviceKind::T1 => "t1",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = UnknownDeviceKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "heart_rate" => Ok(DeviceKind::HeartRate),
            "fall_check" => Ok(DeviceKind::FallCheck),
            "lamp" => Ok(DeviceKind::Lamp),
            "ed713" => Ok(DeviceKind::Ed713),
            "x1" => Ok(DeviceKind::X1),
            "x1s" => Ok(DeviceKind::X1s),
            "h03" => Ok(DeviceKind::H03),
            "t1" => Ok(DeviceKind::T1),
            other => Err(UnknownDeviceKind(other.to_string())),
        }
    }
}

/// 未知设备型号错误。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDeviceKind(pub String);

impl fmt::Display for UnknownDeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown device kind: {}", self.0)
    }
}

impl std::error::Error for UnknownDeviceKind {}

/// 用户-设备关系类型。
///
/// 不变式：同一设备同一时刻至多存在一条 Normal 关系（唯一拥有者）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationFlag {
    /// 唯一拥有关系
    Normal,
    /// 二级共享访问关系
    Shared,
}

impl RelationFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationFlag::Normal => "normal",
            RelationFlag::Shared => "shared",
        }
    }
}

impl fmt::Display for RelationFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationFlag {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "normal" => Ok(RelationFlag::Normal),
            "shared" => Ok(RelationFlag::Shared),
            other => Err(format!("unknown relation flag: {other}")),
        }
    }
}

/// 分享/转让工作流确认状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmState {
    /// 待接收方确认
    Unconfirmed,
    /// 已确认
    Confirmed,
}

impl ConfirmState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmState::Unconfirmed => "unconfirmed",
            ConfirmState::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for ConfirmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfirmState {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "unconfirmed" => Ok(ConfirmState::Unconfirmed),
            "confirmed" => Ok(ConfirmState::Confirmed),
            other => Err(format!("unknown confirm state: {other}")),
        }
    }
}
