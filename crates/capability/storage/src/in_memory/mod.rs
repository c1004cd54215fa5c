//! 内存存储实现模块
//!
//! 仅用于本地演示和测试。
//!
//! 包含以下实现：
//! - UserStore: InMemoryUserStore
//! - DeviceStore: InMemoryDeviceStore
//! - RelationStore: InMemoryRelationStore
//! - ShareStore: InMemoryShareStore
//! - TransferStore: InMemoryTransferStore
//! - SleepDataStore: InMemorySleepDataStore
//! - VitalsStore: InMemoryVitalsStore
//! - NotifySettingStore: InMemoryNotifySettingStore
//! - OverviewCache: InMemoryOverviewCache

pub mod device;
pub mod notify_setting;
pub mod overview;
pub mod relation;
pub mod share;
pub mod sleep;
pub mod transfer;
pub mod user;
pub mod vitals;

pub use device::*;
pub use notify_setting::*;
pub use overview::*;
pub use relation::*;
pub use share::*;
pub use sleep::*;
pub use transfer::*;
pub use user::*;
pub use vitals::*;
