//! # HMS Storage 模块
//!
//! 本模块提供统一的数据存储抽象层，支持多种存储后端实现。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs` / `overview.rs`)：所有资源存储的异步 Trait 接口
//! 2. **数据模型层** (`models.rs`)：记录结构与部分更新（patch）结构
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **验证辅助层** (`validation.rs`)：作用域参数非空验证
//! 5. **连接管理层** (`connection.rs`)：数据库连接池管理
//! 6. **实现层**：
//!    - `in_memory/`：内存存储实现（用于测试和演示）
//!    - `postgres/`：PostgreSQL 存储实现（生产环境使用）
//!    - `redis.rs`：Redis 设备总览缓存
//!
//! ## 设计约束
//!
//! - **禁止直接 SQL**：Handler 层禁止直接写 SQL，统一通过 storage 层
//! - **显式作用域**：user_id / device_id 显式出现在接口参数中
//! - **应用层不变式**：每设备至多一条 Normal 关系由 ownership 引擎保证，
//!   存储层只提供 `find_normal` 等查询原语
//!
//! ## 测试覆盖
//!
//! - 单元测试：内存实现的 CRUD 操作
//! - 集成测试：关系/分享/转让存储的查询原语
//! - 时序查询测试：闭区间过滤与升序排序

pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod overview;
pub mod postgres;
pub mod redis;
pub mod traits;
pub mod validation;

pub use connection::*;
pub use error::*;
pub use models::*;
pub use overview::*;
pub use redis::RedisOverviewCache;
pub use traits::*;
pub use validation::*;

pub use in_memory::{
    InMemoryDeviceStore, InMemoryNotifySettingStore, InMemoryOverviewCache, InMemoryRelationStore,
    InMemoryShareStore, InMemorySleepDataStore, InMemoryTransferStore, InMemoryUserStore,
    InMemoryVitalsStore,
};

pub use postgres::{
    PgDeviceStore, PgNotifySettingStore, PgRelationStore, PgShareStore, PgSleepDataStore,
    PgTransferStore, PgUserStore, PgVitalsStore,
};
