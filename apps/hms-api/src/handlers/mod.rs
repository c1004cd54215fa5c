//! Handlers 模块

pub mod auth;
pub mod devices;
pub mod metrics;
pub mod notify_settings;
pub mod ownership;
pub mod reports;

pub use auth::*;
pub use devices::*;
pub use metrics::*;
pub use notify_settings::*;
pub use ownership::*;
pub use reports::*;
