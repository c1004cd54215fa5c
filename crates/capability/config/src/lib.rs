//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub database_url: String,
    pub redis_url: String,
    pub overview_cache_ttl_seconds: Option<u64>,
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub mqtt_topic_prefix: String,
    pub mqtt_qos: u8,
    pub notify_enabled: bool,
    pub jwt_secret: String,
    pub jwt_access_ttl_seconds: u64,
    pub jwt_refresh_ttl_seconds: u64,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("HMS_DATABASE_URL")
            .map_err(|_| ConfigError::Missing("HMS_DATABASE_URL".to_string()))?;
        let jwt_secret = env::var("HMS_JWT_SECRET")
            .map_err(|_| ConfigError::Missing("HMS_JWT_SECRET".to_string()))?;
        let jwt_access_ttl_seconds = read_u64_with_default("HMS_JWT_ACCESS_TTL_SECONDS", 3600)?;
        let jwt_refresh_ttl_seconds =
            read_u64_with_default("HMS_JWT_REFRESH_TTL_SECONDS", 7 * 24 * 3600)?;
        let http_addr = env::var("HMS_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let redis_url =
            env::var("HMS_REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let overview_cache_ttl_seconds =
            read_optional_u64("HMS_OVERVIEW_CACHE_TTL_SECONDS")?.filter(|value| *value > 0);
        let mqtt_host = env::var("HMS_MQTT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let mqtt_port = read_u16_with_default("HMS_MQTT_PORT", 1883)?;
        let mqtt_username = read_optional("HMS_MQTT_USERNAME");
        let mqtt_password = read_optional("HMS_MQTT_PASSWORD");
        let mqtt_topic_prefix =
            env::var("HMS_MQTT_TOPIC_PREFIX").unwrap_or_else(|_| "hms".to_string());
        let mqtt_qos = read_u8_with_default("HMS_MQTT_QOS", 1)?;
        let notify_enabled = read_bool_with_default("HMS_NOTIFY", false);

        Ok(Self {
            http_addr,
            database_url,
            redis_url,
            overview_cache_ttl_seconds,
            mqtt_host,
            mqtt_port,
            mqtt_username,
            mqtt_password,
            mqtt_topic_prefix,
            mqtt_qos,
            notify_enabled,
            jwt_secret,
            jwt_access_ttl_seconds,
            jwt_refresh_ttl_seconds,
        })
    }
}

fn read_u16_with_default(key: &str, default: u16) -> Result<u16, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u16>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u8_with_default(key: &str, default: u8) -> Result<u8, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u8>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_optional_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(key) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key.to_string(), value)),
        Err(_) => Ok(None),
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
