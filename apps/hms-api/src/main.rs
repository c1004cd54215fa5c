//! HMS HTTP API 服务器：配置加载、存储与引擎装配、路由挂载。

mod handlers;
mod middleware;
mod routes;
mod utils;

use hms_auth::{AuthService, JwtManager};
use hms_config::AppConfig;
use hms_notify::{
    DeviceTopicBus, MqttNotifier, MqttNotifierConfig, NoopNotifier, NotifyPublisher,
};
use hms_ownership::OwnershipEngine;
use hms_report::ReportService;
use hms_storage::{
    DeviceStore, NotifySettingStore, OverviewCache, PgDeviceStore, PgNotifySettingStore,
    PgRelationStore, PgShareStore, PgSleepDataStore, PgTransferStore, PgUserStore, PgVitalsStore,
    RedisOverviewCache, RelationStore, ShareStore, SleepDataStore, TransferStore, UserStore,
    VitalsStore,
};
use hms_telemetry::init_tracing;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 各 handler 共享的应用状态。
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub devices: Arc<dyn DeviceStore>,
    pub relations: Arc<dyn RelationStore>,
    pub shares: Arc<dyn ShareStore>,
    pub ownership: Arc<OwnershipEngine>,
    pub reports: Arc<ReportService>,
    pub notify_settings: Arc<dyn NotifySettingStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    let pool = hms_storage::connect_pool(&config.database_url).await?;
    let user_store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
    let devices: Arc<dyn DeviceStore> = Arc::new(PgDeviceStore::new(pool.clone()));
    let relations: Arc<dyn RelationStore> = Arc::new(PgRelationStore::new(pool.clone()));
    let shares: Arc<dyn ShareStore> = Arc::new(PgShareStore::new(pool.clone()));
    let transfers: Arc<dyn TransferStore> = Arc::new(PgTransferStore::new(pool.clone()));
    let sleep_data: Arc<dyn SleepDataStore> = Arc::new(PgSleepDataStore::new(pool.clone()));
    let vitals: Arc<dyn VitalsStore> = Arc::new(PgVitalsStore::new(pool.clone()));
    let notify_settings: Arc<dyn NotifySettingStore> =
        Arc::new(PgNotifySettingStore::new(pool));
    let overview: Arc<dyn OverviewCache> = Arc::new(RedisOverviewCache::connect(
        &config.redis_url,
        config.overview_cache_ttl_seconds,
    )?);

    // 通知总线：未启用时退化为 Noop（开发与测试环境）
    let (notifier, bus): (Arc<dyn NotifyPublisher>, Arc<dyn DeviceTopicBus>) =
        if config.notify_enabled {
            let (mqtt, _eventloop_task) = MqttNotifier::connect(MqttNotifierConfig {
                host: config.mqtt_host.clone(),
                port: config.mqtt_port,
                username: config.mqtt_username.clone(),
                password: config.mqtt_password.clone(),
                user_topic_prefix: config.mqtt_topic_prefix.clone(),
                device_topic_prefix: config.mqtt_topic_prefix.clone(),
                qos: config.mqtt_qos,
            })?;
            let mqtt = Arc::new(mqtt);
            (mqtt.clone(), mqtt)
        } else {
            let noop = Arc::new(NoopNotifier);
            (noop.clone(), noop)
        };

    let jwt = JwtManager::new(
        config.jwt_secret.clone(),
        config.jwt_access_ttl_seconds,
        config.jwt_refresh_ttl_seconds,
    );
    let auth = Arc::new(AuthService::new(user_store, jwt));
    let ownership = Arc::new(OwnershipEngine::new(
        devices.clone(),
        relations.clone(),
        shares.clone(),
        transfers,
        notifier,
        bus,
        overview,
    ));
    let reports = Arc::new(ReportService::new(sleep_data, vitals));

    let state = AppState {
        auth,
        devices,
        relations,
        shares,
        ownership,
        reports,
        notify_settings,
    };

    let app = routes::create_api_router()
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_context))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
