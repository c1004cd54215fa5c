use async_trait::async_trait;
use hms_telemetry::{record_notify_failed, record_notify_published};
use rumqttc::{AsyncClient, MqttOptions, QoS};
use std::time::Duration;
use tracing::{info, warn};

/// 通知链路错误。
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("publish error: {0}")]
    Publish(String),
    #[error("subscribe error: {0}")]
    Subscribe(String),
    #[error("payload error: {0}")]
    Payload(String),
}

/// 用户通知事件。
///
/// 所有归属变更在成功后向受影响用户的主题发布一条事件。
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyEvent {
    /// deviceRegistered | shareRequested | shareConfirmed | shareRejected |
    /// shareRevoked | transferRequested | transferConfirmed | transferRejected |
    /// relationRemoved
    pub kind: String,
    pub device_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl NotifyEvent {
    pub fn new(kind: &str, device_id: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            device_id: device_id.into(),
            from_user_id: None,
            to_user_id: None,
            share_id: None,
            remark: None,
        }
    }

    pub fn from_user(mut self, user_id: impl Into<String>) -> Self {
        self.from_user_id = Some(user_id.into());
        self
    }

    pub fn to_user(mut self, user_id: impl Into<String>) -> Self {
        self.to_user_id = Some(user_id.into());
        self
    }

    pub fn share(mut self, share_id: impl Into<String>) -> Self {
        self.share_id = Some(share_id.into());
        self
    }

    pub fn remark(mut self, remark: Option<String>) -> Self {
        self.remark = remark;
        self
    }
}

/// 用户通知发布抽象。
///
/// 调用方按 fire-and-forget 使用：发布失败只记录，不向上传播。
#[async_trait]
pub trait NotifyPublisher: Send + Sync {
    async fn publish(&self, user_id: &str, event: &NotifyEvent) -> Result<(), NotifyError>;
}

/// 设备主题总线抽象。
///
/// 仅在设备注册/移除边界调用。
#[async_trait]
pub trait DeviceTopicBus: Send + Sync {
    async fn subscribe_device(&self, mac: &str) -> Result<(), NotifyError>;
    async fn unsubscribe_device(&self, mac: &str) -> Result<(), NotifyError>;
}

/// 空实现（用于测试与占位）。
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl NotifyPublisher for NoopNotifier {
    async fn publish(&self, _user_id: &str, _event: &NotifyEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[async_trait]
impl DeviceTopicBus for NoopNotifier {
    async fn subscribe_device(&self, _mac: &str) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn unsubscribe_device(&self, _mac: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// MQTT 通知配置。
#[derive(Debug, Clone)]
pub struct MqttNotifierConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// 用户通知主题前缀：`{prefix}/users/{user_id}`
    pub user_topic_prefix: String,
    /// 设备主题前缀：`{prefix}/devices/{mac}/#`
    pub device_topic_prefix: String,
    pub qos: u8,
}

/// MQTT 通知实现（发布用户事件 + 管理设备主题订阅）。
#[derive(Clone)]
pub struct MqttNotifier {
    client: AsyncClient,
    user_topic_prefix: String,
    device_topic_prefix: String,
    qos: QoS,
}

impl MqttNotifier {
    pub fn connect(
        config: MqttNotifierConfig,
    ) -> Result<(Self, tokio::task::JoinHandle<()>), NotifyError> {
        let client_id = format!("hms-notify-{}", uuid::Uuid::new_v4());
        let mut options = MqttOptions::new(client_id, config.host, config.port);
        options.set_keep_alive(Duration::from_secs(30));
        if let (Some(username), Some(password)) = (config.username, config.password) {
            options.set_credentials(username, password);
        }
        let (client, mut eventloop) = AsyncClient::new(options, 10);
        let handle = tokio::spawn(async move {
            loop {
                if let Err(err) = eventloop.poll().await {
                    warn!(target: "hms.notify", "mqtt eventloop error: {}", err);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        });
        Ok((
            Self {
                client,
                user_topic_prefix: config.user_topic_prefix,
                device_topic_prefix: config.device_topic_prefix,
                qos: qos_from_u8(config.qos),
            },
            handle,
        ))
    }

    fn user_topic(&self, user_id: &str) -> String {
        user_topic(&self.user_topic_prefix, user_id)
    }

    fn device_topic(&self, mac: &str) -> String {
        device_topic(&self.device_topic_prefix, mac)
    }
}

#[async_trait]
impl NotifyPublisher for MqttNotifier {
    async fn publish(&self, user_id: &str, event: &NotifyEvent) -> Result<(), NotifyError> {
        let topic = self.user_topic(user_id);
        let payload =
            serde_json::to_vec(event).map_err(|err| NotifyError::Payload(err.to_string()))?;
        info!(
            target: "hms.notify",
            user_id = %user_id,
            event_kind = %event.kind,
            device_id = %event.device_id,
            topic = %topic,
            payload_size = payload.len(),
            "notify_publish"
        );
        match self.client.publish(topic, self.qos, false, payload).await {
            Ok(()) => {
                record_notify_published();
                Ok(())
            }
            Err(err) => {
                record_notify_failed();
                Err(NotifyError::Publish(err.to_string()))
            }
        }
    }
}

#[async_trait]
impl DeviceTopicBus for MqttNotifier {
    async fn subscribe_device(&self, mac: &str) -> Result<(), NotifyError> {
        let topic = self.device_topic(mac);
        info!(target: "hms.notify", mac = %mac, topic = %topic, "device_subscribe");
        self.client
            .subscribe(topic, self.qos)
            .await
            .map_err(|err| NotifyError::Subscribe(err.to_string()))
    }

    async fn unsubscribe_device(&self, mac: &str) -> Result<(), NotifyError> {
        let topic = self.device_topic(mac);
        info!(target: "hms.notify", mac = %mac, topic = %topic, "device_unsubscribe");
        self.client
            .unsubscribe(topic)
            .await
            .map_err(|err| NotifyError::Subscribe(err.to_string()))
    }
}

fn qos_from_u8(value: u8) -> QoS {
    match value {
        0 => QoS::AtMostOnce,
        1 => QoS::AtLeastOnce,
        2 => QoS::ExactlyOnce,
        _ => QoS::AtLeastOnce,
    }
}

fn user_topic(prefix: &str, user_id: &str) -> String {
    format!("{}/users/{}", prefix.trim_end_matches('/'), user_id)
}

fn device_topic(prefix: &str, mac: &str) -> String {
    format!("{}/devices/{}/#", prefix.trim_end_matches('/'), mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_topic_trims_prefix_slash() {
        assert_eq!(user_topic("hms/", "user-1"), "hms/users/user-1");
        assert_eq!(user_topic("hms", "user-1"), "hms/users/user-1");
    }

    #[test]
    fn device_topic_covers_subtopics() {
        assert_eq!(
            device_topic("hms", "AA:BB:CC:DD:EE:01"),
            "hms/devices/AA:BB:CC:DD:EE:01/#"
        );
    }

    #[test]
    fn event_payload_is_camel_case() {
        let event = NotifyEvent::new("shareRequested", "dev-1")
            .from_user("user-1")
            .to_user("user-2")
            .share("s-1");
        let value = serde_json::to_value(&event).expect("serialize");
        assert_eq!(value["kind"], "shareRequested");
        assert!(value.get("fromUserId").is_some());
        assert!(value.get("shareId").is_some());
        assert!(value.get("remark").is_none());
    }
}
