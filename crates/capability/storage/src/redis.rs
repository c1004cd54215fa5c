//! Redis 设备总览缓存实现

use crate::error::StorageError;
use crate::overview::OverviewCache;
use redis::AsyncCommands;

fn overview_key(device_id: &str) -> String {
    format!("device:{}:overview", device_id)
}

/// Redis 设备总览缓存
pub struct RedisOverviewCache {
    client: redis::Client,
    ttl_seconds: Option<u64>,
}

impl RedisOverviewCache {
    pub fn new(client: redis::Client) -> Self {
        Self {
            client,
            ttl_seconds: None,
        }
    }

    pub fn connect(redis_url: &str, ttl_seconds: Option<u64>) -> Result<Self, StorageError> {
        let client =
            redis::Client::open(redis_url).map_err(|err| StorageError::new(err.to_string()))?;
        let ttl = ttl_seconds.filter(|value| *value > 0);
        Ok(Self {
            client,
            ttl_seconds: ttl,
        })
    }
}

#[async_trait::async_trait]
impl OverviewCache for RedisOverviewCache {
    async fn get_overview(&self, device_id: &str) -> Result<Option<String>, StorageError> {
        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        let value: Option<String> = connection
            .get(overview_key(device_id))
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        Ok(value)
    }

    async fn put_overview(&self, device_id: &str, payload: &str) -> Result<(), StorageError> {
        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        let key = overview_key(device_id);
        match self.ttl_seconds {
            Some(ttl) => {
                connection
                    .set_ex::<_, _, ()>(key, payload, ttl)
                    .await
                    .map_err(|err| StorageError::new(err.to_string()))?;
            }
            None => {
                connection
                    .set::<_, _, ()>(key, payload)
                    .await
                    .map_err(|err| StorageError::new(err.to_string()))?;
            }
        }
        Ok(())
    }

    async fn invalidate_overview(&self, device_id: &str) -> Result<(), StorageError> {
        let mut connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        connection
            .del::<_, ()>(overview_key(device_id))
            .await
            .map_err(|err| StorageError::new(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::overview_key;

    #[test]
    fn overview_key_shape() {
        assert_eq!(overview_key("dev-1"), "device:dev-1:overview");
    }
}
