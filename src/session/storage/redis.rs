use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use super::{RawSlots, SlotStore, StoreError};
use crate::session::keys::{token_slot_key, user_slot_key};

/// Redis 槽位存储，两个槽位在同一个 MULTI/EXEC 事务中写入
#[derive(Clone)]
pub struct RedisSlotStore {
    redis: Arc<RedisClient>,
    user_key: String,
    token_key: String,
}

impl RedisSlotStore {
    pub fn new(redis: Arc<RedisClient>, namespace: &str) -> Self {
        Self {
            redis,
            user_key: user_slot_key(namespace),
            token_key: token_slot_key(namespace),
        }
    }

    pub fn open(redis_url: &str, namespace: &str) -> Result<Self, StoreError> {
        let client = RedisClient::open(redis_url)?;
        Ok(Self::new(Arc::new(client), namespace))
    }
}

#[async_trait]
impl SlotStore for RedisSlotStore {
    async fn read(&self) -> Result<RawSlots, StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let (user, token): (Option<String>, Option<String>) = redis::pipe()
            .get(&self.user_key)
            .get(&self.token_key)
            .query_async(&mut conn)
            .await?;

        Ok(RawSlots { user, token })
    }

    async fn write_pair(&self, user: &str, token: &str) -> Result<(), StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let _: () = redis::pipe()
            .atomic()
            .set(&self.user_key, user)
            .ignore()
            .set(&self.token_key, token)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let _: () = conn.del(&[&self.user_key, &self.token_key]).await?;

        Ok(())
    }
}
