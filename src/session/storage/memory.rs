use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{RawSlots, SlotStore, StoreError};
use crate::session::keys::{TOKEN_SLOT, USER_SLOT};

/// 进程内存储，重启即丢失
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    slots: Mutex<BTreeMap<String, String>>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以任意原始内容预置槽位，可用于模拟残缺或损坏的记录
    pub fn with_slots(user: Option<&str>, token: Option<&str>) -> Self {
        let mut slots = BTreeMap::new();
        if let Some(user) = user {
            slots.insert(USER_SLOT.to_string(), user.to_string());
        }
        if let Some(token) = token {
            slots.insert(TOKEN_SLOT.to_string(), token.to_string());
        }
        Self {
            slots: Mutex::new(slots),
        }
    }

    /// 当前槽位数量
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.lock().await.is_empty()
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn read(&self) -> Result<RawSlots, StoreError> {
        let slots = self.slots.lock().await;
        Ok(RawSlots {
            user: slots.get(USER_SLOT).cloned(),
            token: slots.get(TOKEN_SLOT).cloned(),
        })
    }

    async fn write_pair(&self, user: &str, token: &str) -> Result<(), StoreError> {
        let mut slots = self.slots.lock().await;
        slots.insert(USER_SLOT.to_string(), user.to_string());
        slots.insert(TOKEN_SLOT.to_string(), token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut slots = self.slots.lock().await;
        slots.remove(USER_SLOT);
        slots.remove(TOKEN_SLOT);
        Ok(())
    }
}
