// 会话模块
// 包含会话状态、槽位持久化后端和槽位键

pub mod keys;
pub mod storage;
mod store;

use std::sync::Arc;

pub use storage::{FileSlotStore, MemorySlotStore, RawSlots, RedisSlotStore, SlotStore, StoreError};
pub use store::{Session, SessionError, SessionStore};

use crate::config::{Config, SessionBackend};

/// 按配置创建槽位存储后端
pub fn slot_store_from_config(config: &Config) -> Result<Arc<dyn SlotStore>, StoreError> {
    let store: Arc<dyn SlotStore> = match &config.session_backend {
        SessionBackend::Memory => Arc::new(MemorySlotStore::new()),
        SessionBackend::File(path) => Arc::new(FileSlotStore::new(path.clone())),
        SessionBackend::Redis(url) => {
            Arc::new(RedisSlotStore::open(url, &config.session_namespace)?)
        }
    };
    Ok(store)
}
