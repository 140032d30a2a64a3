//! 会话槽位的持久化后端
//!
//! 后端只负责原样保存 `user` 和 `token` 两个字符串槽位，解析和校验由
//! [`SessionStore`](crate::session::SessionStore) 完成。

mod file;
mod memory;
mod redis;

use async_trait::async_trait;

pub use file::FileSlotStore;
pub use memory::MemorySlotStore;
pub use self::redis::RedisSlotStore;

/// 从后端读出的原始槽位，任意一个都可能缺失
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSlots {
    pub user: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("redis operation failed: {0}")]
    Redis(#[from] ::redis::RedisError),
    #[error("persisted slots are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// 键值槽位存储
///
/// `write_pair` 必须一次性写入两个槽位，调用方不会观察到只写入一半的状态。
#[async_trait]
pub trait SlotStore: Send + Sync {
    async fn read(&self) -> Result<RawSlots, StoreError>;

    async fn write_pair(&self, user: &str, token: &str) -> Result<(), StoreError>;

    /// 删除两个槽位，槽位不存在时不报错
    async fn clear(&self) -> Result<(), StoreError>;
}
