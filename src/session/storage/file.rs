use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{RawSlots, SlotStore, StoreError};
use crate::session::keys::{TOKEN_SLOT, USER_SLOT};

/// 基于单个 JSON 文件的槽位存储
///
/// 两个槽位写在同一个文件里，先写临时文件再 rename 覆盖，
/// 因此文件要么是旧内容，要么是完整的新内容。
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    path: PathBuf,
}

impl FileSlotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SlotStore for FileSlotStore {
    async fn read(&self) -> Result<RawSlots, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(RawSlots::default()),
            Err(e) => return Err(e.into()),
        };
        let mut slots: BTreeMap<String, String> = serde_json::from_slice(&bytes)?;
        Ok(RawSlots {
            user: slots.remove(USER_SLOT),
            token: slots.remove(TOKEN_SLOT),
        })
    }

    async fn write_pair(&self, user: &str, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let slots = BTreeMap::from([(USER_SLOT, user), (TOKEN_SLOT, token)]);
        let json = serde_json::to_vec_pretty(&slots)?;

        let staging = self.staging_path();
        fs::write(&staging, json).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
