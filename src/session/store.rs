use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use super::storage::{RawSlots, SlotStore, StoreError};
use crate::models::User;

/// 已认证会话：用户和令牌总是同时存在
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: User,
    #[serde(skip_serializing)]
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session token must not be empty")]
    EmptyToken,
    #[error("failed to encode user: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 进程内唯一的会话来源
///
/// 内存中的会话只会在持久化成功后才改变，写操作在同一把锁内串行，
/// 因此内存状态和持久化状态不会出现一方有会话、另一方没有的情况。
pub struct SessionStore {
    slots: Arc<dyn SlotStore>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new(slots: Arc<dyn SlotStore>) -> Self {
        Self {
            slots,
            current: RwLock::new(None),
        }
    }

    /// 从持久化槽位恢复会话
    ///
    /// 任一槽位缺失或损坏都视为没有会话，不会返回错误。加载过程不写存储。
    pub async fn load(&self) -> Option<Session> {
        let restored = match self.slots.read().await {
            Ok(raw) => parse_slots(raw),
            Err(e) => {
                tracing::warn!("Failed to read persisted session, starting signed out: {}", e);
                None
            }
        };

        *self.current.write().await = restored.clone();
        restored
    }

    /// 建立会话并一次性持久化用户和令牌
    pub async fn login(&self, user: User, token: String) -> Result<Session, SessionError> {
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let user_json = serde_json::to_string(&user)?;

        let mut current = self.current.write().await;
        self.slots.write_pair(&user_json, &token).await?;

        let session = Session { user, token };
        tracing::info!(
            "Session started for {} ({})",
            session.user.email,
            session.user.role
        );
        *current = Some(session.clone());
        Ok(session)
    }

    /// 清除会话，没有会话时也可以调用
    ///
    /// 即使删除持久化槽位失败，内存中的会话也会被清除。
    pub async fn logout(&self) -> Result<(), SessionError> {
        let mut current = self.current.write().await;
        if let Some(session) = current.take() {
            tracing::info!("Session ended for {}", session.user.email);
        }
        self.slots.clear().await?;
        Ok(())
    }

    /// 当前会话，每次导航都应重新读取
    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }
}

fn parse_slots(raw: RawSlots) -> Option<Session> {
    let (user_json, token) = match (raw.user, raw.token) {
        (None, None) => return None,
        (Some(user), Some(token)) => (user, token),
        _ => {
            tracing::warn!("Persisted session is incomplete, ignoring it");
            return None;
        }
    };

    if token.trim().is_empty() {
        tracing::warn!("Persisted session has an empty token, ignoring it");
        return None;
    }

    match serde_json::from_str::<User>(&user_json) {
        Ok(user) => Some(Session { user, token }),
        Err(e) => {
            tracing::warn!("Persisted user record is malformed, ignoring it: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::models::Role;
    use crate::session::storage::{FileSlotStore, MemorySlotStore};

    fn admin() -> User {
        User {
            id: "42".into(),
            full_name: "A".into(),
            email: "a@example.edu".into(),
            role: Role::Admin,
        }
    }

    const VALID_USER: &str =
        r#"{"id":"42","full_name":"A","email":"a@example.edu","role":"admin"}"#;

    #[rstest]
    #[case::user_without_token(Some(VALID_USER), None)]
    #[case::token_without_user(None, Some("t"))]
    #[case::user_not_json(Some("{not json"), Some("t"))]
    #[case::user_is_a_string(Some(r#""admin""#), Some("t"))]
    #[case::user_missing_fields(Some(r#"{"id":"42"}"#), Some("t"))]
    #[case::unknown_role(
        Some(r#"{"id":"42","full_name":"A","email":"a@x","role":"root"}"#),
        Some("t")
    )]
    #[case::empty_token(Some(VALID_USER), Some(""))]
    #[case::blank_token(Some(VALID_USER), Some("   "))]
    #[case::nothing(None, None)]
    #[tokio::test]
    async fn malformed_or_partial_records_load_as_no_session(
        #[case] user: Option<&str>,
        #[case] token: Option<&str>,
    ) {
        let store = SessionStore::new(Arc::new(MemorySlotStore::with_slots(user, token)));

        assert_eq!(store.load().await, None);
        assert_eq!(store.current().await, None);
    }

    #[tokio::test]
    async fn load_does_not_write_to_the_store() {
        let slots = Arc::new(MemorySlotStore::with_slots(Some("{broken"), None));
        let store = SessionStore::new(slots.clone());

        store.load().await;

        assert_eq!(slots.read().await.unwrap().user.as_deref(), Some("{broken"));
        assert_eq!(slots.len().await, 1);
    }

    #[tokio::test]
    async fn login_survives_a_reload() {
        let slots = Arc::new(MemorySlotStore::new());
        let store = SessionStore::new(slots.clone());
        let session = store.login(admin(), "t".into()).await.unwrap();

        let reloaded = SessionStore::new(slots).load().await;

        assert_eq!(reloaded, Some(session));
    }

    #[tokio::test]
    async fn login_survives_a_reload_through_the_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::new(Arc::new(FileSlotStore::new(&path)));
        let session = store.login(admin(), "t".into()).await.unwrap();

        let reloaded = SessionStore::new(Arc::new(FileSlotStore::new(&path)));

        assert_eq!(reloaded.load().await, Some(session.clone()));
        assert_eq!(reloaded.current().await, Some(session));
    }

    #[tokio::test]
    async fn relogin_replaces_the_user_wholesale() {
        let slots = Arc::new(MemorySlotStore::new());
        let store = SessionStore::new(slots.clone());
        store.login(admin(), "t1".into()).await.unwrap();

        let employer = User {
            id: "7".into(),
            full_name: "E".into(),
            email: "e@corp.io".into(),
            role: Role::Employer,
        };
        store.login(employer.clone(), "t2".into()).await.unwrap();

        let reloaded = SessionStore::new(slots).load().await.unwrap();
        assert_eq!(reloaded.user, employer);
        assert_eq!(reloaded.token, "t2");
    }

    #[tokio::test]
    async fn empty_token_is_rejected_and_nothing_is_persisted() {
        let slots = Arc::new(MemorySlotStore::new());
        let store = SessionStore::new(slots.clone());

        let err = store.login(admin(), " ".into()).await.unwrap_err();

        assert!(matches!(err, SessionError::EmptyToken));
        assert_eq!(store.current().await, None);
        assert!(slots.is_empty().await);
    }

    #[tokio::test]
    async fn logout_clears_memory_and_storage() {
        let slots = Arc::new(MemorySlotStore::new());
        let store = SessionStore::new(slots.clone());
        store.login(admin(), "t".into()).await.unwrap();

        store.logout().await.unwrap();

        assert_eq!(store.current().await, None);
        assert_eq!(store.load().await, None);
        assert!(slots.is_empty().await);
    }

    #[tokio::test]
    async fn logout_twice_is_the_same_as_once() {
        let slots = Arc::new(MemorySlotStore::new());
        let store = SessionStore::new(slots.clone());
        store.login(admin(), "t".into()).await.unwrap();

        store.logout().await.unwrap();
        store.logout().await.unwrap();

        assert_eq!(SessionStore::new(slots).load().await, None);
    }

    #[tokio::test]
    async fn logout_without_session_is_a_no_op() {
        let store = SessionStore::new(Arc::new(MemorySlotStore::new()));
        store.logout().await.unwrap();
        assert_eq!(store.load().await, None);
    }

    #[test]
    fn token_is_never_serialized() {
        let session = Session {
            user: admin(),
            token: "secret".into(),
        };
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("secret"));
    }
}
