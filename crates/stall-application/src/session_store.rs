//! Process-lifetime session map.

use std::collections::HashMap;
use std::sync::Arc;

use stall_core::session::Session;
use tokio::sync::{Mutex, RwLock};

/// Keyed session store.
///
/// The map lock is only held while looking up or inserting an entry. Each
/// session sits behind its own mutex, so one session's turns run one at a
/// time while different sessions proceed in parallel. Sessions are created
/// on first access and never expire.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a session by ID.
    ///
    /// # Returns
    ///
    /// `Some(session)` if the session exists, `None` otherwise.
    pub async fn get(&self, session_id: &str) -> Option<Arc<Mutex<Session>>> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Gets a session, creating an empty one on first access.
    pub async fn get_or_create(&self, session_id: &str) -> Arc<Mutex<Session>> {
        if let Some(session) = self.get(session_id).await {
            return session;
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!("[SessionStore] Created session {}", session_id);
                Arc::new(Mutex::new(Session::new(session_id)))
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_create_returns_same_session() {
        let store = SessionStore::new();
        assert!(store.get("a").await.is_none());

        let first = store.get_or_create("a").await;
        first.lock().await.history.push("我要一杯豆漿".into());

        let second = store.get_or_create("a").await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.lock().await.history.len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::new();
        let a = store.get_or_create("a").await;
        let _guard = a.lock().await;

        // Another session stays reachable while "a" is locked.
        let b = store.get_or_create("b").await;
        assert!(b.try_lock().is_ok());
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
