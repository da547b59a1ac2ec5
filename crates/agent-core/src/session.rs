//! Session Management
//!
//! Identifiers and an in-memory registry of live conversations.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// In-memory registry of live sessions.
///
/// Each id owns exactly one value; nothing survives a process restart.
pub struct SessionRegistry<T> {
    sessions: RwLock<HashMap<SessionId, Arc<T>>>,
}

impl<T> Default for SessionRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SessionRegistry<T> {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a session by ID
    pub async fn get(&self, id: &SessionId) -> Option<Arc<T>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Return the session for `id`, creating it with `init` if absent
    pub async fn get_or_insert_with(&self, id: SessionId, init: impl FnOnce() -> T) -> Arc<T> {
        if let Some(existing) = self.get(&id).await {
            return existing;
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id)
            .or_insert_with(|| {
                tracing::debug!("Creating session");
                Arc::new(init())
            })
            .clone()
    }

    /// Drop a session
    pub async fn remove(&self, id: &SessionId) -> Option<Arc<T>> {
        self.sessions.write().await.remove(id)
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
