//! Application State

use std::sync::Arc;

use agent_core::{AnalysisBackend, SessionId, SessionRegistry};
use crypto_router::{ChatSession, DispatchConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Analysis backend (HTTP or mock)
    pub backend: Arc<dyn AnalysisBackend>,

    /// Live conversations, one `ChatSession` each.
    ///
    /// Entries live until `DELETE /api/conversations/{id}` or process exit;
    /// there is no idle expiry.
    pub sessions: Arc<SessionRegistry<ChatSession>>,

    /// Per-call timeout applied by every session's dispatcher
    pub dispatch: DispatchConfig,
}

impl AppState {
    pub fn new(backend: Arc<dyn AnalysisBackend>, dispatch: DispatchConfig) -> Self {
        Self {
            backend,
            sessions: Arc::new(SessionRegistry::new()),
            dispatch,
        }
    }

    /// Existing conversation, or a fresh one under `id`
    pub async fn session(&self, id: SessionId) -> Arc<ChatSession> {
        let backend = self.backend.clone();
        let dispatch = self.dispatch.clone();
        self.sessions
            .get_or_insert_with(id, || ChatSession::with_backend(backend, dispatch))
            .await
    }
}
