//! Chat Session
//!
//! Serialized turn submission for one conversation: resolve the asset,
//! update context, classify, dispatch, append.
//!
//! ```text
//! text ─► SymbolResolver ─► ContextTracker ─► IntentClassifier ─► Dispatcher ─► Turn
//! ```
//!
//! Only one turn may be in flight. A submission made while another is still
//! dispatching is ignored rather than queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use agent_core::{Turn, provider::AnalysisBackend};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::classifier::IntentClassifier;
use crate::context::ContextTracker;
use crate::conversation::ConversationState;
use crate::dispatch::{DispatchConfig, Dispatcher, TurnPlan};
use crate::model::{Intent, Ticker};
use crate::resolver::{KeywordResolver, SymbolResolver};

/// Why a submission was not processed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Blank or whitespace-only text
    Empty,
    /// Another turn is still in flight
    Busy,
    /// The runtime shut down before the turn finished
    Cancelled,
}

/// What happened during one processed turn
#[derive(Clone, Debug, Serialize)]
pub struct TurnReport {
    pub intent: Intent,
    pub detected: Option<Ticker>,
    pub effective_asset: Option<Ticker>,
    /// The assistant turn that was appended
    pub reply: Turn,
}

/// Result of `ChatSession::submit`
#[derive(Clone, Debug)]
pub enum SubmitOutcome {
    Answered(TurnReport),
    Ignored(IgnoreReason),
}

/// Read-only copy of a conversation
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub turns: Vec<Turn>,
    pub current_asset: Option<Ticker>,
    pub busy: bool,
}

/// Clears the busy flag once the turn task is done with the session
struct BusyGuard(Arc<ChatSession>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.busy.store(false, Ordering::Release);
    }
}

/// One conversation with its router pipeline
pub struct ChatSession {
    state: RwLock<ConversationState>,
    resolver: Arc<dyn SymbolResolver>,
    dispatcher: Dispatcher,
    busy: AtomicBool,
}

impl ChatSession {
    pub fn new(resolver: Arc<dyn SymbolResolver>, dispatcher: Dispatcher) -> Self {
        Self {
            state: RwLock::new(ConversationState::new()),
            resolver,
            dispatcher,
            busy: AtomicBool::new(false),
        }
    }

    /// Session using the keyword resolver
    pub fn with_backend(backend: Arc<dyn AnalysisBackend>, config: DispatchConfig) -> Self {
        Self::new(Arc::new(KeywordResolver::new()), Dispatcher::new(backend, config))
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Process one user message.
    ///
    /// Always ends with an appended assistant turn unless the submission is
    /// ignored; backend failures become the reply text. The turn runs on its
    /// own task, so dropping the returned future does not cut it short.
    pub async fn submit(self: &Arc<Self>, text: &str) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::Empty);
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Turn in flight, ignoring submission");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        }
        let guard = BusyGuard(Arc::clone(self));
        let text = text.to_string();

        let turn = tokio::spawn(async move {
            let report = guard.0.run_turn(&text).await;
            drop(guard);
            report
        });

        match turn.await {
            Ok(report) => SubmitOutcome::Answered(report),
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                tracing::warn!(error = %e, "Turn task cancelled");
                SubmitOutcome::Ignored(IgnoreReason::Cancelled)
            }
        }
    }

    async fn run_turn(&self, text: &str) -> TurnReport {
        let detected = self.resolver.resolve(text);
        let effective_asset = {
            let mut state = self.state.write().await;
            state.append_turn(Turn::user(text));
            ContextTracker::update_and_resolve(&mut state, detected)
        };

        let plan = TurnPlan {
            effective_asset,
            detected,
            intent: IntentClassifier::classify(text, detected),
            text: text.to_string(),
        };
        tracing::info!(
            intent = %plan.intent,
            detected = ?plan.detected,
            asset = ?plan.effective_asset,
            "Dispatching turn"
        );

        let reply = self.dispatcher.dispatch(&plan).await;
        let turn = Turn::assistant(reply.text, reply.sentiment_score, reply.sources);
        self.state.write().await.append_turn(turn.clone());

        TurnReport {
            intent: plan.intent,
            detected,
            effective_asset,
            reply: turn,
        }
    }

    /// Copy of the transcript and current asset
    pub async fn snapshot(&self) -> Snapshot {
        let state = self.state.read().await;
        Snapshot {
            turns: state.turns().to_vec(),
            current_asset: state.current_asset(),
            busy: self.is_busy(),
        }
    }

    pub async fn current_asset(&self) -> Option<Ticker> {
        self.state.read().await.current_asset()
    }

    pub async fn turn_count(&self) -> usize {
        self.state.read().await.len()
    }

    pub async fn is_fresh(&self) -> bool {
        self.state.read().await.is_fresh()
    }
}
