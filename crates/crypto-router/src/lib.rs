//! # crypto-router
//!
//! Conversational intent router and context tracker for a cryptocurrency
//! chat front-end.
//!
//! ## Per-turn flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  "what's the best time to sell?"                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SymbolResolver    → None            (no ticker this turn)  │
//! │  ContextTracker    → ETH             (carried over)         │
//! │  IntentClassifier  → STRATEGY                               │
//! │  Dispatcher        → analysis(ETH)   (cache warm, may fail) │
//! │                    → trading-strategy(ETH, text)            │
//! │  Normalize         → { text, sentiment_score, sources }     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only one asset is remembered per conversation, and only one turn per
//! conversation may be in flight at a time.

pub mod backend;
pub mod classifier;
pub mod context;
pub mod conversation;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod resolver;
pub mod session;
pub mod sources;

pub use classifier::IntentClassifier;
pub use context::ContextTracker;
pub use conversation::ConversationState;
pub use dispatch::{DispatchConfig, Dispatcher, PrimingOutcome, TurnPlan};
pub use error::{Result, RouterError};
pub use model::{Intent, NormalizedResponse, SUGGESTED_QUERIES, Ticker};
pub use resolver::{KeywordResolver, SymbolResolver};
pub use session::{ChatSession, IgnoreReason, Snapshot, SubmitOutcome, TurnReport};
pub use sources::{Reliability, SourceExt, SourceKind};
