//! # agent-core
//!
//! Transport-agnostic plumbing for the crypto chat front-end.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     crypto-router                           │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │    Turns    │  │  Sessions   │  │  AnalysisBackend    │  │
//! │  │  & Sources  │──│  Registry   │──│    (Strategy)       │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `AnalysisBackend` trait enables swapping the HTTP analysis service for
//! a scripted mock (or any other transport) without changing routing logic.

pub mod error;
pub mod message;
pub mod provider;
pub mod session;

pub use error::{AgentError, Result};
pub use message::{Role, Source, Turn};
pub use provider::{
    AnalysisBackend, BackendResponse, Capability, FollowupRequest, PolicyImpactRequest,
    StrategyRequest,
};
pub use session::{SessionId, SessionRegistry};
