//! Backend Integration
//!
//! The router talks to analysis services only through
//! `agent_core::AnalysisBackend`; this module adds an in-process
//! implementation for tests and offline demos.

mod mock;

pub use mock::{MockBackend, MockCall, MockReply};

pub use agent_core::provider::AnalysisBackend;
