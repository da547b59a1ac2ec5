//! # agent-runtime
//!
//! Transports for the crypto analysis backend.
//!
//! ## Backends
//!
//! - **HTTP** (default): JSON over HTTP against the analysis service
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::HttpBackend;
//! use crypto_router::{ChatSession, DispatchConfig};
//!
//! let backend = HttpBackend::from_env()?;
//! let session = ChatSession::with_backend(Arc::new(backend), DispatchConfig::default());
//! ```

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{HttpBackend, HttpBackendConfig};

// Re-export core types for convenience
pub use agent_core::{AgentError, AnalysisBackend, BackendResponse, Capability, Result};
