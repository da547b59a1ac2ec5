//! Error Types for the Crypto Router

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouterError>;

#[derive(Error, Debug)]
pub enum RouterError {
    /// Cache-warming call failed; logged and discarded
    #[error("Priming call failed: {0}")]
    Priming(#[source] AgentError),

    /// Intent-specific call failed; surfaced as the error turn
    #[error("Dispatch failed: {0}")]
    Dispatch(#[source] AgentError),

    #[error("Unknown ticker: {0}")]
    UnknownTicker(String),
}
