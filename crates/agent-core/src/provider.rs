//! Analysis Backend Strategy Pattern
//!
//! Defines a common interface for the analysis capabilities the chat
//! front-end consumes (analysis, trading strategy, policy impact, follow-up),
//! allowing the router to work with any transport without code changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::provider::{AnalysisBackend, FollowupRequest};
//!
//! let backend = HttpBackend::from_env()?;
//!
//! // Use through the trait
//! let reply = backend.followup(&FollowupRequest::new("BTC", "and its volume?")).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Source;

/// Backend capabilities the router can call
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Per-asset analysis; also used to warm the backend cache
    Analysis,
    TradingStrategy,
    PolicyImpact,
    Followup,
}

impl Capability {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::TradingStrategy => "trading-strategy",
            Self::PolicyImpact => "policy-impact",
            Self::Followup => "followup",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a trading-strategy request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyRequest {
    pub symbol: String,
    pub goal: String,
}

impl StrategyRequest {
    pub fn new(symbol: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            goal: goal.into(),
        }
    }
}

/// Body of a policy-impact request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyImpactRequest {
    pub symbol: String,
    pub policy_description: String,
}

impl PolicyImpactRequest {
    pub fn new(symbol: impl Into<String>, policy_description: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            policy_description: policy_description.into(),
        }
    }
}

/// Body of a follow-up request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowupRequest {
    pub symbol: String,
    pub question: String,
}

impl FollowupRequest {
    pub fn new(symbol: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            question: question.into(),
        }
    }
}

/// Union of the response shapes returned by every capability.
///
/// Each capability puts its answer under a different field; all are optional
/// and unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_analysis: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_analysis: Option<String>,

    #[serde(default)]
    pub sentiment_score: Option<f64>,

    #[serde(default)]
    pub sources: Vec<Source>,
}

impl BackendResponse {
    /// Response carrying its answer in the generic `response` field
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_sentiment(mut self, score: f64) -> Self {
        self.sentiment_score = Some(score);
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }

    /// First non-empty answer field, in the order
    /// `response > combined_analysis > strategy > prediction > impact_analysis`.
    pub fn answer_text(&self) -> Option<&str> {
        [
            &self.response,
            &self.combined_analysis,
            &self.strategy,
            &self.prediction,
            &self.impact_analysis,
        ]
        .into_iter()
        .filter_map(Option::as_deref)
        .find(|text| !text.is_empty())
    }
}

/// Strategy trait for analysis backends
///
/// Implement this trait to add support for new transports.
/// The router works exclusively through this interface.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Per-asset analysis. Also warms the backend's per-asset cache.
    async fn analysis(&self, symbol: &str) -> Result<BackendResponse>;

    /// Trading strategy for a free-text goal
    async fn trading_strategy(&self, request: &StrategyRequest) -> Result<BackendResponse>;

    /// Impact of a policy or regulation on an asset
    async fn policy_impact(&self, request: &PolicyImpactRequest) -> Result<BackendResponse>;

    /// Free-form follow-up question about an asset
    async fn followup(&self, request: &FollowupRequest) -> Result<BackendResponse>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Backend name
    fn name(&self) -> &str;
}
