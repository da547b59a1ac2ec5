//! Mock Analysis Backend
//!
//! For testing and demo purposes. Returns canned analyses and records every
//! call in order.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use agent_core::{
    AgentError, BackendResponse, Capability, FollowupRequest, PolicyImpactRequest, Result,
    Source, StrategyRequest,
    provider::AnalysisBackend,
};
use async_trait::async_trait;

/// Scripted behaviour for one capability
#[derive(Clone, Debug)]
pub enum MockReply {
    /// Answer immediately
    Respond(BackendResponse),
    /// Answer after a delay
    Delayed(Duration, BackendResponse),
    /// Fail with a non-success status
    Status(u16),
    /// Fail at the transport level
    Unreachable,
}

/// One recorded backend call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockCall {
    pub capability: Capability,
    pub symbol: String,
    /// Goal, policy description or question, when the capability takes one
    pub text: Option<String>,
}

/// Mock backend with canned per-capability replies
#[derive(Default)]
pub struct MockBackend {
    overrides: HashMap<Capability, MockReply>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a capability
    pub fn with_reply(mut self, capability: Capability, reply: MockReply) -> Self {
        self.overrides.insert(capability, reply);
        self
    }

    /// Make a capability fail with HTTP 500
    pub fn failing(self, capability: Capability) -> Self {
        self.with_reply(capability, MockReply::Status(500))
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Capabilities called so far, in order
    pub fn capabilities_called(&self) -> Vec<Capability> {
        self.calls().into_iter().map(|c| c.capability).collect()
    }

    fn record(&self, capability: Capability, symbol: &str, text: Option<&str>) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MockCall {
                capability,
                symbol: symbol.to_string(),
                text: text.map(str::to_string),
            });
    }

    async fn reply(&self, capability: Capability, symbol: &str) -> Result<BackendResponse> {
        match self.overrides.get(&capability) {
            None => Ok(canned(capability, symbol)),
            Some(MockReply::Respond(resp)) => Ok(resp.clone()),
            Some(MockReply::Delayed(delay, resp)) => {
                tokio::time::sleep(*delay).await;
                Ok(resp.clone())
            }
            Some(MockReply::Status(status)) => Err(AgentError::Status {
                capability,
                status: *status,
            }),
            Some(MockReply::Unreachable) => Err(AgentError::Network {
                capability,
                message: "connection refused".into(),
            }),
        }
    }
}

/// Static demo answers
fn canned(capability: Capability, symbol: &str) -> BackendResponse {
    let coindesk = Source::new("CoinDesk", Some("https://www.coindesk.com/markets".into()));
    let glassnode = Source::new("Glassnode", Some("https://studio.glassnode.com".into()));

    match capability {
        Capability::Analysis => BackendResponse {
            combined_analysis: Some(format!(
                "{symbol} is consolidating after a volatile week. On-chain activity is steady \
                 and social sentiment is mildly positive."
            )),
            ..Default::default()
        }
        .with_sentiment(0.35)
        .with_source(coindesk)
        .with_source(glassnode),
        Capability::TradingStrategy => BackendResponse {
            strategy: Some(format!(
                "Consider staggered entries into {symbol} over several weeks rather than a single \
                 purchase, and size positions so a 50% drawdown is survivable."
            )),
            ..Default::default()
        }
        .with_sentiment(0.2)
        .with_source(coindesk),
        Capability::PolicyImpact => BackendResponse {
            impact_analysis: Some(format!(
                "Regulatory clarity has historically reduced volatility for {symbol}; tighter \
                 exchange rules tend to weigh on short-term liquidity."
            )),
            ..Default::default()
        }
        .with_sentiment(-0.1)
        .with_source(Source::new("Bloomberg", None)),
        Capability::Followup => BackendResponse::text(format!(
            "Based on the latest {symbol} analysis, sentiment is mildly positive \
             with moderate volume."
        ))
        .with_sentiment(0.3),
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn analysis(&self, symbol: &str) -> Result<BackendResponse> {
        self.record(Capability::Analysis, symbol, None);
        self.reply(Capability::Analysis, symbol).await
    }

    async fn trading_strategy(&self, request: &StrategyRequest) -> Result<BackendResponse> {
        self.record(Capability::TradingStrategy, &request.symbol, Some(&request.goal));
        self.reply(Capability::TradingStrategy, &request.symbol).await
    }

    async fn policy_impact(&self, request: &PolicyImpactRequest) -> Result<BackendResponse> {
        self.record(
            Capability::PolicyImpact,
            &request.symbol,
            Some(&request.policy_description),
        );
        self.reply(Capability::PolicyImpact, &request.symbol).await
    }

    async fn followup(&self, request: &FollowupRequest) -> Result<BackendResponse> {
        self.record(Capability::Followup, &request.symbol, Some(&request.question));
        self.reply(Capability::Followup, &request.symbol).await
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true) // Mock always healthy
    }

    fn name(&self) -> &str {
        "MockBackend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_analysis() {
        let backend = MockBackend::new();

        let resp = backend.analysis("BTC").await.unwrap();
        assert!(resp.answer_text().unwrap().contains("BTC"));
        assert_eq!(resp.sources.len(), 2);
        assert_eq!(backend.capabilities_called(), vec![Capability::Analysis]);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let backend = MockBackend::new().failing(Capability::Followup);

        let err = backend
            .followup(&FollowupRequest::new("ETH", "why?"))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Status { status: 500, .. }));

        let calls = backend.calls();
        assert_eq!(calls[0].symbol, "ETH");
        assert_eq!(calls[0].text.as_deref(), Some("why?"));
    }
}
