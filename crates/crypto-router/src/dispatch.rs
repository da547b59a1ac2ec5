//! Dispatch Sequencer
//!
//! Turns a classified message into backend calls and one normalized reply.
//!
//! ## Pipeline
//!
//! 1. `prime`: analysis call for the effective asset, warming the backend's
//!    per-asset cache. Failure is logged and discarded.
//! 2. `answer`: the intent-specific call. Always runs after step 1 has
//!    settled, whatever its outcome.
//! 3. `normalize`: coerce the answer into a `NormalizedResponse`.
//!
//! A turn with no effective asset makes no calls at all.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use agent_core::{
    AgentError, BackendResponse, Capability, FollowupRequest, PolicyImpactRequest,
    StrategyRequest, provider::AnalysisBackend,
};

use crate::error::{Result, RouterError};
use crate::model::{EMPTY_ANSWER_FALLBACK, Intent, NormalizedResponse, Ticker};

/// Everything the sequencer needs to know about one user turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnPlan {
    /// Ticker used for the backend calls (this turn's, else the context's)
    pub effective_asset: Option<Ticker>,
    /// Ticker typed in this message
    pub detected: Option<Ticker>,
    pub intent: Intent,
    /// Raw user text, forwarded as goal / policy description / question
    pub text: String,
}

/// Dispatcher configuration
#[derive(Clone, Debug)]
pub struct DispatchConfig {
    /// Upper bound on each individual backend call
    pub call_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(30),
        }
    }
}

/// Result of the cache-warming step
#[derive(Debug)]
pub enum PrimingOutcome {
    /// Analysis succeeded; kept for reuse by direct analysis
    Warmed(BackendResponse),
    /// Analysis failed; the turn continues regardless
    Failed(RouterError),
}

/// Ordered two-call sequencer over an `AnalysisBackend`
pub struct Dispatcher {
    backend: Arc<dyn AnalysisBackend>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn AnalysisBackend>, config: DispatchConfig) -> Self {
        Self { backend, config }
    }

    /// Create with default configuration
    pub fn with_defaults(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self::new(backend, DispatchConfig::default())
    }

    /// Run the pipeline for one turn. Never fails: every error ends in a reply.
    pub async fn dispatch(&self, plan: &TurnPlan) -> NormalizedResponse {
        let Some(asset) = plan.effective_asset else {
            tracing::debug!("No asset in play, answering with capability description");
            return NormalizedResponse::no_subject();
        };

        let primed = self.prime(asset).await;

        match self.answer(asset, plan, primed).await {
            Ok(resp) => normalize(resp),
            Err(e) => {
                tracing::error!(
                    asset = %asset,
                    intent = %plan.intent,
                    error = %e,
                    "Dispatch failed"
                );
                NormalizedResponse::dispatch_error()
            }
        }
    }

    /// Step 1: warm the backend cache for `asset`
    pub async fn prime(&self, asset: Ticker) -> PrimingOutcome {
        match self.call(Capability::Analysis, self.backend.analysis(asset.as_str())).await {
            Ok(resp) => {
                tracing::debug!(asset = %asset, "Analysis cache populated");
                PrimingOutcome::Warmed(resp)
            }
            Err(e) => {
                tracing::warn!(asset = %asset, error = %e, "Could not pre-load analysis");
                PrimingOutcome::Failed(RouterError::Priming(e))
            }
        }
    }

    /// Step 2: the intent-specific call
    async fn answer(
        &self,
        asset: Ticker,
        plan: &TurnPlan,
        primed: PrimingOutcome,
    ) -> Result<BackendResponse> {
        let symbol = asset.as_str();

        let result = match plan.intent {
            Intent::Strategy => {
                let request = StrategyRequest::new(symbol, plan.text.as_str());
                self.call(Capability::TradingStrategy, self.backend.trading_strategy(&request))
                    .await
            }
            Intent::Policy => {
                let request = PolicyImpactRequest::new(symbol, plan.text.as_str());
                self.call(Capability::PolicyImpact, self.backend.policy_impact(&request))
                    .await
            }
            Intent::DirectAnalysis => match primed {
                PrimingOutcome::Warmed(resp) => Ok(resp),
                PrimingOutcome::Failed(_) => {
                    tracing::debug!(asset = %asset, "Re-fetching analysis after failed priming");
                    self.call(Capability::Analysis, self.backend.analysis(symbol)).await
                }
            },
            Intent::Followup => {
                let request = FollowupRequest::new(symbol, plan.text.as_str());
                self.call(Capability::Followup, self.backend.followup(&request))
                    .await
            }
        };

        result.map_err(RouterError::Dispatch)
    }

    /// Apply the per-call timeout
    async fn call<F>(&self, capability: Capability, fut: F) -> agent_core::Result<BackendResponse>
    where
        F: Future<Output = agent_core::Result<BackendResponse>>,
    {
        match tokio::time::timeout(self.config.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AgentError::Timeout {
                capability,
                secs: self.config.call_timeout.as_secs(),
            }),
        }
    }
}

/// Coerce a backend answer into the single reply shape
pub fn normalize(resp: BackendResponse) -> NormalizedResponse {
    let text = resp
        .answer_text()
        .unwrap_or(EMPTY_ANSWER_FALLBACK)
        .to_string();

    NormalizedResponse {
        text,
        sentiment_score: resp.sentiment_score,
        sources: resp.sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockBackend, MockReply};
    use crate::model::{DISPATCH_ERROR_MESSAGE, NO_SUBJECT_MESSAGE};
    use agent_core::Source;

    fn plan(asset: Option<Ticker>, intent: Intent, text: &str) -> TurnPlan {
        TurnPlan {
            effective_asset: asset,
            detected: asset,
            intent,
            text: text.to_string(),
        }
    }

    fn dispatcher(backend: &Arc<MockBackend>) -> Dispatcher {
        Dispatcher::with_defaults(backend.clone())
    }

    #[tokio::test]
    async fn test_no_subject_makes_no_calls() {
        let backend = Arc::new(MockBackend::new());
        let reply = dispatcher(&backend)
            .dispatch(&plan(None, Intent::Followup, "What is blockchain?"))
            .await;

        assert_eq!(reply.text, NO_SUBJECT_MESSAGE);
        assert!(reply.sentiment_score.is_none());
        assert!(reply.sources.is_empty());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_priming_precedes_intent_call() {
        let backend = Arc::new(MockBackend::new());
        let d = dispatcher(&backend);

        d.dispatch(&plan(Some(Ticker::Btc), Intent::Strategy, "best time to buy?")).await;
        d.dispatch(&plan(Some(Ticker::Eth), Intent::Policy, "SEC regulation")).await;
        d.dispatch(&plan(Some(Ticker::Sol), Intent::Followup, "and volume?")).await;

        assert_eq!(
            backend.capabilities_called(),
            vec![
                Capability::Analysis,
                Capability::TradingStrategy,
                Capability::Analysis,
                Capability::PolicyImpact,
                Capability::Analysis,
                Capability::Followup,
            ]
        );

        let calls = backend.calls();
        assert_eq!(calls[1].symbol, "BTC");
        assert_eq!(calls[1].text.as_deref(), Some("best time to buy?"));
        assert_eq!(calls[3].text.as_deref(), Some("SEC regulation"));
    }

    #[tokio::test]
    async fn test_direct_analysis_reuses_primed_result() {
        let backend = Arc::new(MockBackend::new());
        let reply = dispatcher(&backend)
            .dispatch(&plan(Some(Ticker::Btc), Intent::DirectAnalysis, "Analyze BTC"))
            .await;

        assert_eq!(backend.capabilities_called(), vec![Capability::Analysis]);
        assert!(reply.text.contains("BTC"));
        assert_eq!(reply.sentiment_score, Some(0.35));
        assert_eq!(reply.sources.len(), 2);
    }

    #[tokio::test]
    async fn test_priming_failure_is_not_fatal() {
        let backend = Arc::new(MockBackend::new().failing(Capability::Analysis));
        let reply = dispatcher(&backend)
            .dispatch(&plan(Some(Ticker::Eth), Intent::Followup, "what about fees?"))
            .await;

        assert_eq!(
            backend.capabilities_called(),
            vec![Capability::Analysis, Capability::Followup]
        );
        assert!(reply.text.contains("ETH"));
    }

    #[tokio::test]
    async fn test_direct_analysis_refetches_after_failed_priming() {
        let backend = Arc::new(
            MockBackend::new().with_reply(Capability::Analysis, MockReply::Unreachable),
        );
        let reply = dispatcher(&backend)
            .dispatch(&plan(Some(Ticker::Ada), Intent::DirectAnalysis, "ADA"))
            .await;

        assert_eq!(
            backend.capabilities_called(),
            vec![Capability::Analysis, Capability::Analysis]
        );
        assert_eq!(reply.text, DISPATCH_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_intent_failure_surfaces_error_reply() {
        let backend = Arc::new(MockBackend::new().failing(Capability::PolicyImpact));
        let reply = dispatcher(&backend)
            .dispatch(&plan(Some(Ticker::Xrp), Intent::Policy, "regulation impact"))
            .await;

        assert_eq!(reply.text, DISPATCH_ERROR_MESSAGE);
        assert!(reply.sentiment_score.is_none());
        assert!(reply.sources.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_a_failure() {
        let slow = MockReply::Delayed(Duration::from_millis(500), BackendResponse::text("late"));
        let backend = Arc::new(
            MockBackend::new()
                .with_reply(Capability::Analysis, slow.clone())
                .with_reply(Capability::Followup, slow),
        );
        let d = Dispatcher::new(
            backend.clone(),
            DispatchConfig {
                call_timeout: Duration::from_millis(20),
            },
        );

        let reply = d
            .dispatch(&plan(Some(Ticker::Dot), Intent::Followup, "and staking?"))
            .await;

        // priming timed out, follow-up still attempted, then timed out too
        assert_eq!(
            backend.capabilities_called(),
            vec![Capability::Analysis, Capability::Followup]
        );
        assert_eq!(reply.text, DISPATCH_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_prime_reports_typed_failure() {
        let backend = Arc::new(MockBackend::new().failing(Capability::Analysis));
        match dispatcher(&backend).prime(Ticker::Btc).await {
            PrimingOutcome::Failed(RouterError::Priming(AgentError::Status { status, .. })) => {
                assert_eq!(status, 500);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_normalize_priority_is_deterministic() {
        let resp = BackendResponse {
            response: None,
            combined_analysis: Some("combined".into()),
            strategy: Some("strategy".into()),
            prediction: Some("prediction".into()),
            impact_analysis: Some("impact".into()),
            sentiment_score: Some(0.1),
            sources: vec![Source::new("A", None), Source::new("B", None)],
        };

        for _ in 0..3 {
            let n = normalize(resp.clone());
            assert_eq!(n.text, "combined");
            assert_eq!(n.sentiment_score, Some(0.1));
            let names: Vec<_> = n.sources.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, vec!["A", "B"]);
        }

        let only_prediction = BackendResponse {
            prediction: Some("up".into()),
            impact_analysis: Some("down".into()),
            ..Default::default()
        };
        assert_eq!(normalize(only_prediction).text, "up");
    }

    #[test]
    fn test_normalize_fallback() {
        let n = normalize(BackendResponse::default());
        assert_eq!(n.text, EMPTY_ANSWER_FALLBACK);
        assert!(n.sentiment_score.is_none());
        assert!(n.sources.is_empty());
    }
}
