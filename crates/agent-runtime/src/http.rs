//! HTTP Analysis Backend
//!
//! Implementation of `AnalysisBackend` for the JSON analysis service.
//!
//! | Capability | Request |
//! |---|---|
//! | analysis | `GET {base}/analyze/{SYMBOL}` |
//! | trading-strategy | `POST {base}/strategy` |
//! | policy-impact | `POST {base}/policy-impact` |
//! | followup | `POST {base}/followup` |

use std::time::Duration;

use agent_core::{
    AgentError, BackendResponse, Capability, FollowupRequest, PolicyImpactRequest, Result,
    StrategyRequest, provider::AnalysisBackend,
};
use async_trait::async_trait;

/// HTTP backend configuration
#[derive(Clone, Debug)]
pub struct HttpBackendConfig {
    /// Base URL of the analysis API, including any path prefix
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".into(),
            timeout_secs: 30,
        }
    }
}

impl HttpBackendConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("ANALYSIS_API_URL").unwrap_or(defaults.base_url);
        let timeout_secs = std::env::var("ANALYSIS_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            base_url,
            timeout_secs,
        }
    }
}

/// Analysis backend over HTTP
pub struct HttpBackend {
    client: reqwest::Client,
    config: HttpBackendConfig,
}

impl HttpBackend {
    /// Create a backend for `base_url` with default timeouts
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(HttpBackendConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    /// Create from configuration
    pub fn from_config(config: HttpBackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(HttpBackendConfig::from_env())
    }

    pub fn config(&self) -> &HttpBackendConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send a request and decode the shared response shape
    async fn send(
        &self,
        capability: Capability,
        request: reqwest::RequestBuilder,
    ) -> Result<BackendResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(capability, &e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%capability, status = status.as_u16(), "Backend returned error status");
            return Err(AgentError::Status {
                capability,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(capability, &e))?;

        serde_json::from_slice(&body).map_err(|e| AgentError::MalformedResponse {
            capability,
            message: e.to_string(),
        })
    }

    fn transport_error(&self, capability: Capability, err: &reqwest::Error) -> AgentError {
        if err.is_timeout() {
            AgentError::Timeout {
                capability,
                secs: self.config.timeout_secs,
            }
        } else {
            AgentError::Network {
                capability,
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn analysis(&self, symbol: &str) -> Result<BackendResponse> {
        let url = self.endpoint(&format!("analyze/{}", symbol.to_uppercase()));
        tracing::debug!(%url, "GET analysis");
        self.send(Capability::Analysis, self.client.get(url)).await
    }

    async fn trading_strategy(&self, request: &StrategyRequest) -> Result<BackendResponse> {
        let url = self.endpoint("strategy");
        self.send(Capability::TradingStrategy, self.client.post(url).json(request))
            .await
    }

    async fn policy_impact(&self, request: &PolicyImpactRequest) -> Result<BackendResponse> {
        let url = self.endpoint("policy-impact");
        self.send(Capability::PolicyImpact, self.client.post(url).json(request))
            .await
    }

    async fn followup(&self, request: &FollowupRequest) -> Result<BackendResponse> {
        let url = self.endpoint("followup");
        self.send(Capability::Followup, self.client.post(url).json(request))
            .await
    }

    async fn health_check(&self) -> Result<bool> {
        // any HTTP answer means the service is up
        match self.client.get(&self.config.base_url).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Analysis backend health check failed: {}", e);
                Ok(false)
            }
        }
    }

    fn name(&self) -> &str {
        "HttpBackend"
    }
}
