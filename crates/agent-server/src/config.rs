//! Server Configuration
//!
//! Read from the environment (after `.env` is loaded).

use std::time::Duration;

use agent_core::{AgentError, Result};
use agent_runtime::HttpBackendConfig;
use crypto_router::DispatchConfig;

/// Which analysis backend to talk to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendMode {
    /// Live analysis service over HTTP
    Http,
    /// Built-in canned answers, no network
    Mock,
}

impl std::str::FromStr for BackendMode {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "mock" => Ok(Self::Mock),
            other => Err(AgentError::Config(format!(
                "ANALYSIS_BACKEND must be 'http' or 'mock', got '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub backend: BackendMode,
    pub http: HttpBackendConfig,
    pub dispatch: DispatchConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
        let backend = std::env::var("ANALYSIS_BACKEND")
            .map_or(Ok(BackendMode::Http), |v| v.parse())?;
        let http = HttpBackendConfig::from_env();
        let dispatch = DispatchConfig {
            call_timeout: Duration::from_secs(http.timeout_secs),
        };

        Ok(Self {
            bind_addr,
            backend,
            http,
            dispatch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_mode_parse() {
        assert_eq!("mock".parse::<BackendMode>().unwrap(), BackendMode::Mock);
        assert_eq!(" HTTP ".parse::<BackendMode>().unwrap(), BackendMode::Http);
        assert!(matches!(
            "grpc".parse::<BackendMode>(),
            Err(AgentError::Config(_))
        ));
    }
}
