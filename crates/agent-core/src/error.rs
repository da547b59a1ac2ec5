//! Error Types

use thiserror::Error;

use crate::provider::Capability;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Transport-level failure talking to the analysis backend
    #[error("Network error calling {capability}: {message}")]
    Network {
        capability: Capability,
        message: String,
    },

    /// Backend answered with a non-success status
    #[error("{capability} returned status {status}")]
    Status { capability: Capability, status: u16 },

    /// Backend did not answer within the configured window
    #[error("{capability} timed out after {secs}s")]
    Timeout { capability: Capability, secs: u64 },

    /// Backend answered, but the body could not be decoded
    #[error("Malformed response from {capability}: {message}")]
    MalformedResponse {
        capability: Capability,
        message: String,
    },

    /// A turn is already in flight for this conversation
    #[error("A turn is already in flight")]
    Busy,

    /// Submitted text was blank
    #[error("Message is empty")]
    EmptyInput,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AgentError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } | Self::Busy => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Capability the error originated from, if any
    pub fn capability(&self) -> Option<Capability> {
        match self {
            Self::Network { capability, .. }
            | Self::Status { capability, .. }
            | Self::Timeout { capability, .. }
            | Self::MalformedResponse { capability, .. } => Some(*capability),
            _ => None,
        }
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => {
                "The analysis service could not be reached. Please try again.".into()
            }
            Self::Status { status, .. } if *status == 429 => {
                "You've made too many requests. Please wait a moment.".into()
            }
            Self::Status { .. } => "The analysis service returned an error.".into(),
            Self::Timeout { .. } => "The analysis took too long. Please try again.".into(),
            Self::MalformedResponse { .. } => {
                "The analysis service sent an unreadable answer.".into()
            }
            Self::Busy => "Still working on your previous question.".into(),
            Self::EmptyInput => "Please type a question first.".into(),
            Self::Config(_) => "The chat service is misconfigured.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let timeout = AgentError::Timeout {
            capability: Capability::Analysis,
            secs: 30,
        };
        assert!(timeout.is_retryable());

        let server = AgentError::Status {
            capability: Capability::Followup,
            status: 503,
        };
        assert!(server.is_retryable());

        let client = AgentError::Status {
            capability: Capability::Followup,
            status: 404,
        };
        assert!(!client.is_retryable());
        assert!(!AgentError::EmptyInput.is_retryable());
    }

    #[test]
    fn test_capability_is_carried() {
        let err = AgentError::MalformedResponse {
            capability: Capability::PolicyImpact,
            message: "expected object".into(),
        };
        assert_eq!(err.capability(), Some(Capability::PolicyImpact));
        assert_eq!(AgentError::Busy.capability(), None);
        assert!(err.to_string().contains("policy-impact"));
    }
}
