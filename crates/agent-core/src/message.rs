//! Conversation Turns
//!
//! Standard turn format used across the chat front-end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a turn's author
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User input
    User,
    /// Assistant (backend) response
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Provenance of a claim made in an assistant turn
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Publisher or feed name (e.g. "CoinDesk")
    pub name: String,

    /// Link to the material, when the backend has one
    #[serde(default)]
    pub url: Option<String>,
}

impl Source {
    pub fn new(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }
}

/// A single entry in a conversation transcript.
///
/// Turns are never edited once appended; the transcript only grows.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced the turn
    pub role: Role,

    /// Text content
    pub text: String,

    /// Backend sentiment score, assistant turns only
    #[serde(default)]
    pub sentiment_score: Option<f64>,

    /// Sources in the order the backend returned them
    #[serde(default)]
    pub sources: Vec<Source>,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            sentiment_score: None,
            sources: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant turn
    pub fn assistant(
        text: impl Into<String>,
        sentiment_score: Option<f64>,
        sources: Vec<Source>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            sentiment_score,
            sources,
            timestamp: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
