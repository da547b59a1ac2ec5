//! Domain Models
//!
//! Tickers, intents and the normalized response shape every backend answer
//! is coerced into.

use std::str::FromStr;

use agent_core::Source;
use serde::{Deserialize, Serialize};

use crate::error::RouterError;

/// A cryptocurrency the router knows how to talk about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Ticker {
    Btc,
    Eth,
    Sol,
    Ada,
    Xrp,
    Dot,
    Link,
    Ltc,
    Doge,
    Avax,
    Matic,
    Uni,
    Shib,
}

impl Ticker {
    /// Every known ticker, in detection order
    pub const ALL: [Self; 13] = [
        Self::Btc,
        Self::Eth,
        Self::Sol,
        Self::Ada,
        Self::Xrp,
        Self::Dot,
        Self::Link,
        Self::Ltc,
        Self::Doge,
        Self::Avax,
        Self::Matic,
        Self::Uni,
        Self::Shib,
    ];

    /// Canonical upper-case symbol
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Eth => "ETH",
            Self::Sol => "SOL",
            Self::Ada => "ADA",
            Self::Xrp => "XRP",
            Self::Dot => "DOT",
            Self::Link => "LINK",
            Self::Ltc => "LTC",
            Self::Doge => "DOGE",
            Self::Avax => "AVAX",
            Self::Matic => "MATIC",
            Self::Uni => "UNI",
            Self::Shib => "SHIB",
        }
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ticker {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RouterError::UnknownTicker(s.to_string()))
    }
}

/// Classified purpose of a user message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Timing, strategy or forecasting question
    Strategy,
    /// Policy / regulation impact question
    Policy,
    /// Message that opens with the asset itself ("BTC", "analyze ETH ...")
    DirectAnalysis,
    /// Anything else about the current asset
    Followup,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Strategy => "STRATEGY",
            Self::Policy => "POLICY",
            Self::DirectAnalysis => "DIRECT_ANALYSIS",
            Self::Followup => "FOLLOWUP",
        };
        f.write_str(s)
    }
}

/// The single shape all backend answers are coerced into before becoming a turn
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub text: String,
    pub sentiment_score: Option<f64>,
    pub sources: Vec<Source>,
}

impl NormalizedResponse {
    /// Plain message with no score and no sources
    fn message(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sentiment_score: None,
            sources: Vec::new(),
        }
    }

    /// Reply used when neither this turn nor the context names an asset
    pub fn no_subject() -> Self {
        Self::message(NO_SUBJECT_MESSAGE)
    }

    /// Reply used when the intent-specific call fails
    pub fn dispatch_error() -> Self {
        Self::message(DISPATCH_ERROR_MESSAGE)
    }
}

/// Seed assistant turn of every conversation
pub const GREETING: &str = "Hello, I'm your crypto analysis assistant. I can help you understand \
market trends, analyze specific cryptocurrencies, and provide insights about the blockchain \
ecosystem. How can I assist you today?";

/// Capability description returned when no asset is in play
pub const NO_SUBJECT_MESSAGE: &str = "I can provide you with analysis on specific \
cryptocurrencies like Bitcoin (BTC), Ethereum (ETH), Solana (SOL), and more. Please ask about a \
specific cryptocurrency to get detailed insights.";

/// Substituted when a backend answer carries no text at all
pub const EMPTY_ANSWER_FALLBACK: &str =
    "I couldn't analyze that. Please try asking about a specific cryptocurrency.";

/// User-visible reply when the intent-specific call fails
pub const DISPATCH_ERROR_MESSAGE: &str = "I'm sorry, but I encountered an error while analyzing \
that. Please try again or ask about another cryptocurrency.";

/// Starter prompts offered on a fresh conversation
pub const SUGGESTED_QUERIES: [&str; 4] = [
    "Analyze Bitcoin's current market status",
    "What's happening with Ethereum?",
    "Show me the latest analysis for Solana",
    "What's the market sentiment for Cardano?",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_parse_is_case_insensitive() {
        assert_eq!("btc".parse::<Ticker>().unwrap(), Ticker::Btc);
        assert_eq!("Matic".parse::<Ticker>().unwrap(), Ticker::Matic);
        assert!("ATOM".parse::<Ticker>().is_err());
    }

    #[test]
    fn test_ticker_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Ticker::Doge).unwrap(), "\"DOGE\"");
        let t: Ticker = serde_json::from_str("\"SHIB\"").unwrap();
        assert_eq!(t, Ticker::Shib);
    }

    #[test]
    fn test_intent_display_matches_serde() {
        for intent in [
            Intent::Strategy,
            Intent::Policy,
            Intent::DirectAnalysis,
            Intent::Followup,
        ] {
            let json = serde_json::to_string(&intent).unwrap();
            assert_eq!(json.trim_matches('"'), intent.to_string());
        }
    }
}
