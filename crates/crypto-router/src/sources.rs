//! Source Provenance
//!
//! Coarse labels for the sources attached to assistant turns: what kind of
//! outlet a URL points at, and how much weight its publisher usually carries.

use agent_core::Source;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    News,
    ExchangeAnalysis,
    SocialMedia,
    OnChainData,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    Low,
    Medium,
    High,
}

const NEWS_HOSTS: &[&str] = &["coindesk", "cointelegraph", "bitcoin.com"];
const EXCHANGE_HOSTS: &[&str] = &["binance", "kraken", "coinbase"];
const SOCIAL_HOSTS: &[&str] = &["twitter", "reddit", "medium"];
const ON_CHAIN_HOSTS: &[&str] = &["glassnode", "cryptoquant", "blockchair"];

const HIGH_RELIABILITY: &[&str] = &[
    "CoinDesk",
    "Binance Research",
    "Glassnode",
    "CryptoQuant",
    "Bloomberg",
    "CoinMetrics",
    "Chainalysis",
];
const MEDIUM_RELIABILITY: &[&str] = &[
    "Twitter",
    "Medium",
    "CoinTelegraph",
    "Decrypt",
    "BeInCrypto",
];
const LOW_RELIABILITY: &[&str] = &["Reddit", "Telegram", "Anonymous", "4chan"];

impl SourceKind {
    /// Classify by URL; sources without a URL count as news
    pub fn from_url(url: Option<&str>) -> Self {
        let Some(url) = url else {
            return Self::News;
        };
        let matches = |hosts: &[&str]| hosts.iter().any(|h| url.contains(h));

        if matches(NEWS_HOSTS) {
            Self::News
        } else if matches(EXCHANGE_HOSTS) {
            Self::ExchangeAnalysis
        } else if matches(SOCIAL_HOSTS) {
            Self::SocialMedia
        } else if matches(ON_CHAIN_HOSTS) {
            Self::OnChainData
        } else {
            Self::News
        }
    }
}

impl Reliability {
    /// Rate by publisher name (case-sensitive); unknown publishers are medium
    pub fn from_name(name: &str) -> Self {
        let matches = |list: &[&str]| list.iter().any(|item| name.contains(item));

        if matches(HIGH_RELIABILITY) {
            Self::High
        } else if matches(MEDIUM_RELIABILITY) {
            Self::Medium
        } else if matches(LOW_RELIABILITY) {
            Self::Low
        } else {
            Self::Medium
        }
    }
}

/// Convenience accessors on `Source`
pub trait SourceExt {
    fn kind(&self) -> SourceKind;
    fn reliability(&self) -> Reliability;
}

impl SourceExt for Source {
    fn kind(&self) -> SourceKind {
        SourceKind::from_url(self.url.as_deref())
    }

    fn reliability(&self) -> Reliability {
        Reliability::from_name(&self.name)
    }
}
