//! Symbol Resolver
//!
//! Maps free text to a known ticker. Literal tickers (whole word, any case)
//! always win over asset names; names are plain substring matches checked in
//! table order.
//!
//! Name matching does not respect word boundaries, so a name embedded in an
//! unrelated word still resolves (e.g. "shibari" resolves to SHIB).

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Ticker;

/// Swappable text-to-ticker strategy
pub trait SymbolResolver: Send + Sync {
    fn resolve(&self, text: &str) -> Option<Ticker>;
}

/// Name → ticker table, checked in order
const NAME_TABLE: &[(&str, Ticker)] = &[
    ("bitcoin", Ticker::Btc),
    ("ethereum", Ticker::Eth),
    ("solana", Ticker::Sol),
    ("cardano", Ticker::Ada),
    ("ripple", Ticker::Xrp),
    ("polkadot", Ticker::Dot),
    ("chainlink", Ticker::Link),
    ("litecoin", Ticker::Ltc),
    ("dogecoin", Ticker::Doge),
    ("doge", Ticker::Doge),
    ("avalanche", Ticker::Avax),
    ("polygon", Ticker::Matic),
    ("uniswap", Ticker::Uni),
    ("shiba", Ticker::Shib),
];

static TICKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = Ticker::ALL
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b({alternation})\b")).expect("ticker pattern is valid")
});

/// Keyword/regex resolver
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordResolver;

impl KeywordResolver {
    pub const fn new() -> Self {
        Self
    }

    fn literal_ticker(text: &str) -> Option<Ticker> {
        TICKER_PATTERN
            .find(text)
            .and_then(|m| m.as_str().parse().ok())
    }

    fn named_asset(text: &str) -> Option<Ticker> {
        let lowered = text.to_lowercase();
        NAME_TABLE
            .iter()
            .find(|(name, _)| lowered.contains(name))
            .map(|(_, ticker)| *ticker)
    }
}

impl SymbolResolver for KeywordResolver {
    fn resolve(&self, text: &str) -> Option<Ticker> {
        Self::literal_ticker(text).or_else(|| Self::named_asset(text))
    }
}
