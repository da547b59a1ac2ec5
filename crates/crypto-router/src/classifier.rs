//! Intent Classifier
//!
//! Classifies user messages into one of the router's fixed intents.
//! Checks run in priority order: strategy, policy, direct analysis, follow-up.

use crate::model::{Intent, Ticker};

/// Static keyword lists, matched as case-insensitive substrings
const STRATEGY_KEYWORDS: &[&str] = &[
    "when should",
    "strategy",
    "timing",
    "best time",
    "maximize",
    "predict",
    "forecast",
];

const POLICY_KEYWORDS: &[&str] = &["policy", "regulation", "impact", "affect"];

/// Intent classifier
pub struct IntentClassifier;

impl IntentClassifier {
    /// Classify `text`.
    ///
    /// `detected` must be the ticker found in this message, not the one
    /// carried over from context: only a freshly typed ticker can make a
    /// message a direct analysis request.
    pub fn classify(text: &str, detected: Option<Ticker>) -> Intent {
        let lowered = text.to_lowercase();

        if contains_any(&lowered, STRATEGY_KEYWORDS) {
            Intent::Strategy
        } else if contains_any(&lowered, POLICY_KEYWORDS) {
            Intent::Policy
        } else if detected.is_some_and(|ticker| opens_with_ticker(&lowered, ticker)) {
            Intent::DirectAnalysis
        } else {
            Intent::Followup
        }
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

fn opens_with_ticker(lowered: &str, ticker: Ticker) -> bool {
    let symbol = ticker.as_str().to_lowercase();
    lowered.starts_with(&symbol)
        || lowered
            .strip_prefix("analyze ")
            .is_some_and(|rest| rest.starts_with(&symbol))
}
