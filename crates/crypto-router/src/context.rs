//! Context Tracker
//!
//! Decides, once per user turn, which asset the turn is about and whether the
//! conversation's current asset changes.

use crate::conversation::ConversationState;
use crate::model::Ticker;

pub struct ContextTracker;

impl ContextTracker {
    /// Record this turn's detection and return the effective asset.
    ///
    /// A fresh detection overwrites the slot; no detection leaves it alone.
    /// `None` means neither this turn nor the context names an asset.
    pub fn update_and_resolve(
        state: &mut ConversationState,
        detected: Option<Ticker>,
    ) -> Option<Ticker> {
        if let Some(ticker) = detected {
            if state.current_asset() != Some(ticker) {
                tracing::debug!(
                    from = ?state.current_asset(),
                    to = %ticker,
                    "Switching current asset"
                );
                state.set_current_asset(ticker);
            }
        }

        detected.or_else(|| state.current_asset())
    }
}
