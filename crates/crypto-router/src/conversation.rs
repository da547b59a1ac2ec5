//! Conversation State
//!
//! The ordered transcript plus the single "current asset" slot.

use agent_core::Turn;
use serde::Serialize;

use crate::model::{GREETING, Ticker};

/// Transcript and current subject of one conversation.
///
/// Turns are append-only and the asset slot is only written by the
/// context tracker.
#[derive(Clone, Debug, Serialize)]
pub struct ConversationState {
    turns: Vec<Turn>,
    current_asset: Option<Ticker>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    /// Fresh conversation: one greeting turn, no asset
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::assistant(GREETING, None, Vec::new())],
            current_asset: None,
        }
    }

    pub fn append_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub(crate) fn set_current_asset(&mut self, ticker: Ticker) {
        self.current_asset = Some(ticker);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub const fn current_asset(&self) -> Option<Ticker> {
        self.current_asset
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// True until the user has said anything
    pub fn is_fresh(&self) -> bool {
        !self.turns.iter().any(Turn::is_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::Role;

    #[test]
    fn test_new_conversation_is_seeded() {
        let state = ConversationState::new();
        assert_eq!(state.len(), 1);
        assert_eq!(state.turns()[0].role, Role::Assistant);
        assert_eq!(state.turns()[0].text, GREETING);
        assert!(state.current_asset().is_none());
        assert!(state.is_fresh());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut state = ConversationState::new();
        state.append_turn(Turn::user("Analyze BTC"));
        state.append_turn(Turn::assistant("BTC looks strong", Some(0.4), vec![]));

        let texts: Vec<_> = state.turns().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec![GREETING, "Analyze BTC", "BTC looks strong"]);
        assert!(!state.is_fresh());
        assert_eq!(state.last().map(|t| t.role), Some(Role::Assistant));
    }
}
