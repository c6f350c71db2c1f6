//! Action sources: whatever decides what a side does each turn. The engine
//! asks a source whenever it waits in action selection.

use crate::battle::resolver::valid_actions;
use crate::battle::state::{BattleState, EventBus};
use crate::errors::BattleEngineError;
use crate::player::{PlayerAction, Side};
use log::warn;
use std::collections::VecDeque;

pub trait ActionSource {
    /// Decide on the next action for `side`.
    fn choose_action(&mut self, state: &BattleState, side: Side) -> PlayerAction;

    /// Called when the engine refused the last choice. The source will be
    /// asked again.
    fn on_rejected(&mut self, action: &PlayerAction, error: &BattleEngineError) {
        warn!("action {:?} rejected: {}", action, error);
    }

    /// Events of a resolved turn.
    fn observe(&mut self, _state: &BattleState, _events: &EventBus) {}
}

/// Plays back a fixed list of actions, then falls back to `Forfeit`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedActions {
    actions: VecDeque<PlayerAction>,
}

impl ScriptedActions {
    pub fn new(actions: impl IntoIterator<Item = PlayerAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl ActionSource for ScriptedActions {
    fn choose_action(&mut self, _state: &BattleState, _side: Side) -> PlayerAction {
        self.actions.pop_front().unwrap_or(PlayerAction::Forfeit)
    }
}

/// Always picks the first legal move, or Struggle once nothing has PP.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstUsableMove;

impl ActionSource for FirstUsableMove {
    fn choose_action(&mut self, state: &BattleState, side: Side) -> PlayerAction {
        valid_actions(state, side)
            .into_iter()
            .find(|action| {
                matches!(
                    action,
                    PlayerAction::UseMove { .. } | PlayerAction::Struggle
                )
            })
            .unwrap_or(PlayerAction::Forfeit)
    }
}
