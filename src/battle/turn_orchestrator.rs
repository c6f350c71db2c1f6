use crate::battle::rng::BattleRng;
use crate::battle::state::BattleState;
use crate::battle::stats::effective_speed;
use crate::config::BattleConfig;
use crate::player::{PlayerAction, Side};
use log::debug;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPriority {
    /// Non-move tier from the config; every move sits below all of them.
    pub action_priority: Option<i8>,
    pub move_priority: i8,
    pub speed: u16,
}

impl ActionPriority {
    fn rank(&self, other: &Self) -> Ordering {
        self.action_priority
            .cmp(&other.action_priority)
            .then(self.move_priority.cmp(&other.move_priority))
            .then(self.speed.cmp(&other.speed))
    }
}

pub fn calculate_action_priority(
    state: &BattleState,
    side: Side,
    action: &PlayerAction,
    config: &BattleConfig,
) -> ActionPriority {
    let combatant = state.combatant(side);
    let speed = effective_speed(combatant, config);
    let tiers = &config.priorities;

    let (action_priority, move_priority) = match action {
        PlayerAction::Forfeit => (Some(tiers.forfeit), 0),
        PlayerAction::Flee => (Some(tiers.flee), 0),
        PlayerAction::UseItem(_) => (Some(tiers.item), 0),
        PlayerAction::Catch(_) => (Some(tiers.catch), 0),
        PlayerAction::Struggle => (None, 0),
        PlayerAction::UseMove { move_index } => (
            None,
            combatant
                .moves
                .get(*move_index)
                .map_or(0, |move_| move_.priority),
        ),
    };

    ActionPriority {
        action_priority,
        move_priority,
        speed,
    }
}

/// Order the two queued actions for this turn. Exact ties go to a coin flip.
pub fn determine_action_order(
    state: &BattleState,
    actions: &[PlayerAction; 2],
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> [Side; 2] {
    let player = calculate_action_priority(state, Side::Player, &actions[0], config);
    let opponent = calculate_action_priority(state, Side::Opponent, &actions[1], config);

    let player_first = match player.rank(&opponent) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => rng.coin_flip("speed tie"),
    };

    let order = if player_first {
        [Side::Player, Side::Opponent]
    } else {
        [Side::Opponent, Side::Player]
    };
    debug!(
        "action order {:?} (player {:?}, opponent {:?})",
        order, player, opponent
    );
    order
}
