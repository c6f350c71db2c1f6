use crate::battle::state::{BattleEvent, BattleOutcome, BattleState, EventBus};
use crate::player::Side;
use crate::pokemon::StatusCondition;
use log::debug;
use schema::{Item, StatType};
use thiserror::Error;

/// Atomic commands representing final state changes.
///
/// Resolution code reads the state and returns a list of these; only
/// [`execute_command`] mutates. Events that follow directly from a state
/// change (damage dealt, fainting, stat-stage messages) are emitted by the
/// executor so they always agree with the state.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    DealDamage {
        target: Side,
        amount: u16,
    },
    Heal {
        target: Side,
        amount: u16,
    },
    SetStatus {
        target: Side,
        status: Option<StatusCondition>,
    },
    ChangeStatStage {
        target: Side,
        stat: StatType,
        delta: i8,
    },
    UsePp {
        target: Side,
        move_index: usize,
    },
    ConsumeItem {
        side: Side,
        item: Item,
    },
    RecordFleeAttempt,
    SetOutcome(BattleOutcome),
    EmitEvent(BattleEvent),
}

/// Error types for command execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    #[error("{side:?} has no move in slot {move_index}")]
    InvalidMoveIndex { side: Side, move_index: usize },
    #[error("{side:?} has no {item} to consume")]
    ItemMissing { side: Side, item: Item },
}

pub fn execute_command(
    command: BattleCommand,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), ExecutionError> {
    match command {
        BattleCommand::DealDamage { target, amount } => {
            let combatant = state.combatant_mut(target);
            let before = combatant.current_hp;
            let fainted = combatant.take_damage(amount);
            bus.push(BattleEvent::DamageDealt {
                target,
                damage: before - combatant.current_hp,
                remaining_hp: combatant.current_hp,
            });
            if fainted {
                debug!("{} fainted", combatant.name);
                bus.push(BattleEvent::Fainted { side: target });
            }
        }
        BattleCommand::Heal { target, amount } => {
            let combatant = state.combatant_mut(target);
            let restored = combatant.heal(amount);
            if restored > 0 {
                bus.push(BattleEvent::Healed {
                    target,
                    amount: restored,
                    new_hp: combatant.current_hp,
                });
            }
        }
        BattleCommand::SetStatus { target, status } => {
            state.combatant_mut(target).status = status;
        }
        BattleCommand::ChangeStatStage { target, stat, delta } => {
            let stages = &mut state.combatant_mut(target).stages;
            let old_stage = stages.get(stat);
            let applied = stages.modify(stat, delta);
            if applied == 0 {
                bus.push(BattleEvent::StatChangeBlocked {
                    target,
                    stat,
                    rising: delta > 0,
                });
            } else {
                bus.push(BattleEvent::StatStageChanged {
                    target,
                    stat,
                    old_stage,
                    new_stage: old_stage + applied,
                });
            }
        }
        BattleCommand::UsePp { target, move_index } => {
            let combatant = state.combatant_mut(target);
            let move_ = combatant
                .moves
                .get_mut(move_index)
                .ok_or(ExecutionError::InvalidMoveIndex {
                    side: target,
                    move_index,
                })?;
            move_.use_pp();
        }
        BattleCommand::ConsumeItem { side, item } => {
            if !state.bag_mut(side).take(item) {
                return Err(ExecutionError::ItemMissing { side, item });
            }
            state.items_used.push((side, item));
        }
        BattleCommand::RecordFleeAttempt => {
            state.flee_attempts += 1;
        }
        BattleCommand::SetOutcome(outcome) => {
            state.outcome = outcome;
        }
        BattleCommand::EmitEvent(event) => {
            bus.push(event);
        }
    }
    Ok(())
}

pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), ExecutionError> {
    for command in commands {
        execute_command(command, state, bus)?;
    }
    Ok(())
}
