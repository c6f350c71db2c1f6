use crate::battle::commands::BattleCommand;
use crate::battle::rng::BattleRng;
use crate::battle::state::{ActionFailureReason, BattleEvent};
use crate::config::BattleConfig;
use crate::player::Side;
use crate::pokemon::{Combatant, StatusCondition};
use schema::{ElementalType, StatusType};

/// Result of checking a combatant's status right before it acts.
#[derive(Debug, Clone, PartialEq)]
pub struct GateOutcome {
    pub can_act: bool,
    pub commands: Vec<BattleCommand>,
}

impl GateOutcome {
    fn proceed(commands: Vec<BattleCommand>) -> Self {
        Self {
            can_act: true,
            commands,
        }
    }

    fn prevented(commands: Vec<BattleCommand>) -> Self {
        Self {
            can_act: false,
            commands,
        }
    }
}

/// Types that shrug off a status entirely.
pub fn is_immune_to_status(combatant: &Combatant, status: StatusType) -> bool {
    match status {
        StatusType::Burn => combatant.has_type(ElementalType::Fire),
        StatusType::Freeze => combatant.has_type(ElementalType::Ice),
        StatusType::Poison => {
            combatant.has_type(ElementalType::Poison) || combatant.has_type(ElementalType::Steel)
        }
        StatusType::Paralysis => combatant.has_type(ElementalType::Electric),
        StatusType::Sleep => false,
    }
}

/// A status can only land on a standing combatant with no status and no immunity.
pub fn can_inflict(combatant: &Combatant, status: StatusType) -> bool {
    !combatant.is_fainted() && combatant.status.is_none() && !is_immune_to_status(combatant, status)
}

/// Build the concrete condition. Sleep draws its duration here.
pub fn roll_condition(
    status: StatusType,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> StatusCondition {
    match status {
        StatusType::Paralysis => StatusCondition::Paralysis,
        StatusType::Burn => StatusCondition::Burn,
        StatusType::Poison => StatusCondition::Poison,
        StatusType::Freeze => StatusCondition::Freeze,
        StatusType::Sleep => {
            let turns = rng.range_inclusive(
                config.sleep_turns_min as u32,
                config.sleep_turns_max as u32,
                "sleep duration",
            );
            StatusCondition::Sleep(turns as u8)
        }
    }
}

/// Status check run each time a combatant is about to act.
pub fn before_action(
    side: Side,
    combatant: &Combatant,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> GateOutcome {
    let failed = |reason: ActionFailureReason| {
        BattleCommand::EmitEvent(BattleEvent::ActionFailed { side, reason })
    };

    match combatant.status {
        Some(StatusCondition::Sleep(turns)) => match turns.saturating_sub(1) {
            0 => GateOutcome::proceed(vec![
                BattleCommand::SetStatus {
                    target: side,
                    status: None,
                },
                BattleCommand::EmitEvent(BattleEvent::WokeUp { target: side }),
            ]),
            remaining => GateOutcome::prevented(vec![
                BattleCommand::SetStatus {
                    target: side,
                    status: Some(StatusCondition::Sleep(remaining)),
                },
                failed(ActionFailureReason::IsAsleep),
            ]),
        },
        Some(StatusCondition::Freeze) => {
            if rng.percent_check(config.freeze_thaw_percent, "freeze thaw") {
                GateOutcome::proceed(vec![
                    BattleCommand::SetStatus {
                        target: side,
                        status: None,
                    },
                    BattleCommand::EmitEvent(BattleEvent::Thawed { target: side }),
                ])
            } else {
                GateOutcome::prevented(vec![failed(ActionFailureReason::IsFrozen)])
            }
        }
        Some(StatusCondition::Paralysis) => {
            if rng.percent_check(config.paralysis_skip_percent, "full paralysis") {
                GateOutcome::prevented(vec![failed(ActionFailureReason::IsParalyzed)])
            } else {
                GateOutcome::proceed(Vec::new())
            }
        }
        Some(StatusCondition::Burn) | Some(StatusCondition::Poison) | None => {
            GateOutcome::proceed(Vec::new())
        }
    }
}

/// Burn and poison chip damage. A fainted combatant takes none.
pub fn end_of_turn(side: Side, combatant: &Combatant, config: &BattleConfig) -> Vec<BattleCommand> {
    if combatant.is_fainted() {
        return Vec::new();
    }
    let (status, divisor) = match combatant.status {
        Some(status @ StatusCondition::Burn) => (status, config.burn_chip_divisor),
        Some(status @ StatusCondition::Poison) => (status, config.poison_chip_divisor),
        _ => return Vec::new(),
    };
    let damage = (combatant.max_hp() / divisor).max(1);
    let remaining_hp = combatant.current_hp.saturating_sub(damage);

    vec![
        BattleCommand::EmitEvent(BattleEvent::StatusDamage {
            target: side,
            status,
            damage: damage.min(combatant.current_hp),
            remaining_hp,
        }),
        BattleCommand::DealDamage {
            target: side,
            amount: damage,
        },
    ]
}
