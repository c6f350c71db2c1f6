use crate::battle::calculators::calculate_damage;
use crate::battle::catch::attempt_catch;
use crate::battle::commands::BattleCommand;
use crate::battle::move_effects::{apply_move_effects, EffectContext};
use crate::battle::rng::BattleRng;
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleKind, BattleOutcome, BattleState};
use crate::battle::stats::{effective_speed, hit_chance};
use crate::battle::status::before_action;
use crate::config::{BattleConfig, FleeRule};
use crate::errors::{ActionError, BattleEngineError, BattleResult};
use crate::moves::{Move, MoveAccuracy, MoveEffect};
use crate::player::{PlayerAction, Side};
use crate::pokemon::{Combatant, MAX_STAT_STAGE};
use log::debug;
use schema::{Item, ItemEffect, StatType, Target};

/// Resolution of hit chances uses a 0..10000 roll.
const ACCURACY_SCALE: u32 = 10_000;

/// Check an action against the current state without changing anything.
pub fn validate_action(state: &BattleState, side: Side, action: &PlayerAction) -> BattleResult<()> {
    if state.is_terminal() {
        return Err(BattleEngineError::AlreadyTerminal(state.outcome));
    }
    let combatant = state.combatant(side);
    if matches!(action, PlayerAction::Forfeit) {
        return Ok(());
    }
    if combatant.is_fainted() {
        return Err(ActionError::CombatantFainted(combatant.name.clone()).into());
    }

    match action {
        PlayerAction::UseMove { move_index } => {
            let move_ = combatant
                .moves
                .get(*move_index)
                .ok_or(ActionError::InvalidMoveIndex {
                    index: *move_index,
                    move_count: combatant.moves.len(),
                })?;
            if move_.pp == 0 {
                return Err(ActionError::NoPpRemaining(move_.name.clone()).into());
            }
        }
        PlayerAction::Struggle => {
            if combatant.has_usable_move() {
                return Err(ActionError::StruggleNotAllowed.into());
            }
        }
        PlayerAction::UseItem(item) => {
            if item.is_capture_ball() {
                return Err(ActionError::CaptureItemUsedAsItem(item.to_string()).into());
            }
            if !state.bag(side).contains(*item) {
                return Err(ActionError::ItemNotInBag(item.to_string()).into());
            }
            if !item_has_effect(*item, combatant) {
                return Err(ActionError::ItemHasNoEffect(item.to_string()).into());
            }
        }
        PlayerAction::Catch(ball) => {
            if side == Side::Opponent {
                return Err(ActionError::OpponentCannotCatch.into());
            }
            if state.kind == BattleKind::Trainer {
                return Err(ActionError::CannotCatchTrainerPokemon.into());
            }
            if !ball.is_capture_ball() {
                return Err(ActionError::NotACaptureItem(ball.to_string()).into());
            }
            if !state.bag(side).contains(*ball) {
                return Err(ActionError::ItemNotInBag(ball.to_string()).into());
            }
        }
        PlayerAction::Flee => {
            if side == Side::Opponent {
                return Err(ActionError::OpponentCannotFlee.into());
            }
            if state.kind == BattleKind::Trainer {
                return Err(BattleEngineError::CannotFlee);
            }
        }
        PlayerAction::Forfeit => {}
    }
    Ok(())
}

/// Every action `side` could submit right now, in a stable order:
/// moves, struggle, items, balls, flee, forfeit.
pub fn valid_actions(state: &BattleState, side: Side) -> Vec<PlayerAction> {
    if state.is_terminal() {
        return Vec::new();
    }
    let combatant = state.combatant(side);
    let mut candidates: Vec<PlayerAction> = (0..combatant.moves.len())
        .map(|move_index| PlayerAction::UseMove { move_index })
        .collect();
    candidates.push(PlayerAction::Struggle);
    for (item, _) in state.bag(side).items() {
        if item.is_capture_ball() {
            candidates.push(PlayerAction::Catch(item));
        } else {
            candidates.push(PlayerAction::UseItem(item));
        }
    }
    candidates.push(PlayerAction::Flee);
    candidates.push(PlayerAction::Forfeit);

    candidates
        .into_iter()
        .filter(|action| validate_action(state, side, action).is_ok())
        .collect()
}

fn item_has_effect(item: Item, combatant: &Combatant) -> bool {
    match item.effect() {
        ItemEffect::RestoreHp(_) => combatant.current_hp < combatant.max_hp(),
        ItemEffect::CureStatus(None) => combatant.status.is_some(),
        ItemEffect::CureStatus(Some(status)) => combatant
            .status
            .is_some_and(|current| current.status_type() == status),
        ItemEffect::RaiseStat(stat) => combatant.stages.get(stat) < MAX_STAT_STAGE,
        ItemEffect::Capture { .. } => false,
    }
}

/// Resolve one side's action into the commands that carry it out.
pub fn resolve_action(
    state: &BattleState,
    side: Side,
    action: &PlayerAction,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    debug!("resolving {:?} for {:?}", action, side);
    match action {
        PlayerAction::UseMove { move_index } => resolve_move(state, side, *move_index, config, rng),
        PlayerAction::Struggle => resolve_struggle(state, side, config, rng),
        PlayerAction::UseItem(item) => resolve_item(state, side, *item),
        PlayerAction::Flee => resolve_flee(state, config, rng),
        PlayerAction::Catch(ball) => resolve_catch(state, *ball, config, rng),
        PlayerAction::Forfeit => resolve_forfeit(side),
    }
}

fn action_failed(side: Side, reason: ActionFailureReason) -> BattleCommand {
    BattleCommand::EmitEvent(BattleEvent::ActionFailed { side, reason })
}

fn resolve_move(
    state: &BattleState,
    side: Side,
    move_index: usize,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    let attacker = state.combatant(side);
    if attacker.is_fainted() {
        return vec![action_failed(side, ActionFailureReason::PokemonFainted)];
    }
    let Some(move_used) = attacker.moves.get(move_index) else {
        return vec![action_failed(side, ActionFailureReason::NoPpRemaining)];
    };
    if move_used.pp == 0 {
        return vec![action_failed(side, ActionFailureReason::NoPpRemaining)];
    }

    let gate = before_action(side, attacker, config, rng);
    let mut commands = gate.commands;
    if !gate.can_act {
        return commands;
    }

    commands.push(BattleCommand::UsePp {
        target: side,
        move_index,
    });
    commands.extend(perform_move(state, side, move_used, None, config, rng));
    commands
}

fn resolve_struggle(
    state: &BattleState,
    side: Side,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    let attacker = state.combatant(side);
    if attacker.is_fainted() {
        return vec![action_failed(side, ActionFailureReason::PokemonFainted)];
    }

    let gate = before_action(side, attacker, config, rng);
    let mut commands = gate.commands;
    if !gate.can_act {
        return commands;
    }

    let recoil = (attacker.max_hp() / config.struggle_recoil_divisor).max(1);
    commands.extend(perform_move(
        state,
        side,
        &Move::struggle(),
        Some(recoil),
        config,
        rng,
    ));
    commands
}

/// Whether a move has to get past the opponent's evasion at all.
fn targets_opponent(move_used: &Move) -> bool {
    move_used.is_damaging()
        || move_used.effects.iter().any(|effect| match effect {
            MoveEffect::InflictStatus { target, .. } | MoveEffect::ChangeStat { target, .. } => {
                *target == Target::Target
            }
            _ => false,
        })
}

/// Accuracy check. A chance of 1 or 0 resolves without a roll.
pub fn roll_hit(chance: f64, rng: &mut dyn BattleRng) -> bool {
    let threshold = (chance * ACCURACY_SCALE as f64).round() as u32;
    if threshold >= ACCURACY_SCALE {
        return true;
    }
    if threshold == 0 {
        return false;
    }
    rng.next_below(ACCURACY_SCALE, "accuracy") < threshold
}

/// Run a move that already passed its status gate: accuracy, damage, then
/// effects. `fixed_recoil` is the max-HP based recoil used by Struggle.
fn perform_move(
    state: &BattleState,
    side: Side,
    move_used: &Move,
    fixed_recoil: Option<u16>,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    let attacker = state.combatant(side);
    let target_side = side.opponent();
    let defender = state.combatant(target_side);

    let mut commands = vec![BattleCommand::EmitEvent(BattleEvent::MoveUsed {
        side,
        move_name: move_used.name.clone(),
    })];

    if let MoveAccuracy::Percent(accuracy) = move_used.accuracy {
        if targets_opponent(move_used) {
            let chance = hit_chance(
                accuracy,
                attacker.stages.get(StatType::Accuracy),
                defender.stages.get(StatType::Evasion),
            );
            if !roll_hit(chance, rng) {
                commands.push(BattleCommand::EmitEvent(BattleEvent::MoveMissed { side }));
                return commands;
            }
        }
    }

    let mut ctx = EffectContext::new(state, side, move_used);

    if move_used.is_damaging() {
        let roll = calculate_damage(attacker, defender, move_used, config, rng);
        if roll.damage == 0 {
            commands.push(BattleCommand::EmitEvent(
                BattleEvent::AttackTypeEffectiveness {
                    multiplier: roll.effectiveness,
                },
            ));
            return commands;
        }
        if roll.critical {
            commands.push(BattleCommand::EmitEvent(BattleEvent::CriticalHit { side }));
        }
        commands.push(BattleCommand::DealDamage {
            target: target_side,
            amount: roll.damage,
        });
        commands.push(BattleCommand::EmitEvent(
            BattleEvent::AttackTypeEffectiveness {
                multiplier: roll.effectiveness,
            },
        ));
        ctx.record_damage(target_side, roll.damage);

        if let Some(recoil) = fixed_recoil {
            ctx.record_damage(side, recoil);
            commands.push(BattleCommand::EmitEvent(BattleEvent::RecoilTaken {
                target: side,
            }));
            commands.push(BattleCommand::DealDamage {
                target: side,
                amount: recoil,
            });
        }
    }

    commands.extend(apply_move_effects(
        &move_used.effects,
        &mut ctx,
        state,
        config,
        rng,
    ));
    commands
}

fn resolve_item(state: &BattleState, side: Side, item: Item) -> Vec<BattleCommand> {
    let combatant = state.combatant(side);
    let mut commands = vec![
        BattleCommand::EmitEvent(BattleEvent::ItemUsed { side, item }),
        BattleCommand::ConsumeItem { side, item },
    ];

    match item.effect() {
        ItemEffect::RestoreHp(amount) => commands.push(BattleCommand::Heal {
            target: side,
            amount: amount.unwrap_or(combatant.max_hp()),
        }),
        ItemEffect::CureStatus(_) => {
            if let Some(status) = combatant.status {
                commands.push(BattleCommand::SetStatus {
                    target: side,
                    status: None,
                });
                commands.push(BattleCommand::EmitEvent(BattleEvent::StatusCured {
                    target: side,
                    status,
                }));
            }
        }
        ItemEffect::RaiseStat(stat) => commands.push(BattleCommand::ChangeStatStage {
            target: side,
            stat,
            delta: 1,
        }),
        ItemEffect::Capture { .. } => {}
    }
    commands
}

/// Escape value for the speed-based flee rule:
/// `(player_speed * 32) / (opponent_speed / 4) mod 256 + 30 * attempts`.
/// Speeds are the effective ones, after stages and paralysis.
pub fn escape_value(player_speed: u16, opponent_speed: u16, attempts: u32) -> u32 {
    let divisor = (opponent_speed as u32 / 4).max(1);
    (player_speed as u32 * 32 / divisor) % 256 + 30 * attempts
}

fn resolve_flee(
    state: &BattleState,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    let escaped = match config.flee_rule {
        FleeRule::Always => true,
        FleeRule::SpeedBased => {
            let escape = escape_value(
                effective_speed(state.combatant(Side::Player), config),
                effective_speed(state.combatant(Side::Opponent), config),
                state.flee_attempts,
            );
            escape >= 256 || rng.next_below(256, "flee") < escape
        }
    };

    if escaped {
        vec![
            BattleCommand::EmitEvent(BattleEvent::FleeSucceeded),
            BattleCommand::SetOutcome(BattleOutcome::Ran),
        ]
    } else {
        vec![
            BattleCommand::RecordFleeAttempt,
            BattleCommand::EmitEvent(BattleEvent::FleeFailed),
        ]
    }
}

fn resolve_catch(
    state: &BattleState,
    ball: Item,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> Vec<BattleCommand> {
    let mut commands = vec![
        BattleCommand::EmitEvent(BattleEvent::BallThrown { ball }),
        BattleCommand::ConsumeItem {
            side: Side::Player,
            item: ball,
        },
    ];

    let result = attempt_catch(state.combatant(Side::Opponent), ball, &config.catch, rng);
    for shakes in 1..=result.shakes.min(config.catch.shake_checks.saturating_sub(1)) {
        commands.push(BattleCommand::EmitEvent(BattleEvent::CatchShake { shakes }));
    }
    if result.caught {
        commands.push(BattleCommand::EmitEvent(BattleEvent::Caught));
        commands.push(BattleCommand::SetOutcome(BattleOutcome::Caught));
    } else {
        commands.push(BattleCommand::EmitEvent(BattleEvent::BrokeFree {
            shakes: result.shakes,
        }));
    }
    commands
}

fn resolve_forfeit(side: Side) -> Vec<BattleCommand> {
    let outcome = match side {
        Side::Player => BattleOutcome::Loss,
        Side::Opponent => BattleOutcome::Win,
    };
    vec![
        BattleCommand::EmitEvent(BattleEvent::Forfeited { side }),
        BattleCommand::SetOutcome(outcome),
    ]
}
