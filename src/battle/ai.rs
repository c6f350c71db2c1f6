//! A simple scoring opponent.

use crate::battle::resolver::valid_actions;
use crate::battle::runner::ActionSource;
use crate::battle::state::BattleState;
use crate::battle::type_chart::effectiveness;
use crate::moves::{MoveAccuracy, MoveEffect};
use crate::player::{PlayerAction, Side};
use schema::{MoveCategory, Target};

/// Picks the highest-scoring legal action. Ties keep the earliest option, so
/// the choice is deterministic for a given state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringAI;

impl ScoringAI {
    pub fn new() -> Self {
        Self
    }

    fn score_action(&self, action: &PlayerAction, side: Side, state: &BattleState) -> f32 {
        match action {
            PlayerAction::UseMove { move_index } => self.score_move(*move_index, side, state),
            // Struggle is only legal when nothing else is.
            PlayerAction::Struggle => 0.5,
            PlayerAction::Forfeit => -1000.0,
            PlayerAction::UseItem(_) | PlayerAction::Flee | PlayerAction::Catch(_) => -1.0,
        }
    }

    fn score_move(&self, move_index: usize, side: Side, state: &BattleState) -> f32 {
        let attacker = state.combatant(side);
        let defender = state.combatant(side.opponent());
        let Some(move_) = attacker.moves.get(move_index) else {
            return -1.0;
        };

        let mut damage_score = 0.0;
        if move_.is_damaging() {
            let multiplier = effectiveness(move_.move_type, &defender.types);
            if multiplier == 0.0 {
                return -1.0;
            }
            let stab = if attacker.has_type(move_.move_type) {
                1.5
            } else {
                1.0
            };
            let stat = match move_.category {
                MoveCategory::Special => attacker.stats.special_attack,
                _ => attacker.stats.attack,
            };
            let level_scalar = (attacker.level as f32 * 2.0).max(1.0);
            damage_score = move_.power as f32 * multiplier * stab * (stat as f32 / level_scalar);
        }

        let mut utility_score = 0.0;
        for effect in &move_.effects {
            match *effect {
                MoveEffect::ChangeStat {
                    stat,
                    stages,
                    chance,
                    target: Target::User,
                } if stages > 0 => {
                    let current = attacker.stages.get(stat);
                    if current < 6 {
                        let potential_gain = 1.0 - current as f32 / 6.0;
                        utility_score += 20.0 * stages as f32 * potential_gain * (chance as f32 / 100.0);
                    }
                }
                MoveEffect::ChangeStat {
                    stat,
                    stages,
                    chance,
                    target: Target::Target,
                } if stages < 0 => {
                    if defender.stages.get(stat) > -6 {
                        utility_score += 15.0 * stages.unsigned_abs() as f32 * (chance as f32 / 100.0);
                    }
                }
                MoveEffect::InflictStatus { chance, .. } => {
                    if defender.status.is_none() {
                        utility_score += 45.0 * (chance as f32 / 100.0);
                    }
                }
                MoveEffect::Heal { .. } => {
                    let missing = 1.0 - attacker.current_hp as f32 / attacker.max_hp().max(1) as f32;
                    utility_score += 60.0 * missing;
                }
                _ => {}
            }
        }

        if !move_.is_damaging() && utility_score < 1.0 {
            return -1.0;
        }

        let mut score = damage_score + utility_score;
        if move_.is_damaging() {
            let accuracy = match move_.accuracy {
                MoveAccuracy::Percent(percent) => percent as f32,
                MoveAccuracy::NeverMisses => 101.0,
            };
            score *= accuracy / 100.0;
        }
        score
    }
}

impl ActionSource for ScoringAI {
    fn choose_action(&mut self, state: &BattleState, side: Side) -> PlayerAction {
        let mut best: Option<(PlayerAction, f32)> = None;
        for action in valid_actions(state, side) {
            let score = self.score_action(&action, side, state);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((action, score));
            }
        }
        best.map_or(PlayerAction::Forfeit, |(action, _)| action)
    }
}
