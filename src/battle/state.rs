use crate::errors::{BattleResult, SnapshotError};
use crate::player::{Bag, PlayerAction, Side};
use crate::pokemon::{Combatant, StatusCondition};
use schema::{Effectiveness, Item, StatType};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Copy)]
pub enum GameState {
    /// Waiting for one action per side.
    SelectingAction,
    /// Both actions are queued; the turn can be resolved.
    ResolvingTurn,
    CheckEnd,
    /// Terminal. The outcome is no longer `Ongoing`.
    Finished,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum BattleOutcome {
    Ongoing,
    Win,
    Loss,
    Ran,
    Caught,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum BattleKind {
    Wild,
    Trainer,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded,

    // Moves
    MoveUsed {
        side: Side,
        move_name: String,
    },
    MoveMissed {
        side: Side,
    },
    CriticalHit {
        side: Side,
    },
    AttackTypeEffectiveness {
        multiplier: f32,
    },
    MoveFailed {
        side: Side,
    },

    // Damage and Healing
    DamageDealt {
        target: Side,
        damage: u16,
        remaining_hp: u16,
    },
    RecoilTaken {
        target: Side,
    },
    Healed {
        target: Side,
        amount: u16,
        new_hp: u16,
    },
    Fainted {
        side: Side,
    },
    DoubleFaint,

    // Status Conditions
    StatusApplied {
        target: Side,
        status: StatusCondition,
    },
    StatusCured {
        target: Side,
        status: StatusCondition,
    },
    WokeUp {
        target: Side,
    },
    Thawed {
        target: Side,
    },
    StatusDamage {
        target: Side,
        status: StatusCondition,
        damage: u16,
        remaining_hp: u16,
    },

    // Stat Changes
    StatStageChanged {
        target: Side,
        stat: StatType,
        old_stage: i8,
        new_stage: i8,
    },
    StatChangeBlocked {
        target: Side,
        stat: StatType,
        rising: bool,
    },

    // Action Failures
    ActionFailed {
        side: Side,
        reason: ActionFailureReason,
    },

    // Non-move actions
    ItemUsed {
        side: Side,
        item: Item,
    },
    FleeSucceeded,
    FleeFailed,
    BallThrown {
        ball: Item,
    },
    CatchShake {
        shakes: u8,
    },
    Caught,
    BrokeFree {
        shakes: u8,
    },
    Forfeited {
        side: Side,
    },

    // Rewards
    ExperienceGained {
        side: Side,
        amount: u32,
    },
    LeveledUp {
        side: Side,
        new_level: u8,
    },
    PrizeMoneyAwarded {
        amount: u32,
    },

    // Battle End
    BattleEnded {
        outcome: BattleOutcome,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string using battle context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, battle_state: &BattleState) -> Option<String> {
        let name = |side: &Side| battle_state.combatant(*side).name.as_str();
        match self {
            // === Turn Management Events ===
            BattleEvent::TurnStarted { turn_number } => {
                Some(format!("=== Turn {} ===", turn_number))
            }
            BattleEvent::TurnEnded => None,

            // === Move Events ===
            BattleEvent::MoveUsed { side, move_name } => {
                Some(format!("{} used {}!", name(side), move_name))
            }
            BattleEvent::MoveMissed { side } => Some(format!("{}'s attack missed!", name(side))),
            BattleEvent::CriticalHit { .. } => Some("A critical hit!".to_string()),
            BattleEvent::AttackTypeEffectiveness { multiplier } => {
                match Effectiveness::from_multiplier(*multiplier) {
                    Effectiveness::SuperEffective => Some("It's super effective!".to_string()),
                    Effectiveness::NotVeryEffective => {
                        Some("It's not very effective...".to_string())
                    }
                    Effectiveness::NoEffect => Some("It had no effect!".to_string()),
                    Effectiveness::Neutral => None,
                }
            }
            BattleEvent::MoveFailed { .. } => Some("But it failed!".to_string()),

            // === Damage and Healing Events ===
            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", name(target), damage))
            }
            BattleEvent::RecoilTaken { target } => {
                Some(format!("{} is hit with recoil!", name(target)))
            }
            BattleEvent::Healed { target, amount, .. } => {
                Some(format!("{} recovered {} HP!", name(target), amount))
            }
            BattleEvent::Fainted { side } => Some(format!("{} fainted!", name(side))),
            BattleEvent::DoubleFaint => Some("Both Pokemon fainted!".to_string()),

            // === Status Events ===
            BattleEvent::StatusApplied { target, status } => Some(format!(
                "{} {}",
                name(target),
                Self::format_status_applied(status)
            )),
            BattleEvent::StatusCured { target, status } => {
                Some(format!("{} is no longer {}.", name(target), status))
            }
            BattleEvent::WokeUp { target } => Some(format!("{} woke up!", name(target))),
            BattleEvent::Thawed { target } => Some(format!("{} thawed out!", name(target))),
            BattleEvent::StatusDamage { target, status, .. } => {
                let source = match status {
                    StatusCondition::Burn => "its burn",
                    _ => "poison",
                };
                Some(format!("{} is hurt by {}!", name(target), source))
            }

            // === Stat Change Events ===
            BattleEvent::StatStageChanged {
                target,
                stat,
                old_stage,
                new_stage,
            } => Some(format!(
                "{}'s {} {}",
                name(target),
                stat,
                Self::format_stage_change(new_stage - old_stage)
            )),
            BattleEvent::StatChangeBlocked {
                target,
                stat,
                rising,
            } => {
                let direction = if *rising { "higher" } else { "lower" };
                Some(format!(
                    "{}'s {} won't go any {}!",
                    name(target),
                    stat,
                    direction
                ))
            }

            // === Action Failure Events ===
            BattleEvent::ActionFailed { side, reason } => {
                Some(Self::format_action_failure_reason(name(side), reason))
            }

            // === Non-move Action Events ===
            BattleEvent::ItemUsed { item, .. } => Some(format!("Used {}!", item)),
            BattleEvent::FleeSucceeded => Some("Got away safely!".to_string()),
            BattleEvent::FleeFailed => Some("Can't escape!".to_string()),
            BattleEvent::BallThrown { ball } => Some(format!("You threw a {}!", ball)),
            BattleEvent::CatchShake { .. } => Some("*shake*".to_string()),
            BattleEvent::Caught => Some(format!(
                "Gotcha! {} was caught!",
                name(&Side::Opponent)
            )),
            BattleEvent::BrokeFree { shakes } => Some(
                match shakes {
                    0 => "Oh no! The Pokemon broke free! It didn't even shake!",
                    1 => "Oh no! The Pokemon broke free! It appeared to be caught!",
                    2 => "Aargh! Almost had it!",
                    _ => "Shoot! It was so close, too!",
                }
                .to_string(),
            ),
            BattleEvent::Forfeited { side } => Some(format!("{} forfeited the battle.", name(side))),

            // === Reward Events ===
            BattleEvent::ExperienceGained { side, amount } => {
                Some(format!("{} gained {} EXP. Points!", name(side), amount))
            }
            BattleEvent::LeveledUp { side, new_level } => {
                Some(format!("{} grew to level {}!", name(side), new_level))
            }
            BattleEvent::PrizeMoneyAwarded { amount } => {
                Some(format!("You got ${} for winning!", amount))
            }

            // === Battle End Events ===
            BattleEvent::BattleEnded { outcome } => Some(
                match outcome {
                    BattleOutcome::Win => "You won the battle!",
                    BattleOutcome::Loss => "You lost the battle...",
                    BattleOutcome::Ran => "The battle is over.",
                    BattleOutcome::Caught => "The wild Pokemon was added to your team.",
                    BattleOutcome::Ongoing => return None,
                }
                .to_string(),
            ),
        }
    }

    // --- Private Helper Functions ---

    fn format_status_applied(status: &StatusCondition) -> &'static str {
        match status {
            StatusCondition::Paralysis => "is paralyzed! It may be unable to move!",
            StatusCondition::Burn => "was burned!",
            StatusCondition::Poison => "was poisoned!",
            StatusCondition::Sleep(_) => "fell asleep!",
            StatusCondition::Freeze => "was frozen solid!",
        }
    }

    fn format_stage_change(delta: i8) -> &'static str {
        match delta {
            d if d >= 3 => "rose drastically!",
            2 => "rose sharply!",
            1 => "rose!",
            -1 => "fell!",
            -2 => "harshly fell!",
            _ => "severely fell!",
        }
    }

    fn format_action_failure_reason(name: &str, reason: &ActionFailureReason) -> String {
        match reason {
            ActionFailureReason::IsAsleep => format!("{} is fast asleep.", name),
            ActionFailureReason::IsFrozen => format!("{} is frozen solid!", name),
            ActionFailureReason::IsParalyzed => format!("{} is fully paralyzed!", name),
            ActionFailureReason::NoPpRemaining => {
                format!("{} has no PP left for that move!", name)
            }
            ActionFailureReason::PokemonFainted => format!("{} can't battle!", name),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFailureReason {
    IsAsleep,
    IsFrozen,
    IsParalyzed,
    NoPpRemaining,
    PokemonFainted,
}

/// Event bus for collecting the events of one turn, in resolution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Human-readable lines for every non-silent event.
    pub fn formatted(&self, battle_state: &BattleState) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| event.format(battle_state))
            .collect()
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn contains(&self, predicate: impl Fn(&BattleEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}

impl std::fmt::Display for EventBus {
    /// Format the EventBus for printing. Shows debug format of all events.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Everything a battle needs to continue from where it stopped.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleState {
    pub combatants: [Combatant; 2],
    pub bags: [Bag; 2],
    pub kind: BattleKind,
    pub turn_number: u32,
    /// Failed flee attempts so far, used by the speed-based flee rule.
    pub flee_attempts: u32,
    pub outcome: BattleOutcome,
    pub game_state: GameState,
    pub action_queue: [Option<PlayerAction>; 2],
    /// Items consumed by either side, in order of use.
    pub items_used: Vec<(Side, Item)>,
    pub experience_awarded: u32,
    pub levels_gained: u8,
    pub prize_money: u32,
}

impl BattleState {
    pub fn new(player: Combatant, opponent: Combatant, kind: BattleKind) -> Self {
        Self {
            combatants: [player, opponent],
            bags: [Bag::default(), Bag::default()],
            kind,
            turn_number: 1,
            flee_attempts: 0,
            outcome: BattleOutcome::Ongoing,
            game_state: GameState::SelectingAction,
            action_queue: [None, None],
            items_used: Vec::new(),
            experience_awarded: 0,
            levels_gained: 0,
            prize_money: 0,
        }
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        &self.combatants[side.to_index()]
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        &mut self.combatants[side.to_index()]
    }

    pub fn bag(&self, side: Side) -> &Bag {
        &self.bags[side.to_index()]
    }

    pub fn bag_mut(&mut self, side: Side) -> &mut Bag {
        &mut self.bags[side.to_index()]
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome != BattleOutcome::Ongoing
    }

    pub fn to_json(&self) -> BattleResult<String> {
        Ok(serde_json::to_string(self).map_err(SnapshotError::from)?)
    }

    pub fn from_json(source: &str) -> BattleResult<Self> {
        Ok(serde_json::from_str(source).map_err(SnapshotError::from)?)
    }

    /// Compact binary snapshot.
    pub fn to_snapshot(&self) -> BattleResult<Vec<u8>> {
        Ok(postcard::to_allocvec(self).map_err(SnapshotError::from)?)
    }

    pub fn from_snapshot(bytes: &[u8]) -> BattleResult<Self> {
        Ok(postcard::from_bytes(bytes).map_err(SnapshotError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, TestCombatant};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_event_formatting_uses_combatant_names() {
        let state = create_test_battle(
            TestCombatant::new("Pikachu").build(),
            TestCombatant::new("Geodude").build(),
        );

        let used = BattleEvent::MoveUsed {
            side: Side::Player,
            move_name: "Thunder Shock".to_string(),
        };
        assert_eq!(
            used.format(&state),
            Some("Pikachu used Thunder Shock!".to_string())
        );

        let sharp = BattleEvent::StatStageChanged {
            target: Side::Opponent,
            stat: StatType::Defense,
            old_stage: 0,
            new_stage: -2,
        };
        assert_eq!(
            sharp.format(&state),
            Some("Geodude's Defense harshly fell!".to_string())
        );

        assert_eq!(BattleEvent::TurnEnded.format(&state), None);
        assert_eq!(
            BattleEvent::AttackTypeEffectiveness { multiplier: 1.0 }.format(&state),
            None
        );
        assert_eq!(
            BattleEvent::AttackTypeEffectiveness { multiplier: 0.25 }.format(&state),
            Some("It's not very effective...".to_string())
        );
        assert_eq!(
            BattleEvent::AttackTypeEffectiveness { multiplier: 4.0 }.format(&state),
            Some("It's super effective!".to_string())
        );
        assert_eq!(
            BattleEvent::AttackTypeEffectiveness { multiplier: 0.0 }.format(&state),
            Some("It had no effect!".to_string())
        );
    }

    #[test]
    fn test_event_bus_collects_in_order() {
        let state = create_test_battle(
            TestCombatant::new("Pikachu").build(),
            TestCombatant::new("Geodude").build(),
        );
        let mut bus = EventBus::new();
        bus.push(BattleEvent::TurnStarted { turn_number: 1 });
        bus.push(BattleEvent::CriticalHit { side: Side::Player });
        bus.push(BattleEvent::TurnEnded);

        assert_eq!(bus.len(), 3);
        assert_eq!(
            bus.formatted(&state),
            vec!["=== Turn 1 ===".to_string(), "A critical hit!".to_string()]
        );
        let display_output = format!("{}", bus);
        assert!(display_output.contains("TurnStarted"));
        assert!(display_output.contains("CriticalHit"));
    }

    #[test]
    fn test_snapshots_round_trip() {
        let mut state = create_test_battle(
            TestCombatant::new("Pikachu").build(),
            TestCombatant::new("Geodude").build(),
        );
        state.combatants[0].stages.set(StatType::Speed, 2);
        state.combatants[1].status = Some(StatusCondition::Sleep(2));
        state.bags[0].add(Item::Potion, 3);
        state.action_queue[0] = Some(PlayerAction::UseMove { move_index: 0 });

        let json = state.to_json().expect("json snapshot");
        assert_eq!(BattleState::from_json(&json).expect("json restore"), state);

        let bytes = state.to_snapshot().expect("binary snapshot");
        assert_eq!(BattleState::from_snapshot(&bytes).expect("binary restore"), state);
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let err = BattleState::from_snapshot(&[0xff, 0x01]).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Snapshot);
    }
}
