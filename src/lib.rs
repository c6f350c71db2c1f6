//! Pokemon Battle Engine
//!
//! Turn-based resolution of a single encounter between two combatants:
//! turn order, accuracy, damage, status conditions, stat stages, fainting
//! and the final outcome. Every random roll goes through an injectable
//! [`BattleRng`], so a battle replays exactly from its seed.

pub mod battle;
pub mod config;
pub mod errors;
pub mod moves;
pub mod player;
pub mod pokemon;
pub mod progression;

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, ElementalType, GrowthRate, Item, ItemEffect, MoveCategory, StatType, StatusType,
    Target,
};

// --- From this crate's modules ---
pub use battle::engine::{BattleEngine, BattleReport};
pub use battle::rng::{BattleRng, ScriptedRng, SeededRng};
pub use battle::runner::{ActionSource, FirstUsableMove, ScriptedActions};
pub use battle::state::{BattleEvent, BattleKind, BattleOutcome, BattleState, EventBus, GameState};
pub use config::{BattleConfig, FleeRule};
pub use moves::{Move, MoveAccuracy, MoveEffect};
pub use player::{Bag, PlayerAction, Side};
pub use pokemon::{Combatant, StatBlock, StatusCondition};

pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, ConfigError, ErrorKind,
    SnapshotError,
};
