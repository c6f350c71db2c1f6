use crate::battle::state::BattleOutcome;
use thiserror::Error;

/// Main error type for the battle engine
#[derive(Debug, Error)]
pub enum BattleEngineError {
    /// The submitted action is illegal in the current state
    #[error("invalid action: {0}")]
    InvalidAction(#[from] ActionError),
    /// Fleeing was attempted in a trainer battle
    #[error("cannot flee from a trainer battle")]
    CannotFlee,
    /// The battle already reached a terminal outcome
    #[error("battle already ended with outcome {0:?}")]
    AlreadyTerminal(BattleOutcome),
    /// Turn resolution was requested before both actions were supplied
    #[error("turn cannot resolve before both sides have chosen an action")]
    NotReady,
    /// Combatant data handed to the engine is inconsistent
    #[error("battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Flat view of [`BattleEngineError`] for callers that only branch on the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidAction,
    CannotFlee,
    AlreadyTerminal,
    NotReady,
    BattleState,
    Config,
    Snapshot,
}

impl BattleEngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BattleEngineError::InvalidAction(_) => ErrorKind::InvalidAction,
            BattleEngineError::CannotFlee => ErrorKind::CannotFlee,
            BattleEngineError::AlreadyTerminal(_) => ErrorKind::AlreadyTerminal,
            BattleEngineError::NotReady => ErrorKind::NotReady,
            BattleEngineError::BattleState(_) => ErrorKind::BattleState,
            BattleEngineError::Config(_) => ErrorKind::Config,
            BattleEngineError::Snapshot(_) => ErrorKind::Snapshot,
        }
    }
}

/// Errors related to player actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Move index is out of bounds
    #[error("move index {index} is out of range for {move_count} moves")]
    InvalidMoveIndex { index: usize, move_count: usize },
    #[error("{0} has no PP left")]
    NoPpRemaining(String),
    #[error("{0} has fainted and cannot act")]
    CombatantFainted(String),
    /// Struggle is only legal once every move is out of PP
    #[error("struggle is only available when every move is out of PP")]
    StruggleNotAllowed,
    #[error("no {0} left in the bag")]
    ItemNotInBag(String),
    #[error("{0} would have no effect")]
    ItemHasNoEffect(String),
    #[error("{0} is not a capture ball")]
    NotACaptureItem(String),
    #[error("{0} can only be thrown with a catch action")]
    CaptureItemUsedAsItem(String),
    #[error("a trainer's Pokemon cannot be caught")]
    CannotCatchTrainerPokemon,
    #[error("only the player can attempt a catch")]
    OpponentCannotCatch,
    #[error("only the player can flee")]
    OpponentCannotFlee,
    /// Action was supplied for a side that already chose this turn
    #[error("an action was already submitted for this side")]
    AlreadySubmitted,
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    #[error("{name} must have one or two types, found {count}")]
    InvalidTypeCount { name: String, count: usize },
    #[error("{name} must know between one and four moves, found {count}")]
    InvalidMoveCount { name: String, count: usize },
    #[error("{name} has level {level}, expected 1..=100")]
    InvalidLevel { name: String, level: u8 },
    #[error("{name} has {current} HP but a maximum of {max}")]
    HpAboveMax { name: String, current: u16, max: u16 },
    #[error("{name}'s move {move_name} has {pp} PP but a maximum of {max_pp}")]
    PpAboveMax {
        name: String,
        move_name: String,
        pp: u8,
        max_pp: u8,
    },
    /// Battle state is in an inconsistent or corrupted state
    #[error("inconsistent battle state: {0}")]
    InconsistentState(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("json snapshot failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("binary snapshot failed: {0}")]
    Binary(#[from] postcard::Error),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;
