use schema::{ElementalType, MoveCategory, StatType, StatusType, Target};
use serde::{Deserialize, Serialize};

/// Base accuracy of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveAccuracy {
    /// Hit chance out of 100 before accuracy/evasion stages.
    Percent(u8),
    NeverMisses,
}

/// Secondary effects a move can carry. Resolved in declaration order after
/// the move connects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoveEffect {
    InflictStatus {
        status: StatusType,
        chance: u8,
        target: Target,
    },
    ChangeStat {
        stat: StatType,
        stages: i8,
        chance: u8,
        target: Target,
    },
    /// User takes this percentage of the damage dealt.
    Recoil { percent: u8 },
    /// User recovers this percentage of its max HP.
    Heal { percent: u8 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    pub move_type: ElementalType,
    pub category: MoveCategory,
    /// 0 for pure status moves.
    pub power: u16,
    pub accuracy: MoveAccuracy,
    pub max_pp: u8,
    pub pp: u8,
    pub priority: i8,
    pub effects: Vec<MoveEffect>,
}

impl Move {
    pub fn new(
        name: impl Into<String>,
        move_type: ElementalType,
        category: MoveCategory,
        power: u16,
        accuracy: MoveAccuracy,
        max_pp: u8,
    ) -> Self {
        Self {
            name: name.into(),
            move_type,
            category,
            power,
            accuracy,
            max_pp,
            pp: max_pp,
            priority: 0,
            effects: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_effect(mut self, effect: MoveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_pp(mut self, pp: u8) -> Self {
        self.pp = pp;
        self
    }

    /// The fallback attack used once every move is out of PP.
    pub fn struggle() -> Self {
        Self {
            name: "Struggle".to_string(),
            move_type: ElementalType::Normal,
            category: MoveCategory::Physical,
            power: 50,
            accuracy: MoveAccuracy::NeverMisses,
            max_pp: 1,
            pp: 1,
            priority: 0,
            effects: Vec::new(),
        }
    }

    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status && self.power > 0
    }

    /// Use the move (decrease PP)
    pub fn use_pp(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }
}
