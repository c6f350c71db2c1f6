use crate::errors::BattleStateError;
use crate::moves::Move;
use schema::{BaseStats, ElementalType, GrowthRate, StatType, StatusType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const MIN_STAT_STAGE: i8 = -6;
pub const MAX_STAT_STAGE: i8 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    Paralysis,
    Burn,
    Poison,
    /// Turns of sleep left before the combatant wakes.
    Sleep(u8),
    Freeze,
}

impl StatusCondition {
    pub fn status_type(&self) -> StatusType {
        match self {
            StatusCondition::Paralysis => StatusType::Paralysis,
            StatusCondition::Burn => StatusType::Burn,
            StatusCondition::Poison => StatusType::Poison,
            StatusCondition::Sleep(_) => StatusType::Sleep,
            StatusCondition::Freeze => StatusType::Freeze,
        }
    }
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatusCondition::Paralysis => "paralyzed",
            StatusCondition::Burn => "burned",
            StatusCondition::Poison => "poisoned",
            StatusCondition::Sleep(_) => "asleep",
            StatusCondition::Freeze => "frozen",
        };
        write!(f, "{}", display_name)
    }
}

/// The six numeric stats. `hp` is the maximum; current HP lives on the combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl StatBlock {
    /// Derive stats from species base stats at a level. IVs and EVs are zero.
    pub fn from_base(base: &BaseStats, level: u8) -> Self {
        let level = level as u32;
        // HP = floor(2 * Base * Level / 100) + Level + 10
        let hp = (2 * base.hp as u32 * level) / 100 + level + 10;
        // Other Stat = floor(2 * Base * Level / 100) + 5
        let other = |b: u8| ((2 * b as u32 * level) / 100 + 5) as u16;
        Self {
            hp: hp as u16,
            attack: other(base.attack),
            defense: other(base.defense),
            special_attack: other(base.sp_attack),
            special_defense: other(base.sp_defense),
            speed: other(base.speed),
        }
    }

    pub fn get(&self, stat: StatType) -> u16 {
        match stat {
            StatType::Attack => self.attack,
            StatType::Defense => self.defense,
            StatType::SpecialAttack => self.special_attack,
            StatType::SpecialDefense => self.special_defense,
            StatType::Speed => self.speed,
            // Accuracy and evasion are pure stages with no stored value.
            StatType::Accuracy | StatType::Evasion => 0,
        }
    }
}

/// Per-battle stat stages, each clamped to [-6, +6]. Unset stats are 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatStages {
    stages: BTreeMap<StatType, i8>,
}

impl StatStages {
    /// Get the current stage for a stat type (0 if not set)
    pub fn get(&self, stat: StatType) -> i8 {
        self.stages.get(&stat).copied().unwrap_or(0)
    }

    /// Set the stage for a stat type (clamped to -6 to +6)
    pub fn set(&mut self, stat: StatType, stage: i8) {
        let clamped_stage = stage.clamp(MIN_STAT_STAGE, MAX_STAT_STAGE);
        if clamped_stage == 0 {
            self.stages.remove(&stat);
        } else {
            self.stages.insert(stat, clamped_stage);
        }
    }

    /// Apply a delta and return the change that actually took effect.
    pub fn modify(&mut self, stat: StatType, delta: i8) -> i8 {
        let current = self.get(stat);
        let target = current
            .saturating_add(delta)
            .clamp(MIN_STAT_STAGE, MAX_STAT_STAGE);
        self.set(stat, target);
        target - current
    }

    pub fn clear(&mut self) {
        self.stages.clear();
    }
}

/// One side's active combatant for the duration of a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub types: Vec<ElementalType>,
    pub level: u8,
    pub experience: u32,
    pub growth_rate: GrowthRate,
    pub base_exp_yield: u16,
    pub catch_rate: u8,
    /// When present, stats are recomputed from these on level-up.
    pub base_stats: Option<BaseStats>,
    pub stats: StatBlock,
    pub current_hp: u16,
    pub stages: StatStages,
    pub status: Option<StatusCondition>,
    pub moves: Vec<Move>,
}

impl Combatant {
    pub fn new(
        name: impl Into<String>,
        types: Vec<ElementalType>,
        level: u8,
        stats: StatBlock,
        moves: Vec<Move>,
    ) -> Self {
        let growth_rate = GrowthRate::default();
        Self {
            name: name.into(),
            types,
            level,
            experience: growth_rate.exp_for_level(level),
            growth_rate,
            base_exp_yield: 64,
            catch_rate: 45,
            base_stats: None,
            stats,
            current_hp: stats.hp,
            stages: StatStages::default(),
            status: None,
            moves,
        }
    }

    /// Build a combatant whose stats derive from species base stats.
    pub fn from_base_stats(
        name: impl Into<String>,
        types: Vec<ElementalType>,
        level: u8,
        base_stats: BaseStats,
        moves: Vec<Move>,
    ) -> Self {
        let mut combatant = Self::new(
            name,
            types,
            level,
            StatBlock::from_base(&base_stats, level),
            moves,
        );
        combatant.base_stats = Some(base_stats);
        combatant
    }

    pub fn with_growth_rate(mut self, growth_rate: GrowthRate) -> Self {
        self.growth_rate = growth_rate;
        self.experience = growth_rate.exp_for_level(self.level);
        self
    }

    pub fn with_exp_yield(mut self, base_exp_yield: u16) -> Self {
        self.base_exp_yield = base_exp_yield;
        self
    }

    pub fn with_catch_rate(mut self, catch_rate: u8) -> Self {
        self.catch_rate = catch_rate;
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_current_hp(mut self, hp: u16) -> Self {
        self.current_hp = hp;
        self
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn has_type(&self, element: ElementalType) -> bool {
        self.types.contains(&element)
    }

    /// Subtract damage, flooring at 0. Returns `true` if this faints the combatant.
    pub fn take_damage(&mut self, damage: u16) -> bool {
        let was_standing = !self.is_fainted();
        self.current_hp = self.current_hp.saturating_sub(damage);
        was_standing && self.is_fainted()
    }

    /// Restore HP up to the maximum. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp());
        self.current_hp - before
    }

    /// Moves that can still be selected.
    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().any(|m| m.pp > 0)
    }

    pub fn validate(&self) -> Result<(), BattleStateError> {
        if self.types.is_empty() || self.types.len() > 2 {
            return Err(BattleStateError::InvalidTypeCount {
                name: self.name.clone(),
                count: self.types.len(),
            });
        }
        if self.moves.is_empty() || self.moves.len() > 4 {
            return Err(BattleStateError::InvalidMoveCount {
                name: self.name.clone(),
                count: self.moves.len(),
            });
        }
        if self.level == 0 || self.level > 100 {
            return Err(BattleStateError::InvalidLevel {
                name: self.name.clone(),
                level: self.level,
            });
        }
        if self.current_hp > self.max_hp() {
            return Err(BattleStateError::HpAboveMax {
                name: self.name.clone(),
                current: self.current_hp,
                max: self.max_hp(),
            });
        }
        if let Some(bad) = self.moves.iter().find(|m| m.pp > m.max_pp) {
            return Err(BattleStateError::PpAboveMax {
                name: self.name.clone(),
                move_name: bad.name.clone(),
                pp: bad.pp,
                max_pp: bad.max_pp,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Combatant {
        Combatant::new(
            "Rattata",
            vec![ElementalType::Normal],
            5,
            StatBlock {
                hp: 20,
                attack: 11,
                defense: 9,
                special_attack: 8,
                special_defense: 8,
                speed: 13,
            },
            vec![Move::struggle()],
        )
    }

    #[test]
    fn stages_clamp_and_report_applied_delta() {
        let mut stages = StatStages::default();
        assert_eq!(stages.modify(StatType::Attack, 4), 4);
        assert_eq!(stages.modify(StatType::Attack, 4), 2);
        assert_eq!(stages.modify(StatType::Attack, 1), 0);
        assert_eq!(stages.get(StatType::Attack), 6);
        assert_eq!(stages.modify(StatType::Speed, -8), -6);
        assert_eq!(stages.modify(StatType::Speed, -1), 0);
        assert_eq!(stages.get(StatType::Speed), -6);
    }

    #[test]
    fn damage_floors_at_zero_and_reports_faint_once() {
        let mut rattata = sample();
        assert!(!rattata.take_damage(5));
        assert!(rattata.take_damage(100));
        assert_eq!(rattata.current_hp, 0);
        assert!(!rattata.take_damage(1));
    }

    #[test]
    fn heal_caps_at_max() {
        let mut rattata = sample().with_current_hp(15);
        assert_eq!(rattata.heal(50), 5);
        assert_eq!(rattata.current_hp, 20);
    }

    #[test]
    fn stats_from_base_use_standard_formula() {
        let base = BaseStats {
            hp: 45,
            attack: 49,
            defense: 49,
            sp_attack: 65,
            sp_defense: 65,
            speed: 45,
        };
        let stats = StatBlock::from_base(&base, 10);
        assert_eq!(stats.hp, 29);
        assert_eq!(stats.attack, 14);
        assert_eq!(stats.special_attack, 18);
    }

    #[test]
    fn validation_rejects_three_types() {
        let mut rattata = sample();
        rattata.types = vec![
            ElementalType::Normal,
            ElementalType::Fire,
            ElementalType::Water,
        ];
        assert!(matches!(
            rattata.validate(),
            Err(BattleStateError::InvalidTypeCount { count: 3, .. })
        ));
    }
}
