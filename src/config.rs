//! Tunable battle constants.
//!
//! Every numeric rule the engine applies lives here so callers can adjust a
//! ruleset without touching the resolution code. Configurations are stored as
//! RON, the same format the game data uses.

use crate::errors::{BattleResult, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a wild-battle flee attempt is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FleeRule {
    /// Fleeing a wild battle always succeeds.
    #[default]
    Always,
    /// Escape odds depend on the speed ratio and previous attempts.
    SpeedBased,
}

/// Turn-order tiers for non-move actions. These always outrank every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionPriorities {
    pub forfeit: i8,
    pub flee: i8,
    pub item: i8,
    pub catch: i8,
}

impl Default for ActionPriorities {
    fn default() -> Self {
        Self {
            forfeit: 10,
            flee: 8,
            item: 7,
            catch: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceConfig {
    /// Experience = base yield * defeated level / level_divisor.
    pub level_divisor: u32,
    /// Bonus applied to trainer battles, in percent.
    pub trainer_bonus_percent: u32,
    pub max_level: u8,
    /// Prize money for beating a trainer, per level of the defeated combatant.
    pub prize_money_per_level: u32,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            level_divisor: 7,
            trainer_bonus_percent: 150,
            max_level: 100,
            prize_money_per_level: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatchConfig {
    pub shake_checks: u8,
    pub sleep_freeze_bonus: f32,
    pub other_status_bonus: f32,
}

impl Default for CatchConfig {
    fn default() -> Self {
        Self {
            shake_checks: 4,
            sleep_freeze_bonus: 2.0,
            other_status_bonus: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub critical_hit_denominator: u32,
    pub critical_multiplier: u32,
    pub stab_numerator: u32,
    pub stab_denominator: u32,
    pub random_factor_min: u32,
    pub random_factor_max: u32,
    pub paralysis_skip_percent: u8,
    pub paralysis_speed_divisor: u16,
    pub freeze_thaw_percent: u8,
    pub sleep_turns_min: u8,
    pub sleep_turns_max: u8,
    pub burn_chip_divisor: u16,
    pub poison_chip_divisor: u16,
    pub burn_attack_divisor: u16,
    pub struggle_recoil_divisor: u16,
    pub flee_rule: FleeRule,
    pub priorities: ActionPriorities,
    pub experience: ExperienceConfig,
    pub catch: CatchConfig,
    /// How many invalid actions `BattleEngine::run` tolerates from one source
    /// in a single selection before giving up.
    pub max_rejected_actions: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            critical_hit_denominator: 16,
            critical_multiplier: 2,
            stab_numerator: 3,
            stab_denominator: 2,
            random_factor_min: 85,
            random_factor_max: 100,
            paralysis_skip_percent: 25,
            paralysis_speed_divisor: 2,
            freeze_thaw_percent: 20,
            sleep_turns_min: 1,
            sleep_turns_max: 3,
            burn_chip_divisor: 16,
            poison_chip_divisor: 8,
            burn_attack_divisor: 2,
            struggle_recoil_divisor: 4,
            flee_rule: FleeRule::Always,
            priorities: ActionPriorities::default(),
            experience: ExperienceConfig::default(),
            catch: CatchConfig::default(),
            max_rejected_actions: 16,
        }
    }
}

impl BattleConfig {
    pub fn from_ron_str(source: &str) -> BattleResult<Self> {
        let config: BattleConfig = ron::from_str(source).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> BattleResult<Self> {
        let source = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        Self::from_ron_str(&source)
    }

    /// Rejects values that would divide by zero or produce empty ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let divisors = [
            ("critical_hit_denominator", self.critical_hit_denominator),
            ("stab_denominator", self.stab_denominator),
            ("paralysis_speed_divisor", self.paralysis_speed_divisor as u32),
            ("burn_chip_divisor", self.burn_chip_divisor as u32),
            ("poison_chip_divisor", self.poison_chip_divisor as u32),
            ("burn_attack_divisor", self.burn_attack_divisor as u32),
            ("struggle_recoil_divisor", self.struggle_recoil_divisor as u32),
            ("experience.level_divisor", self.experience.level_divisor),
        ];
        if let Some((name, _)) = divisors.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid(format!("{} must be non-zero", name)));
        }
        if self.random_factor_min > self.random_factor_max || self.random_factor_max > 100 {
            return Err(ConfigError::Invalid(
                "random factor range must satisfy min <= max <= 100".to_string(),
            ));
        }
        if self.catch.shake_checks == 0 {
            return Err(ConfigError::Invalid(
                "catch.shake_checks must be at least 1".to_string(),
            ));
        }
        if self.sleep_turns_min > self.sleep_turns_max {
            return Err(ConfigError::Invalid(
                "sleep_turns_min must not exceed sleep_turns_max".to_string(),
            ));
        }
        let lowest_tier = [
            self.priorities.forfeit,
            self.priorities.flee,
            self.priorities.item,
            self.priorities.catch,
        ]
        .into_iter()
        .min()
        .unwrap_or(i8::MAX);
        if lowest_tier < 0 {
            return Err(ConfigError::Invalid(
                "non-move action priorities must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn shipped_config_matches_defaults() {
        let config = BattleConfig::from_ron_str(include_str!("../data/battle_config.ron"))
            .expect("shipped config should parse");
        assert_eq!(config, BattleConfig::default());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config = BattleConfig::from_ron_str("(flee_rule: SpeedBased, freeze_thaw_percent: 10)")
            .expect("partial config should parse");
        assert_eq!(config.flee_rule, FleeRule::SpeedBased);
        assert_eq!(config.freeze_thaw_percent, 10);
        assert_eq!(config.poison_chip_divisor, 8);
    }

    #[test]
    fn zero_divisor_is_rejected() {
        let err = BattleConfig::from_ron_str("(burn_chip_divisor: 0)").unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Config);
    }

    #[test]
    fn catch_without_shake_checks_is_rejected() {
        let err = BattleConfig::from_ron_str("(catch: (shake_checks: 0))").unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Config);
        assert!(err.to_string().contains("shake_checks"));
    }

    #[test]
    fn malformed_ron_is_a_config_error() {
        let err = BattleConfig::from_ron_str("(flee_rule: Sometimes)").unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Config);
    }
}
