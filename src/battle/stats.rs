use crate::config::BattleConfig;
use crate::pokemon::{Combatant, StatusCondition, MAX_STAT_STAGE, MIN_STAT_STAGE};
use schema::{MoveCategory, StatType};

/// Apply stat stage multipliers according to Pokemon formula
/// Stages range from -6 to +6
/// Negative stages: (2 / (2 + |stage|))
/// Positive stages: ((2 + stage) / 2)
/// The result is floored.
pub fn apply_stat_stage_multiplier(base_stat: u16, stage: i8) -> u16 {
    let clamped_stage = stage.clamp(MIN_STAT_STAGE, MAX_STAT_STAGE) as i32;
    let base = base_stat as u32;

    let value = if clamped_stage >= 0 {
        base * (2 + clamped_stage as u32) / 2
    } else {
        base * 2 / (2 - clamped_stage) as u32
    };
    value.min(u16::MAX as u32) as u16
}

/// Accuracy/evasion stage as an exact ratio: (3 + s) / 3 or 3 / (3 - s).
pub fn accuracy_stage_ratio(stage: i8) -> (u32, u32) {
    let s = stage.clamp(MIN_STAT_STAGE, MAX_STAT_STAGE) as i32;
    if s >= 0 {
        ((3 + s) as u32, 3)
    } else {
        (3, (3 - s) as u32)
    }
}

/// Accuracy stage of the attacker divided by evasion stage of the defender.
pub fn accuracy_check_multiplier(accuracy_stage: i8, evasion_stage: i8) -> f64 {
    let (acc_num, acc_den) = accuracy_stage_ratio(accuracy_stage);
    let (eva_num, eva_den) = accuracy_stage_ratio(evasion_stage);
    (acc_num * eva_den) as f64 / (acc_den * eva_num) as f64
}

/// Final probability that a move with `base_accuracy` connects, in [0, 1].
pub fn hit_chance(base_accuracy: u8, accuracy_stage: i8, evasion_stage: i8) -> f64 {
    let chance =
        base_accuracy as f64 / 100.0 * accuracy_check_multiplier(accuracy_stage, evasion_stage);
    chance.clamp(0.0, 1.0)
}

/// Stage-adjusted value of a non-HP stat.
pub fn effective_stat(combatant: &Combatant, stat: StatType) -> u16 {
    apply_stat_stage_multiplier(combatant.stats.get(stat), combatant.stages.get(stat))
}

/// Calculate effective attack stat including stat stages and burn
pub fn effective_attack(attacker: &Combatant, category: MoveCategory, config: &BattleConfig) -> u16 {
    match category {
        MoveCategory::Physical => {
            let attack = effective_stat(attacker, StatType::Attack);
            if matches!(attacker.status, Some(StatusCondition::Burn)) {
                attack / config.burn_attack_divisor
            } else {
                attack
            }
        }
        MoveCategory::Special => effective_stat(attacker, StatType::SpecialAttack),
        MoveCategory::Status => 0,
    }
}

/// Calculate effective defense stat including stat stages
pub fn effective_defense(defender: &Combatant, category: MoveCategory) -> u16 {
    match category {
        MoveCategory::Physical => effective_stat(defender, StatType::Defense),
        MoveCategory::Special => effective_stat(defender, StatType::SpecialDefense),
        MoveCategory::Status => 0,
    }
}

/// Calculate effective speed including stat stages and paralysis
pub fn effective_speed(combatant: &Combatant, config: &BattleConfig) -> u16 {
    let speed = effective_stat(combatant, StatType::Speed);
    if matches!(combatant.status, Some(StatusCondition::Paralysis)) {
        speed / config.paralysis_speed_divisor
    } else {
        speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestCombatant;
    use rstest::rstest;

    #[rstest]
    #[case(0, 100)]
    #[case(1, 150)]
    #[case(2, 200)]
    #[case(-1, 66)]
    #[case(-2, 50)]
    #[case(6, 400)]
    #[case(-6, 25)]
    #[case(9, 400)]
    fn stat_stage_multipliers(#[case] stage: i8, #[case] expected: u16) {
        assert_eq!(apply_stat_stage_multiplier(100, stage), expected);
    }

    #[test]
    fn accuracy_stage_multipliers() {
        assert!((accuracy_check_multiplier(0, 0) - 1.0).abs() < 1e-9);
        assert!((accuracy_check_multiplier(1, 0) - 4.0 / 3.0).abs() < 1e-9);
        assert!((accuracy_check_multiplier(-1, 0) - 3.0 / 4.0).abs() < 1e-9);
        assert!((accuracy_check_multiplier(6, 0) - 3.0).abs() < 1e-9);
        assert!((accuracy_check_multiplier(0, 6) - 1.0 / 3.0).abs() < 1e-9);
        assert!((accuracy_check_multiplier(2, 2) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn hit_chance_is_clamped() {
        assert_eq!(hit_chance(100, 6, 0), 1.0);
        assert!((hit_chance(90, 0, 1) - 0.675).abs() < 1e-9);
        assert_eq!(hit_chance(0, 0, 0), 0.0);
    }

    #[test]
    fn paralysis_halves_speed() {
        let config = BattleConfig::default();
        let mut fast = TestCombatant::new("Pikachu").speed(100).build();
        assert_eq!(effective_speed(&fast, &config), 100);
        fast.status = Some(StatusCondition::Paralysis);
        assert_eq!(effective_speed(&fast, &config), 50);
        fast.stages.set(StatType::Speed, 2);
        assert_eq!(effective_speed(&fast, &config), 100);
    }

    #[test]
    fn burn_halves_physical_attack_only() {
        let config = BattleConfig::default();
        let burned = TestCombatant::new("Machop")
            .attack(81)
            .special_attack(40)
            .status(StatusCondition::Burn)
            .build();
        assert_eq!(effective_attack(&burned, MoveCategory::Physical, &config), 40);
        assert_eq!(effective_attack(&burned, MoveCategory::Special, &config), 40);
    }
}
