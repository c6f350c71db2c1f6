use crate::battle::rng::BattleRng;
use crate::battle::stats::{effective_attack, effective_defense};
use crate::battle::type_chart::{effectiveness, effectiveness_quarters};
use crate::config::BattleConfig;
use crate::moves::Move;
use crate::pokemon::Combatant;
use log::debug;

/// Outcome of one damage calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub damage: u16,
    pub critical: bool,
    pub effectiveness: f32,
    /// Percent in `random_factor_min..=random_factor_max`; 0 when no roll was made.
    pub random_factor: u32,
}

/// Level/power/attack/defense part of the formula, before any multiplier:
/// `floor(floor((2*level/5 + 2) * power * A / D / 50) + 2)`.
pub fn base_damage(level: u8, power: u16, attack: u16, defense: u16) -> u64 {
    let level_factor = 2 * level as u64 / 5 + 2;
    let defense = defense.max(1) as u64;
    level_factor * power as u64 * attack as u64 / defense / 50 + 2
}

/// Compute damage for a damaging move.
///
/// Rolls happen in a fixed order: critical hit, then the random factor. An
/// immune target short-circuits before either roll. Every multiplier is kept
/// as an exact ratio so the result is floored once:
/// `base * STAB * effectiveness * critical * random / 100`, minimum 1 unless
/// immune.
pub fn calculate_damage(
    attacker: &Combatant,
    defender: &Combatant,
    move_used: &Move,
    config: &BattleConfig,
    rng: &mut dyn BattleRng,
) -> DamageRoll {
    let multiplier = effectiveness(move_used.move_type, &defender.types);
    let quarters = effectiveness_quarters(move_used.move_type, &defender.types) as u64;
    if quarters == 0 {
        return DamageRoll {
            damage: 0,
            critical: false,
            effectiveness: multiplier,
            random_factor: 0,
        };
    }

    let attack = effective_attack(attacker, move_used.category, config);
    let defense = effective_defense(defender, move_used.category);
    let base = base_damage(attacker.level, move_used.power, attack, defense);

    let (stab_num, stab_den) = if attacker.has_type(move_used.move_type) {
        (config.stab_numerator as u64, config.stab_denominator as u64)
    } else {
        (1, 1)
    };

    let critical = rng.one_in(config.critical_hit_denominator, "critical hit");
    let crit_mult = if critical {
        config.critical_multiplier as u64
    } else {
        1
    };

    let random_factor = rng.range_inclusive(
        config.random_factor_min,
        config.random_factor_max,
        "damage variance",
    );

    let numerator = base * stab_num * quarters * crit_mult * random_factor as u64;
    let denominator = stab_den * 4 * 100;
    let damage = (numerator / denominator).clamp(1, u16::MAX as u64) as u16;

    debug!(
        "{} -> {}: base {} A {} D {} x{} crit {} r {} = {}",
        move_used.name, defender.name, base, attack, defense, multiplier, critical, random_factor, damage
    );

    DamageRoll {
        damage,
        critical,
        effectiveness: multiplier,
        random_factor,
    }
}
