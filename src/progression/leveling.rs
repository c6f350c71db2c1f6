use crate::pokemon::{Combatant, StatBlock};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpResult {
    pub old_level: u8,
    pub new_level: u8,
}

impl LevelUpResult {
    pub fn levels_gained(&self) -> u8 {
        self.new_level - self.old_level
    }
}

/// Add experience and advance levels along the combatant's growth curve.
///
/// Stats are only recomputed when the combatant carries base stats; current
/// HP grows by however much max HP grew.
pub fn apply_experience(combatant: &mut Combatant, amount: u32, max_level: u8) -> LevelUpResult {
    let old_level = combatant.level;
    combatant.experience = combatant.experience.saturating_add(amount);

    while combatant.level < max_level
        && combatant.experience >= combatant.growth_rate.exp_for_level(combatant.level + 1)
    {
        combatant.level += 1;
    }

    if combatant.level != old_level {
        debug!(
            "{} advanced from level {} to {}",
            combatant.name, old_level, combatant.level
        );
        if let Some(base) = combatant.base_stats {
            let new_stats = StatBlock::from_base(&base, combatant.level);
            let hp_gain = new_stats.hp.saturating_sub(combatant.stats.hp);
            combatant.stats = new_stats;
            if !combatant.is_fainted() {
                combatant.current_hp = (combatant.current_hp + hp_gain).min(new_stats.hp);
            }
        }
    }

    LevelUpResult {
        old_level,
        new_level: combatant.level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestCombatant;
    use pretty_assertions::assert_eq;
    use schema::{BaseStats, GrowthRate};

    #[test]
    fn test_levels_follow_growth_curve() {
        let mut combatant = TestCombatant::new("Rattata").level(5).build();
        // medium fast: level 6 needs 216, level 7 needs 343
        let result = apply_experience(&mut combatant, 343 - 125, 100);
        assert_eq!(result.new_level, 7);
        assert_eq!(result.levels_gained(), 2);
        assert_eq!(combatant.experience, 343);
    }

    #[test]
    fn test_level_cap() {
        let mut combatant = TestCombatant::new("Mew")
            .level(99)
            .growth_rate(GrowthRate::Fast)
            .build();
        let result = apply_experience(&mut combatant, 10_000_000, 100);
        assert_eq!(result.new_level, 100);
    }

    #[test]
    fn test_stats_recomputed_from_base() {
        let base = BaseStats {
            hp: 45,
            attack: 49,
            defense: 49,
            sp_attack: 65,
            sp_defense: 65,
            speed: 45,
        };
        let mut combatant = TestCombatant::new("Bulbasaur").base_stats(base, 9).build();
        combatant.current_hp -= 3;
        let hp_before = combatant.current_hp;
        let max_before = combatant.max_hp();

        // medium fast: 729 at level 9, 1000 at level 10
        apply_experience(&mut combatant, 271, 100);

        assert_eq!(combatant.level, 10);
        assert_eq!(combatant.stats, StatBlock::from_base(&base, 10));
        assert_eq!(
            combatant.current_hp,
            hp_before + (combatant.max_hp() - max_before)
        );
    }
}
