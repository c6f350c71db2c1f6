use crate::battle::state::BattleKind;
use crate::config::ExperienceConfig;
use crate::pokemon::Combatant;

/// Calculator for the rewards earned when a combatant is defeated
pub struct RewardCalculator<'a> {
    config: &'a ExperienceConfig,
}

impl<'a> RewardCalculator<'a> {
    pub fn new(config: &'a ExperienceConfig) -> Self {
        Self { config }
    }

    /// Formula: floor(base_exp_yield * defeated_level / level_divisor),
    /// then the trainer bonus for trainer battles.
    pub fn experience_for_defeat(&self, defeated: &Combatant, kind: BattleKind) -> u32 {
        let base = defeated.base_exp_yield as u32 * defeated.level as u32 / self.config.level_divisor;
        match kind {
            BattleKind::Wild => base,
            BattleKind::Trainer => base * self.config.trainer_bonus_percent / 100,
        }
    }

    /// Only trainers pay out.
    pub fn prize_money(&self, defeated: &Combatant, kind: BattleKind) -> u32 {
        match kind {
            BattleKind::Wild => 0,
            BattleKind::Trainer => self.config.prize_money_per_level * defeated.level as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestCombatant;
    use rstest::rstest;

    #[rstest]
    #[case(BattleKind::Wild, 64, 10, 91)]
    #[case(BattleKind::Trainer, 64, 10, 136)]
    #[case(BattleKind::Wild, 50, 1, 7)]
    #[case(BattleKind::Wild, 3, 2, 0)]
    fn experience_scales_with_yield_and_level(
        #[case] kind: BattleKind,
        #[case] yield_: u16,
        #[case] level: u8,
        #[case] expected: u32,
    ) {
        let config = ExperienceConfig::default();
        let defeated = TestCombatant::new("Pidgey")
            .level(level)
            .exp_yield(yield_)
            .build();
        assert_eq!(
            RewardCalculator::new(&config).experience_for_defeat(&defeated, kind),
            expected
        );
    }

    #[rstest]
    #[case(BattleKind::Trainer, 10, 500)]
    #[case(BattleKind::Trainer, 1, 50)]
    #[case(BattleKind::Wild, 10, 0)]
    fn prize_money_comes_from_trainers_only(
        #[case] kind: BattleKind,
        #[case] level: u8,
        #[case] expected: u32,
    ) {
        let config = ExperienceConfig::default();
        let defeated = TestCombatant::new("Onix").level(level).build();
        assert_eq!(
            RewardCalculator::new(&config).prize_money(&defeated, kind),
            expected
        );
    }
}
