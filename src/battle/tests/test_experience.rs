#[cfg(test)]
mod tests {
    use crate::battle::engine::BattleEngine;
    use crate::battle::rng::ScriptedRng;
    use crate::battle::state::{BattleEvent, BattleKind, BattleOutcome};
    use crate::battle::tests::common::TestCombatant;
    use crate::config::BattleConfig;
    use crate::player::{PlayerAction, Side};
    use crate::pokemon::StatBlock;
    use pretty_assertions::assert_eq;
    use schema::BaseStats;

    const TACKLE: PlayerAction = PlayerAction::UseMove { move_index: 0 };

    #[test]
    fn test_trainer_win_awards_bonus_experience_and_levels() {
        // Arrange: level 5 medium-fast sits at 125 exp; level 6 needs 216.
        let mut engine = BattleEngine::new(
            TestCombatant::new("Pidgey").level(5).speed(50).build(),
            TestCombatant::new("Rattata").level(10).current_hp(1).build(),
            BattleKind::Trainer,
            BattleConfig::default(),
        )
        .unwrap();
        let mut rng = ScriptedRng::new(vec![1, 0]);

        // Act
        let bus = engine.play_turn(TACKLE, TACKLE, &mut rng).unwrap();

        // Assert: 64 * 10 / 7 = 91, x1.5 for a trainer = 136
        assert_eq!(engine.outcome(), BattleOutcome::Win);
        assert!(bus.contains(|e| matches!(
            e,
            BattleEvent::ExperienceGained {
                side: Side::Player,
                amount: 136
            }
        )));
        assert!(bus.contains(|e| matches!(
            e,
            BattleEvent::LeveledUp {
                side: Side::Player,
                new_level: 6
            }
        )));
        let report = engine.report().unwrap();
        assert_eq!(report.experience_awarded, 136);
        assert_eq!(report.level_after, 6);
        assert_eq!(report.levels_gained, 1);
        assert_eq!(engine.state().combatants[0].experience, 125 + 136);
        // 50 per level of the defeated trainer's combatant
        assert!(bus.contains(|e| matches!(e, BattleEvent::PrizeMoneyAwarded { amount: 500 })));
        assert_eq!(report.prize_money, 500);
    }

    #[test]
    fn test_wild_win_and_trainer_loss_pay_no_prize() {
        let mut wild = BattleEngine::new(
            TestCombatant::new("Pidgey").speed(50).build(),
            TestCombatant::new("Rattata").current_hp(1).build(),
            BattleKind::Wild,
            BattleConfig::default(),
        )
        .unwrap();
        let mut rng = ScriptedRng::new(vec![1, 0]);
        wild.play_turn(TACKLE, TACKLE, &mut rng).unwrap();
        assert_eq!(wild.outcome(), BattleOutcome::Win);
        assert_eq!(wild.report().unwrap().prize_money, 0);

        let mut trainer = BattleEngine::new(
            TestCombatant::new("Pidgey").current_hp(1).build(),
            TestCombatant::new("Rattata").speed(50).build(),
            BattleKind::Trainer,
            BattleConfig::default(),
        )
        .unwrap();
        let mut rng = ScriptedRng::new(vec![1, 0]);
        let bus = trainer.play_turn(TACKLE, TACKLE, &mut rng).unwrap();
        assert_eq!(trainer.outcome(), BattleOutcome::Loss);
        assert!(!bus.contains(|e| matches!(e, BattleEvent::PrizeMoneyAwarded { .. })));
        assert_eq!(trainer.report().unwrap().prize_money, 0);
    }

    #[test]
    fn test_level_up_recomputes_stats_from_base() {
        let base = BaseStats {
            hp: 45,
            attack: 49,
            defense: 49,
            sp_attack: 65,
            sp_defense: 65,
            speed: 45,
        };
        let mut engine = BattleEngine::new(
            TestCombatant::new("Bulbasaur").base_stats(base, 9).build(),
            TestCombatant::new("Caterpie")
                .level(30)
                .speed(1)
                .current_hp(1)
                .build(),
            BattleKind::Wild,
            BattleConfig::default(),
        )
        .unwrap();
        let mut rng = ScriptedRng::new(vec![1, 0]);

        engine.play_turn(TACKLE, TACKLE, &mut rng).unwrap();

        // 64 * 30 / 7 = 274 on top of 729: level 10 at 1000
        let player = &engine.state().combatants[0];
        assert_eq!(player.level, 10);
        assert_eq!(player.stats, StatBlock::from_base(&base, 10));
        assert_eq!(player.current_hp, player.max_hp());
    }
}
