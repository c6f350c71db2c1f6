#[cfg(test)]
mod tests {
    use crate::battle::engine::BattleEngine;
    use crate::battle::rng::SeededRng;
    use crate::battle::runner::FirstUsableMove;
    use crate::battle::state::{BattleKind, BattleState};
    use crate::battle::tests::common::TestCombatant;
    use crate::config::BattleConfig;
    use crate::player::PlayerAction;
    use crate::pokemon::StatusCondition;
    use pretty_assertions::assert_eq;

    const TACKLE: PlayerAction = PlayerAction::UseMove { move_index: 0 };

    fn fresh_engine() -> BattleEngine {
        BattleEngine::new(
            TestCombatant::new("Pikachu").hp(100).speed(90).build(),
            TestCombatant::new("Eevee")
                .hp(100)
                .speed(55)
                .status(StatusCondition::Poison)
                .build(),
            BattleKind::Wild,
            BattleConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_same_seed_same_battle() {
        let mut first = fresh_engine();
        let mut second = fresh_engine();

        let report_a = first
            .run(&mut FirstUsableMove, &mut FirstUsableMove, &mut SeededRng::new(1234))
            .unwrap();
        let report_b = second
            .run(&mut FirstUsableMove, &mut FirstUsableMove, &mut SeededRng::new(1234))
            .unwrap();

        assert_eq!(report_a, report_b);
        assert_eq!(first.state(), second.state());
        assert!(first.is_terminal());
    }

    #[test]
    fn test_snapshot_mid_battle_continues_identically() {
        // Arrange: play two turns, then save both the state and the RNG stream.
        let mut original = fresh_engine();
        let mut rng = SeededRng::new(99);
        for _ in 0..2 {
            original.play_turn(TACKLE, TACKLE, &mut rng).unwrap();
        }
        let bytes = original.state().to_snapshot().unwrap();
        let mut forked_rng = rng.clone();

        // Act
        let restored_state = BattleState::from_snapshot(&bytes).unwrap();
        assert_eq!(&restored_state, original.state());
        let mut restored =
            BattleEngine::from_state(restored_state, BattleConfig::default()).unwrap();

        let report_original = original
            .run(&mut FirstUsableMove, &mut FirstUsableMove, &mut rng)
            .unwrap();
        let report_restored = restored
            .run(&mut FirstUsableMove, &mut FirstUsableMove, &mut forked_rng)
            .unwrap();

        // Assert
        assert_eq!(report_original, report_restored);
        assert_eq!(original.state(), restored.state());
    }

    #[test]
    fn test_json_round_trip_mid_battle() {
        let mut engine = fresh_engine();
        let mut rng = SeededRng::new(5);
        engine.play_turn(TACKLE, TACKLE, &mut rng).unwrap();

        let json = engine.state().to_json().unwrap();
        let restored = BattleState::from_json(&json).unwrap();
        assert_eq!(&restored, engine.state());
    }
}
