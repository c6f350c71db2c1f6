use crate::battle::rng::BattleRng;
use crate::config::CatchConfig;
use crate::pokemon::{Combatant, StatusCondition};
use log::debug;
use schema::{Item, ItemEffect};

/// Result of throwing a ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatchResult {
    pub caught: bool,
    /// Shake checks passed before the target broke free (or all of them).
    pub shakes: u8,
}

/// Calculate the status condition multiplier for catch rate
pub fn status_multiplier(status: &Option<StatusCondition>, config: &CatchConfig) -> f32 {
    match status {
        Some(StatusCondition::Sleep(_)) | Some(StatusCondition::Freeze) => {
            config.sleep_freeze_bonus
        }
        Some(StatusCondition::Paralysis)
        | Some(StatusCondition::Burn)
        | Some(StatusCondition::Poison) => config.other_status_bonus,
        None => 1.0,
    }
}

/// Modified catch rate:
/// `((3*max_hp - 2*hp) * catch_rate * ball * status) / (3*max_hp)`.
/// Lower HP widens the window.
pub fn modified_catch_rate(target: &Combatant, ball_modifier: f32, config: &CatchConfig) -> f32 {
    let max_hp = target.max_hp().max(1) as f32;
    let current_hp = target.current_hp as f32;
    let hp_window = 3.0 * max_hp - 2.0 * current_hp;
    hp_window * target.catch_rate as f32 * ball_modifier * status_multiplier(&target.status, config)
        / (3.0 * max_hp)
}

/// Probability threshold (out of 65536) that a single shake check passes.
pub fn shake_threshold(modified_rate: f32) -> u32 {
    if modified_rate <= 0.0 {
        return 0;
    }
    let threshold = 65536.0 / (255.0 / modified_rate as f64).powf(0.1875);
    threshold.min(65536.0) as u32
}

/// Throw `ball` at `target`. A guaranteed ball or a modified rate of 255
/// catches without any roll; otherwise each shake check rolls `0..65536`
/// until one fails.
pub fn attempt_catch(
    target: &Combatant,
    ball: Item,
    config: &CatchConfig,
    rng: &mut dyn BattleRng,
) -> CatchResult {
    let (modifier, guaranteed) = match ball.effect() {
        ItemEffect::Capture {
            modifier,
            guaranteed,
        } => (modifier, guaranteed),
        _ => (0.0, false),
    };

    let rate = modified_catch_rate(target, modifier, config);
    if guaranteed || rate >= 255.0 {
        return CatchResult {
            caught: true,
            shakes: config.shake_checks,
        };
    }

    let threshold = shake_threshold(rate);
    debug!("catch rate {:.2}, shake threshold {}", rate, threshold);

    let mut shakes = 0;
    if threshold > 0 {
        while shakes < config.shake_checks {
            if rng.next_below(65536, "catch shake") < threshold {
                shakes += 1;
            } else {
                break;
            }
        }
    }

    CatchResult {
        caught: shakes >= config.shake_checks,
        shakes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::rng::{ScriptedRng, SeededRng};
    use crate::battle::tests::common::TestCombatant;

    #[test]
    fn test_lower_hp_raises_rate() {
        let config = CatchConfig::default();
        let full = TestCombatant::new("Pidgey").hp(60).catch_rate(255).build();
        let weak = TestCombatant::new("Pidgey")
            .hp(60)
            .current_hp(1)
            .catch_rate(255)
            .build();
        let full_rate = modified_catch_rate(&full, 1.0, &config);
        let weak_rate = modified_catch_rate(&weak, 1.0, &config);
        assert!((full_rate - 85.0).abs() < 1e-3);
        assert!(weak_rate > full_rate);
    }

    #[test]
    fn test_status_multipliers() {
        let config = CatchConfig::default();
        assert_eq!(status_multiplier(&Some(StatusCondition::Sleep(2)), &config), 2.0);
        assert_eq!(status_multiplier(&Some(StatusCondition::Freeze), &config), 2.0);
        assert_eq!(status_multiplier(&Some(StatusCondition::Burn), &config), 1.5);
        assert_eq!(status_multiplier(&None, &config), 1.0);
    }

    #[test]
    fn test_master_ball_never_rolls() {
        let config = CatchConfig::default();
        let legend = TestCombatant::new("Mewtwo").catch_rate(3).build();
        let mut rng = ScriptedRng::new(vec![]);
        let result = attempt_catch(&legend, Item::MasterBall, &config, &mut rng);
        assert!(result.caught);
    }

    #[test]
    fn test_failed_check_stops_shaking() {
        let config = CatchConfig::default();
        let target = TestCombatant::new("Rattata").catch_rate(45).build();
        let threshold = shake_threshold(modified_catch_rate(&target, 1.0, &config));
        assert!(threshold > 0 && threshold < 65536);

        let mut rng = ScriptedRng::new(vec![0, threshold, 0]);
        let result = attempt_catch(&target, Item::PokeBall, &config, &mut rng);
        assert_eq!(
            result,
            CatchResult {
                caught: false,
                shakes: 1
            }
        );
        assert_eq!(rng.remaining(), 1);
    }

    #[test]
    fn test_weakened_targets_are_caught_more_often() {
        let config = CatchConfig::default();
        let healthy = TestCombatant::new("Oddish").hp(100).catch_rate(45).build();
        let weakened = TestCombatant::new("Oddish")
            .hp(100)
            .current_hp(1)
            .catch_rate(45)
            .status(StatusCondition::Sleep(2))
            .build();
        let mut rng = SeededRng::new(7);
        let count = |target: &Combatant, rng: &mut SeededRng| {
            (0..2000)
                .filter(|_| attempt_catch(target, Item::GreatBall, &config, rng).caught)
                .count()
        };
        let healthy_catches = count(&healthy, &mut rng);
        let weakened_catches = count(&weakened, &mut rng);
        assert!(weakened_catches > healthy_catches);
    }
}
