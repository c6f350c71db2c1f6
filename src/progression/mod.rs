//! Post-battle rewards: experience from a defeated combatant and the level
//! changes it causes.

pub mod leveling;
pub mod rewards;

pub use leveling::{apply_experience, LevelUpResult};
pub use rewards::RewardCalculator;
