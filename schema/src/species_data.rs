use crate::{StatType, StatusType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Items usable from inside a battle turn. Inventory outside the battle is
/// owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub enum Item {
    // Healing
    Potion,
    SuperPotion,
    HyperPotion,
    MaxPotion,
    // Status cures
    FullHeal,
    Antidote,
    BurnHeal,
    ParalyzeHeal,
    Awakening,
    IceHeal,
    // Battle boosts
    XAttack,
    XDefense,
    XSpecialAttack,
    XSpecialDefense,
    XSpeed,
    XAccuracy,
    // Capture
    PokeBall,
    GreatBall,
    UltraBall,
    MasterBall,
}

/// What an item does when it is used in battle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Restore this much HP (`None` restores to full).
    RestoreHp(Option<u16>),
    /// Cure one status, or any status when `None`.
    CureStatus(Option<StatusType>),
    RaiseStat(StatType),
    /// Capture ball with its catch-rate multiplier.
    Capture { modifier: f32, guaranteed: bool },
}

impl Item {
    pub fn effect(&self) -> ItemEffect {
        match self {
            Item::Potion => ItemEffect::RestoreHp(Some(20)),
            Item::SuperPotion => ItemEffect::RestoreHp(Some(50)),
            Item::HyperPotion => ItemEffect::RestoreHp(Some(200)),
            Item::MaxPotion => ItemEffect::RestoreHp(None),
            Item::FullHeal => ItemEffect::CureStatus(None),
            Item::Antidote => ItemEffect::CureStatus(Some(StatusType::Poison)),
            Item::BurnHeal => ItemEffect::CureStatus(Some(StatusType::Burn)),
            Item::ParalyzeHeal => ItemEffect::CureStatus(Some(StatusType::Paralysis)),
            Item::Awakening => ItemEffect::CureStatus(Some(StatusType::Sleep)),
            Item::IceHeal => ItemEffect::CureStatus(Some(StatusType::Freeze)),
            Item::XAttack => ItemEffect::RaiseStat(StatType::Attack),
            Item::XDefense => ItemEffect::RaiseStat(StatType::Defense),
            Item::XSpecialAttack => ItemEffect::RaiseStat(StatType::SpecialAttack),
            Item::XSpecialDefense => ItemEffect::RaiseStat(StatType::SpecialDefense),
            Item::XSpeed => ItemEffect::RaiseStat(StatType::Speed),
            Item::XAccuracy => ItemEffect::RaiseStat(StatType::Accuracy),
            Item::PokeBall => ItemEffect::Capture {
                modifier: 1.0,
                guaranteed: false,
            },
            Item::GreatBall => ItemEffect::Capture {
                modifier: 1.5,
                guaranteed: false,
            },
            Item::UltraBall => ItemEffect::Capture {
                modifier: 2.0,
                guaranteed: false,
            },
            Item::MasterBall => ItemEffect::Capture {
                modifier: 255.0,
                guaranteed: true,
            },
        }
    }

    pub fn is_capture_ball(&self) -> bool {
        matches!(self.effect(), ItemEffect::Capture { .. })
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            Item::Potion => "Potion",
            Item::SuperPotion => "Super Potion",
            Item::HyperPotion => "Hyper Potion",
            Item::MaxPotion => "Max Potion",
            Item::FullHeal => "Full Heal",
            Item::Antidote => "Antidote",
            Item::BurnHeal => "Burn Heal",
            Item::ParalyzeHeal => "Paralyze Heal",
            Item::Awakening => "Awakening",
            Item::IceHeal => "Ice Heal",
            Item::XAttack => "X Attack",
            Item::XDefense => "X Defense",
            Item::XSpecialAttack => "X Sp. Atk",
            Item::XSpecialDefense => "X Sp. Def",
            Item::XSpeed => "X Speed",
            Item::XAccuracy => "X Accuracy",
            Item::PokeBall => "Poke Ball",
            Item::GreatBall => "Great Ball",
            Item::UltraBall => "Ultra Ball",
            Item::MasterBall => "Master Ball",
        };
        write!(f, "{}", display_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

/// Experience curve of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GrowthRate {
    Fast,
    #[default]
    MediumFast,
    MediumSlow,
    Slow,
}

impl GrowthRate {
    /// Total experience needed to reach `level`.
    pub fn exp_for_level(&self, level: u8) -> u32 {
        if level <= 1 {
            return 0;
        }
        let n = level as i64;
        let total = match self {
            GrowthRate::Fast => 4 * n * n * n / 5,
            GrowthRate::MediumFast => n * n * n,
            GrowthRate::MediumSlow => 6 * n * n * n / 5 - 15 * n * n + 100 * n - 140,
            GrowthRate::Slow => 5 * n * n * n / 4,
        };
        total.max(0) as u32
    }
}
