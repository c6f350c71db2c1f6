use crate::battle::state::{BattleKind, BattleState};
use crate::moves::{Move, MoveAccuracy};
use crate::pokemon::{Combatant, StatBlock, StatusCondition};
use schema::{BaseStats, ElementalType, GrowthRate, MoveCategory};

/// A builder for test combatants with plain, easy-to-reason-about defaults:
/// a level 10 Normal type with 40 HP, 20 in every other stat and a single
/// 40-power Tackle.
///
/// # Example
/// ```ignore
/// let target = TestCombatant::new("Geodude")
///     .types(vec![ElementalType::Rock, ElementalType::Ground])
///     .defense(25)
///     .status(StatusCondition::Paralysis)
///     .build();
/// ```
pub struct TestCombatant {
    name: String,
    types: Vec<ElementalType>,
    level: u8,
    stats: StatBlock,
    current_hp: Option<u16>,
    status: Option<StatusCondition>,
    catch_rate: Option<u8>,
    exp_yield: Option<u16>,
    growth_rate: Option<GrowthRate>,
    base_stats: Option<BaseStats>,
    moves: Vec<Move>,
}

impl TestCombatant {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            types: vec![ElementalType::Normal],
            level: 10,
            stats: StatBlock {
                hp: 40,
                attack: 20,
                defense: 20,
                special_attack: 20,
                special_defense: 20,
                speed: 20,
            },
            current_hp: None,
            status: None,
            catch_rate: None,
            exp_yield: None,
            growth_rate: None,
            base_stats: None,
            moves: vec![physical_move("Tackle", ElementalType::Normal, 40)],
        }
    }

    pub fn types(mut self, types: Vec<ElementalType>) -> Self {
        self.types = types;
        self
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    /// Sets max HP. Current HP follows unless set explicitly.
    pub fn hp(mut self, hp: u16) -> Self {
        self.stats.hp = hp;
        self
    }

    pub fn current_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn attack(mut self, value: u16) -> Self {
        self.stats.attack = value;
        self
    }

    pub fn defense(mut self, value: u16) -> Self {
        self.stats.defense = value;
        self
    }

    pub fn special_attack(mut self, value: u16) -> Self {
        self.stats.special_attack = value;
        self
    }

    pub fn special_defense(mut self, value: u16) -> Self {
        self.stats.special_defense = value;
        self
    }

    pub fn speed(mut self, value: u16) -> Self {
        self.stats.speed = value;
        self
    }

    pub fn status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    pub fn catch_rate(mut self, rate: u8) -> Self {
        self.catch_rate = Some(rate);
        self
    }

    pub fn exp_yield(mut self, value: u16) -> Self {
        self.exp_yield = Some(value);
        self
    }

    pub fn growth_rate(mut self, rate: GrowthRate) -> Self {
        self.growth_rate = Some(rate);
        self
    }

    /// Derive every stat from `base` at `level`, overriding explicit stats.
    pub fn base_stats(mut self, base: BaseStats, level: u8) -> Self {
        self.base_stats = Some(base);
        self.level = level;
        self
    }

    pub fn moves(mut self, moves: Vec<Move>) -> Self {
        self.moves = moves;
        self
    }

    pub fn build(self) -> Combatant {
        let mut combatant = match self.base_stats {
            Some(base) => {
                Combatant::from_base_stats(self.name, self.types, self.level, base, self.moves)
            }
            None => Combatant::new(self.name, self.types, self.level, self.stats, self.moves),
        };
        if let Some(rate) = self.growth_rate {
            combatant = combatant.with_growth_rate(rate);
        }
        if let Some(rate) = self.catch_rate {
            combatant = combatant.with_catch_rate(rate);
        }
        if let Some(value) = self.exp_yield {
            combatant = combatant.with_exp_yield(value);
        }
        if let Some(status) = self.status {
            combatant = combatant.with_status(status);
        }
        if let Some(hp) = self.current_hp {
            combatant = combatant.with_current_hp(hp);
        }
        combatant
    }
}

/// Wild battle between two prepared combatants, empty bags.
pub fn create_test_battle(player: Combatant, opponent: Combatant) -> BattleState {
    BattleState::new(player, opponent, BattleKind::Wild)
}

/// A sure-hit physical move with 35 PP.
pub fn physical_move(name: &str, move_type: ElementalType, power: u16) -> Move {
    Move::new(
        name,
        move_type,
        MoveCategory::Physical,
        power,
        MoveAccuracy::Percent(100),
        35,
    )
}

pub fn special_move(name: &str, move_type: ElementalType, power: u16) -> Move {
    Move::new(
        name,
        move_type,
        MoveCategory::Special,
        power,
        MoveAccuracy::Percent(100),
        15,
    )
}

/// A zero-power status move; attach effects with `with_effect`.
pub fn status_move(name: &str, move_type: ElementalType) -> Move {
    Move::new(
        name,
        move_type,
        MoveCategory::Status,
        0,
        MoveAccuracy::Percent(100),
        20,
    )
}
