use schema::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which side of the battle an action or event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn to_index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    // The index refers to the move's position (0-3) in the combatant's move list.
    UseMove { move_index: usize },
    UseItem(Item),
    Flee,
    Catch(Item),
    /// Only legal once every move is out of PP.
    Struggle,
    Forfeit,
}

/// Items a side brought into the battle. Counts only ever go down.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Bag {
    items: BTreeMap<Item, u8>,
}

impl Bag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: Item, count: u8) -> Self {
        self.add(item, count);
        self
    }

    pub fn add(&mut self, item: Item, count: u8) {
        if count == 0 {
            return;
        }
        let entry = self.items.entry(item).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    pub fn count(&self, item: Item) -> u8 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    pub fn contains(&self, item: Item) -> bool {
        self.count(item) > 0
    }

    /// Remove one of `item`. Returns `false` if none were left.
    pub fn take(&mut self, item: Item) -> bool {
        match self.items.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                if *count == 0 {
                    self.items.remove(&item);
                }
                true
            }
            _ => false,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = (Item, u8)> + '_ {
        self.items.iter().map(|(item, count)| (*item, *count))
    }
}
