// Pokemon Battle Schema - Shared type definitions
// This crate contains the static, data-only enums shared by the battle engine:
// elemental types and their chart, move/stat/status tags, and the item and
// growth-rate catalogues.

// Re-export the main types
pub use battle_data::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod battle_data;
pub mod pokemon_types;
pub mod species_data;
