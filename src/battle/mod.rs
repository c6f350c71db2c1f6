pub mod ai;
pub mod calculators;
pub mod catch;
pub mod commands;
pub mod engine;
pub mod move_effects;
pub mod resolver;
pub mod rng;
pub mod runner;
pub mod state;
pub mod stats;
pub mod status;
pub mod turn_orchestrator;
pub mod type_chart;

#[cfg(test)]
pub(crate) mod tests;
