//! Game rules that live outside the engine's own invariants.
//!
//! The engine owns defeat (vitality reaching zero). Victory is configured
//! per game via `VictoryCondition`.

pub mod engine;

pub use engine::{Progress, VictoryCondition};
