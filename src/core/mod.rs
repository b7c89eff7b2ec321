//! Core engine types: card ids, RNG, configuration, life stages, errors.
//!
//! These are the leaves of the dependency graph; everything else in the
//! crate builds on them.

pub mod entity;
pub mod rng;
pub mod config;
pub mod stage;
pub mod error;

pub use entity::CardId;
pub use rng::{GameRng, GameRngState};
pub use config::{Difficulty, GameConfig, StageThreshold};
pub use stage::LifeStage;
pub use error::{GameError, Result};
