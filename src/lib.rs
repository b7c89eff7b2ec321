//! # life-cards
//!
//! A deterministic, turn-based life-simulation card game engine.
//!
//! The player draws life cards, plays them against challenges, buys
//! insurance against the challenges they fail, and ages through life stages
//! until their vitality runs out or their life goals are met.
//!
//! ## Design Principles
//!
//! 1. **One mutation boundary**: a presentation layer changes a game only
//!    through `ActionProcessor::execute`, which always returns an
//!    `ActionResult` and never panics on bad input.
//!
//! 2. **Atomic actions**: a failed action leaves the game exactly as it was.
//!
//! 3. **Deterministic**: one seeded `GameRng` per game. The same seed and the
//!    same actions give the same results, byte for byte.
//!
//! ## Architecture
//!
//! - **Immutable cards**: changing a card means deriving a new one with
//!   `Card::copy`.
//!
//! - **Persistent Data Structures**: piles are `im::Vector`s, so cloning a
//!   `Game` is O(1); the processor uses this for rollback.
//!
//! ## Modules
//!
//! - `core`: Card ids, RNG, configuration, life stages, errors
//! - `cards`: The card entity, effects, and card factories
//! - `zones`: Draw pile, hand, and discard pile
//! - `rules`: Victory conditions
//! - `game`: The game aggregate and snapshots
//! - `actions`: Action handlers and the processor
//! - `telemetry`: Observer hooks
//! - `playtest`: Automated seeded playtests

pub mod core;
pub mod cards;
pub mod zones;
pub mod rules;
pub mod game;
pub mod actions;
pub mod telemetry;
pub mod playtest;

// Re-export commonly used types
pub use crate::core::{
    CardId, Difficulty, GameConfig, GameError, GameRng, GameRngState, LifeStage, Result,
    StageThreshold,
};

pub use crate::cards::{
    Card, CardKind, CardOverrides, CardType, ChallengeReward, Cost, Duration, Effect, EffectTag,
    InsuranceTerms, Power,
};

pub use crate::zones::{CardManager, DrawOutcome, Pile};

pub use crate::rules::VictoryCondition;

pub use crate::game::{Game, GameSnapshot, GameStatus, TurnReport};

pub use crate::actions::{
    ActionData, ActionHandler, ActionPayload, ActionProcessor, ActionResult, EffectKind,
    EffectReport,
};

pub use crate::telemetry::{GameObserver, NoopObserver, RecordingObserver};

pub use crate::playtest::{PlaytestConfig, PlaytestReport, PlaytestRunner};
