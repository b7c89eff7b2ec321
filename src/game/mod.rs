//! The game aggregate: vitality, life stage, turns, score, insurance.
//!
//! ## Key Types
//!
//! - `Game`: aggregate root owning its `CardManager`
//! - `GameStatus`: in progress, game over, completed
//! - `TurnReport` / `ProgressReport`: what a turn advance changed
//! - `GameSnapshot`: renderer-facing, serializable view

pub mod state;
pub mod snapshot;

pub use state::{Game, GameStatus, ProgressReport, TurnReport, MAX_CHALLENGE_CHOICES};
pub use snapshot::GameSnapshot;
