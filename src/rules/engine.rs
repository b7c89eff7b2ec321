//! Victory conditions.
//!
//! The engine decides when a game is lost (vitality reaches zero). When it
//! is won is a rule of the surrounding game, expressed as a
//! `VictoryCondition` in the game's configuration and evaluated after every
//! state change.

use serde::{Deserialize, Serialize};

use crate::core::LifeStage;

/// The observable progress a victory condition is checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub turn: u32,
    pub score: u32,
    pub stage: LifeStage,
}

/// When a game counts as completed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryCondition {
    /// Still alive when this turn begins.
    SurviveUntilTurn(u32),
    /// Score at least this much.
    ReachScore(u32),
    /// Reach this life stage.
    ReachStage(LifeStage),
    /// Every listed condition holds.
    AllOf(Vec<VictoryCondition>),
    /// The game can only end in defeat (endless mode).
    Never,
}

impl VictoryCondition {
    /// Check the condition against current progress.
    #[must_use]
    pub fn is_met(&self, progress: Progress) -> bool {
        match self {
            VictoryCondition::SurviveUntilTurn(turn) => progress.turn >= *turn,
            VictoryCondition::ReachScore(score) => progress.score >= *score,
            VictoryCondition::ReachStage(stage) => progress.stage >= *stage,
            VictoryCondition::AllOf(conditions) => {
                !conditions.is_empty() && conditions.iter().all(|c| c.is_met(progress))
            }
            VictoryCondition::Never => false,
        }
    }
}
