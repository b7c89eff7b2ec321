//! Life stages.
//!
//! Stages are ordered `Youth < Adult < MiddleAge < Elderly` and a game only
//! ever moves forward through them.

use serde::{Deserialize, Serialize};

/// A stage of the player's life.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    #[default]
    Youth,
    Adult,
    MiddleAge,
    Elderly,
}

impl LifeStage {
    /// All stages in order.
    pub const ALL: [LifeStage; 4] = [
        LifeStage::Youth,
        LifeStage::Adult,
        LifeStage::MiddleAge,
        LifeStage::Elderly,
    ];

    /// The following stage, or `None` from `Elderly`.
    #[must_use]
    pub const fn next(self) -> Option<LifeStage> {
        match self {
            LifeStage::Youth => Some(LifeStage::Adult),
            LifeStage::Adult => Some(LifeStage::MiddleAge),
            LifeStage::MiddleAge => Some(LifeStage::Elderly),
            LifeStage::Elderly => None,
        }
    }

    /// Zero-based position in the stage order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            LifeStage::Youth => "youth",
            LifeStage::Adult => "adult",
            LifeStage::MiddleAge => "middle_age",
            LifeStage::Elderly => "elderly",
        }
    }
}

impl std::fmt::Display for LifeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
