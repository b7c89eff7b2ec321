//! Game configuration.
//!
//! Callers configure a game at construction by providing a `GameConfig`.
//! All defaults are illustrative; none of them are balance decisions the
//! engine depends on.
//!
//! ```
//! use life_cards::core::{Difficulty, GameConfig};
//!
//! let config = GameConfig::default()
//!     .with_seed(7)
//!     .with_difficulty(Difficulty::Hard)
//!     .with_starting_vitality(15)
//!     .with_hand_sizes(4, 6);
//!
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};
use super::stage::LifeStage;
use crate::rules::VictoryCondition;

/// Difficulty level. Shapes the starter deck and challenge rolls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Probability that a seeded life card is a trouble card.
    #[must_use]
    pub fn trouble_ratio(self) -> f64 {
        match self {
            Difficulty::Easy => 0.1,
            Difficulty::Normal => 0.2,
            Difficulty::Hard => 0.3,
        }
    }

    /// Added to every rolled challenge's required power.
    #[must_use]
    pub fn challenge_offset(self) -> i32 {
        match self {
            Difficulty::Easy => -1,
            Difficulty::Normal => 0,
            Difficulty::Hard => 2,
        }
    }
}

/// When the game moves into `stage`.
///
/// The stage is entered once `turn >= min_turn` or `score >= min_score`,
/// whichever comes first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageThreshold {
    pub stage: LifeStage,
    pub min_turn: u32,
    pub min_score: u32,
}

impl StageThreshold {
    #[must_use]
    pub fn new(stage: LifeStage, min_turn: u32, min_score: u32) -> Self {
        Self {
            stage,
            min_turn,
            min_score,
        }
    }

    /// Check whether a game at `turn` with `score` has crossed this threshold.
    #[must_use]
    pub fn is_reached(&self, turn: u32, score: u32) -> bool {
        turn >= self.min_turn || score >= self.min_score
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the game's single RNG.
    pub seed: u64,

    /// Affects the starter deck and challenge power distribution.
    pub difficulty: Difficulty,

    /// Vitality at turn 1. Must be positive.
    pub starting_vitality: u32,

    /// Cards dealt into the hand at construction.
    pub starting_hand_size: usize,

    /// Hand limit enforced on every draw (oldest cards discarded first).
    pub max_hand_size: usize,

    /// Number of dream cards seeded into the draw pile.
    pub dream_card_count: usize,

    /// Number of life cards seeded into the draw pile.
    pub deck_size: usize,

    /// Maximum number of concurrently held insurance policies.
    pub max_insurance_count: usize,

    /// Stage transition thresholds, in stage order.
    pub stage_thresholds: Vec<StageThreshold>,

    /// How the game is won.
    pub victory: VictoryCondition,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: Difficulty::Normal,
            starting_vitality: 20,
            starting_hand_size: 5,
            max_hand_size: 7,
            dream_card_count: 2,
            deck_size: 20,
            max_insurance_count: 3,
            stage_thresholds: vec![
                StageThreshold::new(LifeStage::Adult, 6, 30),
                StageThreshold::new(LifeStage::MiddleAge, 12, 70),
                StageThreshold::new(LifeStage::Elderly, 18, 120),
            ],
            victory: VictoryCondition::SurviveUntilTurn(24),
        }
    }
}

impl GameConfig {
    /// Create a default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn with_starting_vitality(mut self, vitality: u32) -> Self {
        self.starting_vitality = vitality;
        self
    }

    /// Set starting and maximum hand sizes together.
    #[must_use]
    pub fn with_hand_sizes(mut self, starting: usize, max: usize) -> Self {
        self.starting_hand_size = starting;
        self.max_hand_size = max;
        self
    }

    #[must_use]
    pub fn with_dream_card_count(mut self, count: usize) -> Self {
        self.dream_card_count = count;
        self
    }

    #[must_use]
    pub fn with_deck_size(mut self, size: usize) -> Self {
        self.deck_size = size;
        self
    }

    #[must_use]
    pub fn with_max_insurance_count(mut self, count: usize) -> Self {
        self.max_insurance_count = count;
        self
    }

    #[must_use]
    pub fn with_stage_thresholds(mut self, thresholds: Vec<StageThreshold>) -> Self {
        self.stage_thresholds = thresholds;
        self
    }

    #[must_use]
    pub fn with_victory(mut self, victory: VictoryCondition) -> Self {
        self.victory = victory;
        self
    }

    /// Get the threshold for entering a stage, if configured.
    #[must_use]
    pub fn threshold_for(&self, stage: LifeStage) -> Option<&StageThreshold> {
        self.stage_thresholds.iter().find(|t| t.stage == stage)
    }

    /// Check the configuration before a game is built from it.
    pub fn validate(&self) -> Result<()> {
        if self.starting_vitality == 0 {
            return Err(GameError::validation("starting vitality must be positive"));
        }
        if self.starting_hand_size == 0 || self.max_hand_size == 0 {
            return Err(GameError::validation("hand sizes must be positive"));
        }
        if self.starting_hand_size > self.max_hand_size {
            return Err(GameError::validation(format!(
                "starting hand size {} exceeds maximum hand size {}",
                self.starting_hand_size, self.max_hand_size
            )));
        }

        let mut previous = LifeStage::Youth;
        for threshold in &self.stage_thresholds {
            if threshold.stage <= previous {
                return Err(GameError::validation(format!(
                    "stage threshold for {} is out of order",
                    threshold.stage
                )));
            }
            previous = threshold.stage;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::new()
            .with_seed(9)
            .with_difficulty(Difficulty::Easy)
            .with_starting_vitality(10)
            .with_hand_sizes(3, 4)
            .with_dream_card_count(0)
            .with_deck_size(12)
            .with_max_insurance_count(1)
            .with_victory(VictoryCondition::ReachScore(50));

        assert_eq!(config.seed, 9);
        assert_eq!(config.difficulty, Difficulty::Easy);
        assert_eq!(config.starting_vitality, 10);
        assert_eq!(config.starting_hand_size, 3);
        assert_eq!(config.max_hand_size, 4);
        assert_eq!(config.dream_card_count, 0);
        assert_eq!(config.deck_size, 12);
        assert_eq!(config.max_insurance_count, 1);
        assert_eq!(config.victory, VictoryCondition::ReachScore(50));
    }

    #[test]
    fn test_rejects_zero_vitality() {
        let err = GameConfig::new().with_starting_vitality(0).validate().unwrap_err();
        assert!(matches!(err, GameError::Validation(_)));
    }

    #[test]
    fn test_rejects_starting_hand_over_max() {
        let err = GameConfig::new().with_hand_sizes(8, 7).validate().unwrap_err();
        assert!(err.to_string().contains("exceeds maximum hand size"));
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let config = GameConfig::new().with_stage_thresholds(vec![
            StageThreshold::new(LifeStage::MiddleAge, 5, 10),
            StageThreshold::new(LifeStage::Adult, 8, 20),
        ]);
        assert!(config.validate().is_err());

        let youth = GameConfig::new()
            .with_stage_thresholds(vec![StageThreshold::new(LifeStage::Youth, 1, 1)]);
        assert!(youth.validate().is_err());
    }

    #[test]
    fn test_threshold_reached_by_turn_or_score() {
        let threshold = StageThreshold::new(LifeStage::Adult, 6, 30);
        assert!(!threshold.is_reached(5, 29));
        assert!(threshold.is_reached(6, 0));
        assert!(threshold.is_reached(1, 30));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"starting_vitality": 12, "difficulty": "hard"}"#).unwrap();
        assert_eq!(config.starting_vitality, 12);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.max_hand_size, GameConfig::default().max_hand_size);
    }
}
