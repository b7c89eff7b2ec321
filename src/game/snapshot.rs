//! Game snapshots.
//!
//! A `GameSnapshot` is the structured, renderer-facing view of a game at one
//! moment: the fields a presentation layer draws after each action, plus
//! enough pile and RNG detail that two snapshots compare equal only when
//! the games will continue identically.

use serde::{Deserialize, Serialize};

use super::state::{Game, GameStatus};
use crate::cards::Card;
use crate::core::{GameError, GameRngState, LifeStage, Result};

/// Point-in-time view of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub turn: u32,
    pub stage: LifeStage,
    pub status: GameStatus,
    pub vitality: u32,
    pub score: u32,
    pub insurance_count: usize,
    pub insurance_cards: Vec<Card>,
    pub hand: Vec<Card>,
    pub draw_pile: Vec<Card>,
    pub discard_pile: Vec<Card>,
    pub challenge_choices: Vec<Card>,
    pub rng: GameRngState,
}

impl GameSnapshot {
    /// Capture the current state of a game.
    #[must_use]
    pub fn capture(game: &Game) -> Self {
        let cards = game.cards();
        Self {
            turn: game.turn(),
            stage: game.stage(),
            status: game.status(),
            vitality: game.vitality(),
            score: game.score(),
            insurance_count: game.insurance_cards().len(),
            insurance_cards: game.insurance_cards().iter().cloned().collect(),
            hand: cards.hand().iter().cloned().collect(),
            draw_pile: cards.draw_pile().iter().cloned().collect(),
            discard_pile: cards.discard_pile().iter().cloned().collect(),
            challenge_choices: game.challenge_choices().to_vec(),
            rng: cards.rng().state(),
        }
    }

    /// Encode with bincode for byte-for-byte comparison across runs.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| GameError::Serialization(e.to_string()))
    }

    /// Decode a snapshot produced by [`GameSnapshot::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| GameError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;

    #[test]
    fn test_capture_reflects_game() {
        let game = Game::new(GameConfig::default()).unwrap();
        let snapshot = game.snapshot();

        assert_eq!(snapshot.turn, 1);
        assert_eq!(snapshot.status, GameStatus::InProgress);
        assert_eq!(snapshot.vitality, game.vitality());
        assert_eq!(snapshot.hand.len(), game.hand().len());
        assert_eq!(snapshot.insurance_count, 0);
        assert_eq!(
            snapshot.hand.len() + snapshot.draw_pile.len() + snapshot.discard_pile.len(),
            game.cards().total_cards()
        );
    }

    #[test]
    fn test_bytes_restore() {
        let game = Game::new(GameConfig::default().with_seed(5)).unwrap();
        let snapshot = game.snapshot();
        let bytes = snapshot.to_bytes().unwrap();
        assert_eq!(GameSnapshot::from_bytes(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = Game::new(GameConfig::default().with_seed(1)).unwrap().snapshot();
        let b = Game::new(GameConfig::default().with_seed(2)).unwrap().snapshot();
        assert_ne!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
    }
}
