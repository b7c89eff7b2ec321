//! Decision making for automated playtests.

use crate::cards::{Card, CardType};
use crate::core::CardId;
use crate::game::Game;

/// Chooses what an automated player does on its turn.
pub trait Strategy {
    /// Index of the challenge to take on, if any.
    fn choose_challenge(&self, game: &Game, choices: &[Card]) -> Option<usize>;

    /// Hand cards to play against `challenge`.
    fn choose_played(&self, game: &Game, challenge: &Card) -> Vec<CardId>;

    /// Hand cards to throw away before the challenge.
    fn choose_discards(&self, _game: &Game) -> Vec<CardId> {
        Vec::new()
    }

    /// Insurance cards (from hand) to buy this turn, in order.
    fn choose_purchases(&self, _game: &Game) -> Vec<Card> {
        Vec::new()
    }
}

/// Plays the strongest cards it has and takes the hardest challenge it can
/// still win.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyStrategy;

impl GreedyStrategy {
    /// Hand cards with positive power at the current stage, strongest first.
    fn playable(game: &Game) -> Vec<(CardId, i64)> {
        let stage = game.stage();
        let mut cards: Vec<(CardId, i64)> = game
            .hand()
            .iter()
            .filter(|c| c.card_type() != CardType::Insurance)
            .map(|c| (c.id(), i64::from(c.effective_power(stage))))
            .filter(|(_, power)| *power > 0)
            .collect();
        cards.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        cards
    }
}

impl Strategy for GreedyStrategy {
    fn choose_challenge(&self, game: &Game, choices: &[Card]) -> Option<usize> {
        let available: i64 = Self::playable(game).iter().map(|(_, p)| p).sum();
        let required = |i: usize| i64::from(choices[i].required_power().unwrap_or(i32::MAX));

        let winnable = (0..choices.len())
            .filter(|&i| required(i) <= available)
            .max_by_key(|&i| (required(i), std::cmp::Reverse(i)));
        winnable.or_else(|| (0..choices.len()).min_by_key(|&i| (required(i), i)))
    }

    fn choose_played(&self, game: &Game, challenge: &Card) -> Vec<CardId> {
        let required = i64::from(challenge.required_power().unwrap_or(0));
        let mut played = Vec::new();
        let mut total = 0;
        for (id, power) in Self::playable(game) {
            if total >= required {
                break;
            }
            played.push(id);
            total += power;
        }
        played
    }

    fn choose_discards(&self, game: &Game) -> Vec<CardId> {
        game.hand()
            .iter()
            .filter(|c| c.is_trouble())
            .map(Card::id)
            .collect()
    }

    fn choose_purchases(&self, game: &Game) -> Vec<Card> {
        let room = game
            .config()
            .max_insurance_count
            .saturating_sub(game.insurance_cards().len());
        let mut budget = game.score();
        let mut picks = Vec::new();
        for card in game.hand().iter().filter(|c| c.card_type() == CardType::Insurance) {
            if picks.len() >= room {
                break;
            }
            let cost = card.cost().value();
            if cost <= budget {
                budget -= cost;
                picks.push(card.clone());
            }
        }
        picks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{create_challenge_card, create_life_card, ChallengeReward};
    use crate::core::GameConfig;
    use crate::rules::VictoryCondition;

    fn game(powers: &[i32]) -> Game {
        let deck: Vec<Card> = powers
            .iter()
            .enumerate()
            .map(|(i, p)| create_life_card(CardId::new(i as u32), "Card", *p))
            .collect();
        let config = GameConfig::new()
            .with_victory(VictoryCondition::Never)
            .with_hand_sizes(powers.len(), 7);
        Game::with_deck(config, deck).unwrap()
    }

    fn challenge(id: u32, required: i32) -> Card {
        create_challenge_card(CardId::new(id), "Test", required, ChallengeReward::Score(1))
    }

    #[test]
    fn test_picks_hardest_winnable() {
        let game = game(&[3, 2, -1]);
        let choices = vec![challenge(10, 2), challenge(11, 5), challenge(12, 9)];
        assert_eq!(GreedyStrategy.choose_challenge(&game, &choices), Some(1));
    }

    #[test]
    fn test_falls_back_to_easiest() {
        let game = game(&[1]);
        let choices = vec![challenge(10, 6), challenge(11, 4)];
        assert_eq!(GreedyStrategy.choose_challenge(&game, &choices), Some(1));
        assert_eq!(GreedyStrategy.choose_challenge(&game, &[]), None);
    }

    #[test]
    fn test_plays_strongest_first_and_stops() {
        let game = game(&[1, 4, 2, -2]);
        let played = GreedyStrategy.choose_played(&game, &challenge(10, 5));
        assert_eq!(played, vec![CardId::new(1), CardId::new(2)]);
    }

    #[test]
    fn test_discards_trouble() {
        let game = game(&[1, -2, 3]);
        assert_eq!(GreedyStrategy.choose_discards(&game), vec![CardId::new(1)]);
    }
}
