//! Card manager: draw pile, hand, and discard pile.
//!
//! The `CardManager` owns every card that is in play and not held as an
//! insurance policy. Each card lives in exactly one of the three piles;
//! moves are the only way a card changes pile.
//!
//! - Draws take from the front of the draw pile
//! - An exhausted draw pile is refilled by shuffling the discard pile
//! - If both are empty the draw simply yields fewer cards (a drought)
//! - Hands over `max_hand_size` discard their oldest cards first
//!
//! Piles are `im::Vector`s so a whole game can be cloned in O(1) for
//! snapshots and rollback.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::Card;
use crate::core::{CardId, GameError, GameRng, Result};

/// Fewest cards a single draw may request.
pub const MIN_DRAW: usize = 1;

/// Most cards a single draw may request.
pub const MAX_DRAW: usize = 10;

/// Which pile a card is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pile {
    Draw,
    Hand,
    Discard,
}

/// What a draw did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOutcome {
    /// Cards moved into the hand, in draw order.
    pub drawn_cards: Vec<Card>,
    /// Hand cards discarded to respect the hand limit, oldest first.
    pub discarded_cards: Vec<Card>,
    /// Drawn cards with negative power.
    pub trouble_cards: Vec<Card>,
}

/// Manages the three card piles of one game.
///
/// ## Usage
///
/// ```
/// use life_cards::cards::create_life_card;
/// use life_cards::core::{CardId, GameRng};
/// use life_cards::zones::CardManager;
///
/// let mut manager = CardManager::new(GameRng::new(42), 7);
/// for i in 0..5 {
///     manager.add_to_draw_pile(create_life_card(CardId::new(i), "Job", 1)).unwrap();
/// }
///
/// let outcome = manager.draw_cards(3).unwrap();
/// assert_eq!(outcome.drawn_cards.len(), 3);
/// assert_eq!(manager.hand().len(), 3);
/// assert_eq!(manager.total_cards(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct CardManager {
    draw_pile: Vector<Card>,
    hand: Vector<Card>,
    discard_pile: Vector<Card>,
    max_hand_size: usize,
    rng: GameRng,
}

impl CardManager {
    /// Create an empty manager with the game's RNG.
    #[must_use]
    pub fn new(rng: GameRng, max_hand_size: usize) -> Self {
        Self {
            draw_pile: Vector::new(),
            hand: Vector::new(),
            discard_pile: Vector::new(),
            max_hand_size,
            rng,
        }
    }

    /// Check a requested draw count against the draw bounds.
    pub fn validate_draw_count(count: usize) -> Result<()> {
        if count < MIN_DRAW {
            return Err(GameError::validation(format!(
                "draw count must be {} or more (got {})",
                MIN_DRAW, count
            )));
        }
        if count > MAX_DRAW {
            return Err(GameError::validation(format!(
                "draw count must be {} or fewer (got {})",
                MAX_DRAW, count
            )));
        }
        Ok(())
    }

    // === Drawing ===

    /// Draw up to `count` cards into the hand.
    ///
    /// Fails only on an out-of-range count, before anything moves.
    pub fn draw_cards(&mut self, count: usize) -> Result<DrawOutcome> {
        Self::validate_draw_count(count)?;

        let mut outcome = DrawOutcome::default();
        for _ in 0..count {
            let Some(card) = self.pop_draw_pile() else {
                debug!(requested = count, drawn = outcome.drawn_cards.len(), "draw drought");
                break;
            };
            if card.is_trouble() {
                outcome.trouble_cards.push(card.clone());
            }
            outcome.drawn_cards.push(card.clone());
            self.hand.push_back(card);
        }

        outcome.discarded_cards = self.enforce_hand_limit();

        debug!(
            drawn = outcome.drawn_cards.len(),
            discarded = outcome.discarded_cards.len(),
            trouble = outcome.trouble_cards.len(),
            "cards drawn"
        );
        Ok(outcome)
    }

    fn pop_draw_pile(&mut self) -> Option<Card> {
        if self.draw_pile.is_empty() {
            self.shuffle_discard_into_draw();
        }
        self.draw_pile.pop_front()
    }

    fn enforce_hand_limit(&mut self) -> Vec<Card> {
        let mut discarded = Vec::new();
        while self.hand.len() > self.max_hand_size {
            if let Some(card) = self.hand.pop_front() {
                discarded.push(card.clone());
                self.discard_pile.push_back(card);
            }
        }
        discarded
    }

    // === Shuffling ===

    /// Shuffle the discard pile and put it behind the draw pile.
    ///
    /// No-op (and no RNG use) when the discard pile is empty.
    pub fn shuffle_discard_into_draw(&mut self) {
        if self.discard_pile.is_empty() {
            return;
        }

        let mut cards: Vec<Card> = std::mem::take(&mut self.discard_pile).into_iter().collect();
        self.rng.shuffle(&mut cards);
        debug!(count = cards.len(), "reshuffled discard pile into draw pile");
        self.draw_pile.extend(cards);
    }

    /// Shuffle the draw pile in place.
    pub fn shuffle_draw_pile(&mut self) {
        let mut cards: Vec<Card> = std::mem::take(&mut self.draw_pile).into_iter().collect();
        self.rng.shuffle(&mut cards);
        self.draw_pile = cards.into_iter().collect();
    }

    // === Hand moves ===

    /// Move cards from the hand to the discard pile.
    ///
    /// All ids must be in the hand; otherwise nothing moves.
    pub fn discard(&mut self, ids: &[CardId]) -> Result<Vec<Card>> {
        let cards = self.take_from_hand(ids)?;
        self.discard_pile.extend(cards.iter().cloned());
        Ok(cards)
    }

    /// Remove cards from the hand and hand them to the caller.
    ///
    /// The caller becomes responsible for putting them somewhere. All ids
    /// must be in the hand and distinct; otherwise nothing moves.
    pub fn take_from_hand(&mut self, ids: &[CardId]) -> Result<Vec<Card>> {
        self.check_in_hand(ids)?;

        let mut taken = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(pos) = self.hand.iter().position(|c| c.id() == *id) {
                taken.push(self.hand.remove(pos));
            }
        }
        Ok(taken)
    }

    /// Check that every id is in the hand, once.
    pub fn check_in_hand(&self, ids: &[CardId]) -> Result<()> {
        let mut seen = FxHashSet::default();
        for id in ids {
            if !seen.insert(*id) {
                return Err(GameError::validation(format!("{} listed more than once", id)));
            }
            if !self.hand_contains(*id) {
                return Err(GameError::not_found(format!("{} is not in hand", id)));
            }
        }
        Ok(())
    }

    // === Adding cards ===

    /// Add a new card to the bottom of the draw pile.
    pub fn add_to_draw_pile(&mut self, card: Card) -> Result<()> {
        self.ensure_new(card.id())?;
        self.draw_pile.push_back(card);
        Ok(())
    }

    /// Add a card to the top of the discard pile.
    ///
    /// Used both for new cards (rewards) and for cards coming back from
    /// outside the piles (played cards, expired insurance).
    pub fn add_to_discard(&mut self, card: Card) -> Result<()> {
        self.ensure_new(card.id())?;
        self.discard_pile.push_back(card);
        Ok(())
    }

    fn ensure_new(&self, id: CardId) -> Result<()> {
        match self.locate(id) {
            Some(pile) => Err(GameError::validation(format!(
                "{} is already in the {:?} pile",
                id, pile
            ))),
            None => Ok(()),
        }
    }

    // === Queries ===

    #[must_use]
    pub fn draw_pile(&self) -> &Vector<Card> {
        &self.draw_pile
    }

    #[must_use]
    pub fn hand(&self) -> &Vector<Card> {
        &self.hand
    }

    #[must_use]
    pub fn discard_pile(&self) -> &Vector<Card> {
        &self.discard_pile
    }

    #[must_use]
    pub fn max_hand_size(&self) -> usize {
        self.max_hand_size
    }

    #[must_use]
    pub fn hand_contains(&self, id: CardId) -> bool {
        self.hand.iter().any(|c| c.id() == id)
    }

    /// Find which pile holds a card.
    #[must_use]
    pub fn locate(&self, id: CardId) -> Option<Pile> {
        if self.hand_contains(id) {
            Some(Pile::Hand)
        } else if self.draw_pile.iter().any(|c| c.id() == id) {
            Some(Pile::Draw)
        } else if self.discard_pile.iter().any(|c| c.id() == id) {
            Some(Pile::Discard)
        } else {
            None
        }
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.locate(id).is_some()
    }

    /// Total cards across all three piles.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.draw_pile.len() + self.hand.len() + self.discard_pile.len()
    }

    /// Ids of every card in the piles, sorted.
    #[must_use]
    pub fn all_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .draw_pile
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard_pile.iter())
            .map(Card::id)
            .collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    /// The game's RNG. All randomness in a game goes through here.
    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }
}
