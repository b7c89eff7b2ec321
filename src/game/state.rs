//! The game aggregate.
//!
//! ## State machine
//!
//! ```text
//! InProgress ──vitality hits 0──▶ GameOver
//!      │
//!      └────victory condition───▶ Completed
//! ```
//!
//! Both terminal states reject every further mutation with
//! `GameError::IllegalState`. While in progress the game also moves
//! forward through life stages as turn and score thresholds are crossed.
//!
//! ## Ownership
//!
//! A `Game` exclusively owns its `CardManager` (and through it the single
//! RNG). Cloning a game is O(1) in the pile sizes thanks to `im`.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::snapshot::GameSnapshot;
use crate::cards::{
    create_dream_card, roll_challenge_card, roll_life_card, Card, CardKind, CardOverrides,
    ChallengeReward,
};
use crate::core::{CardId, GameConfig, GameError, GameRng, LifeStage, Result};
use crate::rules::Progress;
use crate::zones::{CardManager, MAX_DRAW};

/// Most challenges that can be published at once.
pub const MAX_CHALLENGE_CHOICES: usize = 5;

/// Game status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    InProgress,
    GameOver,
    Completed,
}

impl GameStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Stage and status changes caused by one state change.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Stages entered, in order.
    pub stages_entered: Vec<LifeStage>,
    /// The game became `Completed`.
    pub completed: bool,
}

/// What happened during a turn advance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// The new turn number.
    pub turn: u32,
    /// Term policies that ran out.
    pub expired: Vec<Card>,
    /// Policies dropped because their upkeep could not be paid.
    pub lapsed: Vec<Card>,
    /// Total upkeep deducted from score.
    pub upkeep_paid: u32,
    pub progress: ProgressReport,
}

/// The aggregate root of one play-through.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    vitality: u32,
    stage: LifeStage,
    turn: u32,
    status: GameStatus,
    score: u32,
    insurance_cards: Vector<Card>,
    challenge_choices: Vec<Card>,
    cards: CardManager,
    next_card_id: CardId,
}

impl Game {
    /// Create a game with a rolled starter deck.
    ///
    /// The draw pile gets `deck_size` life cards and `dream_card_count`
    /// dream cards, is shuffled, and the starting hand is dealt.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;

        let mut game = Self::empty(config);
        for _ in 0..game.config.deck_size {
            let id = game.alloc_card_id()?;
            let difficulty = game.config.difficulty;
            let card = roll_life_card(id, difficulty, game.cards.rng_mut());
            game.cards.add_to_draw_pile(card)?;
        }
        for i in 0..game.config.dream_card_count {
            let id = game.alloc_card_id()?;
            let stage = LifeStage::ALL[i % LifeStage::ALL.len()];
            game.cards.add_to_draw_pile(create_dream_card(id, stage))?;
        }
        game.cards.shuffle_draw_pile();
        game.deal_starting_hand()?;

        info!(
            seed = game.config.seed,
            draw_pile = game.cards.draw_pile().len(),
            hand = game.cards.hand().len(),
            "game created"
        );
        Ok(game)
    }

    /// Create a game from a caller-built deck, used in the given order.
    ///
    /// Card ids must be distinct. New ids are allocated above the highest
    /// id in the deck, so a deck holding `u32::MAX` is rejected.
    pub fn with_deck(config: GameConfig, deck: impl IntoIterator<Item = Card>) -> Result<Self> {
        config.validate()?;

        let mut game = Self::empty(config);
        for card in deck {
            game.reserve_card_id(card.id())?;
            game.cards.add_to_draw_pile(card)?;
        }
        game.deal_starting_hand()?;
        Ok(game)
    }

    fn empty(config: GameConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            vitality: config.starting_vitality,
            stage: LifeStage::Youth,
            turn: 1,
            status: GameStatus::InProgress,
            score: 0,
            insurance_cards: Vector::new(),
            challenge_choices: Vec::new(),
            cards: CardManager::new(rng, config.max_hand_size),
            next_card_id: CardId::new(0),
            config,
        }
    }

    fn deal_starting_hand(&mut self) -> Result<()> {
        let mut remaining = self.config.starting_hand_size;
        while remaining > 0 {
            let drawn = self.cards.draw_cards(remaining.min(MAX_DRAW))?.drawn_cards.len();
            if drawn == 0 {
                break;
            }
            remaining = remaining.saturating_sub(drawn);
        }
        Ok(())
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn vitality(&self) -> u32 {
        self.vitality
    }

    #[must_use]
    pub fn stage(&self) -> LifeStage {
        self.stage
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn insurance_cards(&self) -> &Vector<Card> {
        &self.insurance_cards
    }

    /// The currently published challenge selection set.
    #[must_use]
    pub fn challenge_choices(&self) -> &[Card] {
        &self.challenge_choices
    }

    #[must_use]
    pub fn cards(&self) -> &CardManager {
        &self.cards
    }

    #[must_use]
    pub fn hand(&self) -> &Vector<Card> {
        self.cards.hand()
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            turn: self.turn,
            score: self.score,
            stage: self.stage,
        }
    }

    /// Fail with `IllegalState` unless the game is in progress.
    pub fn ensure_in_progress(&self) -> Result<()> {
        match self.status {
            GameStatus::InProgress => Ok(()),
            status => Err(GameError::illegal_state(format!(
                "game is {:?}; no further actions are allowed",
                status
            ))),
        }
    }

    /// Is this id part of the game's card pool (piles or held insurance)?
    #[must_use]
    pub fn in_card_pool(&self, id: CardId) -> bool {
        self.cards.contains(id) || self.insurance_cards.iter().any(|c| c.id() == id)
    }

    /// Is this id taken, either in the card pool or by a published
    /// challenge or its insurance reward?
    #[must_use]
    pub fn knows_card(&self, id: CardId) -> bool {
        self.in_card_pool(id) || self.published_ids().any(|published| published == id)
    }

    /// The published challenge with this id, if any.
    #[must_use]
    pub fn published_challenge(&self, id: CardId) -> Option<&Card> {
        self.challenge_choices.iter().find(|c| c.id() == id)
    }

    fn published_ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.challenge_choices.iter().flat_map(|card| {
            let reward = match card.challenge_reward() {
                Some(ChallengeReward::Insurance(reward)) => Some(reward.id()),
                _ => None,
            };
            std::iter::once(card.id()).chain(reward)
        })
    }

    /// Allocate a fresh card id.
    pub fn alloc_card_id(&mut self) -> Result<CardId> {
        let id = self.next_card_id;
        self.reserve_card_id(id)?;
        Ok(id)
    }

    /// Keep later allocations above `id`.
    fn reserve_card_id(&mut self, id: CardId) -> Result<()> {
        if id >= self.next_card_id {
            self.next_card_id = id.checked_next().ok_or_else(|| {
                GameError::validation(format!("{} leaves no room for new card ids", id))
            })?;
        }
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }

    // === Turn advance ===

    /// Advance to the next turn.
    ///
    /// Ticks term insurance (expired policies go to the discard pile),
    /// charges upkeep, clears `used` flags, then re-evaluates stage and
    /// victory. On error the game is left untouched.
    pub fn advance_turn(&mut self) -> Result<TurnReport> {
        self.ensure_in_progress()?;

        let mut expired = Vec::new();
        let mut kept = Vec::new();
        for card in self.insurance_cards.iter().cloned() {
            let term = card.insurance_terms().copied().filter(|t| t.is_term());
            match term {
                Some(terms) => {
                    let ticked = terms.ticked();
                    let card = card.copy(CardOverrides {
                        kind: Some(CardKind::Insurance(ticked)),
                        ..CardOverrides::default()
                    });
                    if ticked.remaining_turns() == Some(0) {
                        expired.push(card);
                    } else {
                        kept.push(card);
                    }
                }
                None => kept.push(card),
            }
        }

        let mut lapsed = Vec::new();
        let mut upkeep_paid = 0;
        let mut score = self.score;
        let mut held = Vector::new();
        for card in kept {
            let penalty = card.insurance_terms().map_or(0, |t| t.penalty);
            if penalty == 0 {
                held.push_back(card.with_used(false));
            } else if score >= penalty {
                score -= penalty;
                upkeep_paid += penalty;
                held.push_back(card.with_used(false));
            } else {
                lapsed.push(card);
            }
        }

        let mut cards = self.cards.clone();
        for card in expired.iter().chain(lapsed.iter()) {
            cards.add_to_discard(card.with_used(false))?;
        }

        self.turn += 1;
        self.score = score;
        self.insurance_cards = held;
        self.cards = cards;

        let progress = self.update_progress();
        debug!(
            turn = self.turn,
            expired = expired.len(),
            lapsed = lapsed.len(),
            upkeep_paid,
            "turn advanced"
        );

        Ok(TurnReport {
            turn: self.turn,
            expired,
            lapsed,
            upkeep_paid,
            progress,
        })
    }

    // === Challenges ===

    /// Replace the published challenge set with `count` new challenges.
    pub(crate) fn publish_challenges(&mut self, count: usize) -> Result<&[Card]> {
        self.ensure_in_progress()?;
        if count == 0 || count > MAX_CHALLENGE_CHOICES {
            return Err(GameError::validation(format!(
                "challenge count must be between 1 and {} (got {})",
                MAX_CHALLENGE_CHOICES, count
            )));
        }

        let mut choices = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.alloc_card_id()?;
            let reward_id = self.alloc_card_id()?;
            let (stage, difficulty) = (self.stage, self.config.difficulty);
            choices.push(roll_challenge_card(
                id,
                reward_id,
                stage,
                difficulty,
                self.cards.rng_mut(),
            ));
        }
        self.challenge_choices = choices;
        Ok(&self.challenge_choices)
    }

    // === Crate-internal mutation (used by action handlers) ===

    pub(crate) fn cards_mut(&mut self) -> &mut CardManager {
        &mut self.cards
    }

    /// Remove a challenge from the published set, if present.
    pub(crate) fn take_challenge_choice(&mut self, id: CardId) -> Option<Card> {
        let pos = self.challenge_choices.iter().position(|c| c.id() == id)?;
        Some(self.challenge_choices.remove(pos))
    }

    /// Apply a vitality change, clamped to `0..=starting_vitality`.
    ///
    /// Returns the change actually applied. Reaching zero ends the game.
    pub(crate) fn change_vitality(&mut self, delta: i64) -> i64 {
        let max = i64::from(self.config.starting_vitality.max(self.vitality));
        let before = i64::from(self.vitality);
        let after = (before + delta).clamp(0, max);
        self.vitality = after as u32;

        if self.vitality == 0 && !self.is_terminal() {
            self.status = GameStatus::GameOver;
            info!(turn = self.turn, "vitality exhausted; game over");
        }
        after - before
    }

    pub(crate) fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    pub(crate) fn spend_score(&mut self, amount: u32) -> Result<()> {
        if self.score < amount {
            return Err(GameError::validation(format!(
                "score {} cannot cover cost {}",
                self.score, amount
            )));
        }
        self.score -= amount;
        Ok(())
    }

    pub(crate) fn hold_insurance(&mut self, card: Card) -> Result<()> {
        self.reserve_card_id(card.id())?;
        self.insurance_cards.push_back(card);
        Ok(())
    }

    /// Put a card into the discard pile, reserving its id.
    pub(crate) fn discard_card(&mut self, card: Card) -> Result<()> {
        self.reserve_card_id(card.id())?;
        self.cards.add_to_discard(card)
    }

    /// Mark held policies as used for the rest of the turn.
    pub(crate) fn mark_insurance_used(&mut self, ids: &[CardId]) {
        self.insurance_cards = self
            .insurance_cards
            .iter()
            .map(|c| {
                if ids.contains(&c.id()) {
                    c.with_used(true)
                } else {
                    c.clone()
                }
            })
            .collect();
    }

    /// Advance stages whose thresholds are met, then check for victory.
    pub(crate) fn update_progress(&mut self) -> ProgressReport {
        let mut report = ProgressReport::default();
        if self.is_terminal() {
            return report;
        }

        while let Some(next) = self.stage.next() {
            let reached = self
                .config
                .threshold_for(next)
                .is_some_and(|t| t.is_reached(self.turn, self.score));
            if !reached {
                break;
            }
            self.stage = next;
            report.stages_entered.push(next);
            info!(stage = %next, turn = self.turn, "life stage advanced");
        }

        if self.config.victory.is_met(self.progress()) {
            self.status = GameStatus::Completed;
            report.completed = true;
            info!(turn = self.turn, score = self.score, "game completed");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{create_life_card, Effect, InsuranceTerms};
    use crate::core::StageThreshold;
    use crate::rules::VictoryCondition;

    fn deck(count: u32) -> Vec<Card> {
        (0..count)
            .map(|i| create_life_card(CardId::new(i), "Card", 1))
            .collect()
    }

    fn endless() -> GameConfig {
        GameConfig::new().with_victory(VictoryCondition::Never)
    }

    fn policy(id: u32, terms: InsuranceTerms) -> Card {
        crate::cards::create_insurance_card(CardId::new(id), "Policy", 0, terms, [Effect::shield()])
            .unwrap()
    }

    #[test]
    fn test_new_game_deals_hand() {
        let game = Game::new(GameConfig::default()).unwrap();
        let config = GameConfig::default();

        assert_eq!(game.turn(), 1);
        assert_eq!(game.stage(), LifeStage::Youth);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.vitality(), config.starting_vitality);
        assert_eq!(game.hand().len(), config.starting_hand_size);
        assert_eq!(
            game.cards().total_cards(),
            config.deck_size + config.dream_card_count
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(Game::new(GameConfig::new().with_hand_sizes(9, 3)).is_err());
    }

    #[test]
    fn test_with_deck_preserves_order() {
        let game = Game::with_deck(endless().with_hand_sizes(2, 5), deck(4)).unwrap();
        let hand: Vec<_> = game.hand().iter().map(Card::id).collect();
        assert_eq!(hand, vec![CardId::new(0), CardId::new(1)]);
    }

    #[test]
    fn test_alloc_above_deck_ids() {
        let mut game = Game::with_deck(endless(), deck(4)).unwrap();
        assert_eq!(game.alloc_card_id().unwrap(), CardId::new(4));
        assert_eq!(game.alloc_card_id().unwrap(), CardId::new(5));
    }

    #[test]
    fn test_with_deck_rejects_last_id() {
        let deck = vec![create_life_card(CardId::new(u32::MAX), "Card", 1)];
        let err = Game::with_deck(endless(), deck).unwrap_err();
        assert!(matches!(err, GameError::Validation(_)));
    }

    #[test]
    fn test_incoming_cards_reserve_ids() {
        let mut game = Game::with_deck(endless(), deck(4)).unwrap();
        game.hold_insurance(policy(20, InsuranceTerms::whole_life(1))).unwrap();
        assert_eq!(game.alloc_card_id().unwrap(), CardId::new(21));

        game.discard_card(create_life_card(CardId::new(30), "Gift", 1)).unwrap();
        assert_eq!(game.alloc_card_id().unwrap(), CardId::new(31));
    }

    #[test]
    fn test_failed_advance_leaves_game_untouched() {
        let mut game = Game::with_deck(endless().with_hand_sizes(1, 5), deck(4)).unwrap();
        game.add_score(5);
        // Id 3 is still in the draw pile, so the expiring policy cannot be discarded.
        game.hold_insurance(policy(3, InsuranceTerms::term(1, 1))).unwrap();
        game.hold_insurance(policy(100, InsuranceTerms::whole_life(1).with_penalty(1))).unwrap();
        let before = game.snapshot();

        assert!(game.advance_turn().is_err());
        assert_eq!(game.snapshot(), before);
        assert_eq!(game.turn(), 1);
        assert_eq!(game.score(), 5);
        assert_eq!(game.insurance_cards().len(), 2);
    }

    #[test]
    fn test_advance_turn_ticks_term_insurance() {
        let mut game = Game::with_deck(endless(), deck(6)).unwrap();
        game.hold_insurance(policy(100, InsuranceTerms::term(2, 1))).unwrap();
        game.hold_insurance(policy(101, InsuranceTerms::whole_life(2))).unwrap();

        let report = game.advance_turn().unwrap();

        assert_eq!(report.turn, 2);
        assert_eq!(report.expired.len(), 1);
        assert_eq!(report.expired[0].id(), CardId::new(100));
        assert_eq!(game.insurance_cards().len(), 1);
        assert_eq!(game.insurance_cards()[0].id(), CardId::new(101));
        assert!(game.cards().discard_pile().iter().any(|c| c.id() == CardId::new(100)));
    }

    #[test]
    fn test_upkeep_and_lapse() {
        let mut game = Game::with_deck(endless(), deck(6)).unwrap();
        game.add_score(3);
        game.hold_insurance(policy(100, InsuranceTerms::whole_life(2).with_penalty(2))).unwrap();
        game.hold_insurance(policy(101, InsuranceTerms::whole_life(2).with_penalty(2))).unwrap();

        let report = game.advance_turn().unwrap();

        assert_eq!(report.upkeep_paid, 2);
        assert_eq!(report.lapsed.len(), 1);
        assert_eq!(game.score(), 1);
        assert_eq!(game.insurance_cards().len(), 1);
    }

    #[test]
    fn test_used_flag_resets_on_turn() {
        let mut game = Game::with_deck(endless(), deck(6)).unwrap();
        game.hold_insurance(policy(100, InsuranceTerms::whole_life(2))).unwrap();
        game.mark_insurance_used(&[CardId::new(100)]);
        assert!(game.insurance_cards()[0].is_used());

        game.advance_turn().unwrap();
        assert!(!game.insurance_cards()[0].is_used());
    }

    #[test]
    fn test_stage_advances_by_turn_and_never_regresses() {
        let config = endless().with_stage_thresholds(vec![
            StageThreshold::new(LifeStage::Adult, 2, 1000),
            StageThreshold::new(LifeStage::MiddleAge, 3, 1000),
        ]);
        let mut game = Game::with_deck(config, deck(6)).unwrap();

        let report = game.advance_turn().unwrap();
        assert_eq!(report.progress.stages_entered, vec![LifeStage::Adult]);
        game.advance_turn().unwrap();
        assert_eq!(game.stage(), LifeStage::MiddleAge);

        // No Elderly threshold configured: stays put.
        for _ in 0..5 {
            game.advance_turn().unwrap();
        }
        assert_eq!(game.stage(), LifeStage::MiddleAge);
    }

    #[test]
    fn test_stage_can_skip_by_score() {
        let mut game = Game::with_deck(endless(), deck(6)).unwrap();
        game.add_score(200);
        let report = game.update_progress();
        assert_eq!(
            report.stages_entered,
            vec![LifeStage::Adult, LifeStage::MiddleAge, LifeStage::Elderly]
        );
    }

    #[test]
    fn test_vitality_zero_is_game_over() {
        let mut game = Game::with_deck(endless().with_starting_vitality(5), deck(6)).unwrap();
        assert_eq!(game.change_vitality(-8), -5);
        assert_eq!(game.vitality(), 0);
        assert_eq!(game.status(), GameStatus::GameOver);

        let err = game.advance_turn().unwrap_err();
        assert!(matches!(err, GameError::IllegalState(_)));
    }

    #[test]
    fn test_heal_capped_at_starting_vitality() {
        let mut game = Game::with_deck(endless().with_starting_vitality(10), deck(6)).unwrap();
        game.change_vitality(-3);
        assert_eq!(game.change_vitality(5), 3);
        assert_eq!(game.vitality(), 10);
    }

    #[test]
    fn test_victory_completes_game() {
        let config = GameConfig::new().with_victory(VictoryCondition::SurviveUntilTurn(3));
        let mut game = Game::with_deck(config, deck(6)).unwrap();

        game.advance_turn().unwrap();
        assert_eq!(game.status(), GameStatus::InProgress);
        let report = game.advance_turn().unwrap();
        assert!(report.progress.completed);
        assert_eq!(game.status(), GameStatus::Completed);
        assert!(game.advance_turn().is_err());
    }

    #[test]
    fn test_publish_challenges() {
        let mut game = Game::new(endless()).unwrap();
        let choices = game.publish_challenges(3).unwrap().to_vec();
        assert_eq!(choices.len(), 3);
        assert!(choices.iter().all(|c| c.required_power().is_some()));
        assert!(choices.iter().all(|c| !game.in_card_pool(c.id())));
        assert!(choices.iter().all(|c| game.knows_card(c.id())));
        assert_eq!(game.published_challenge(choices[1].id()), Some(&choices[1]));

        assert!(game.publish_challenges(0).is_err());
        assert!(game.publish_challenges(MAX_CHALLENGE_CHOICES + 1).is_err());

        let id = choices[0].id();
        assert!(game.take_challenge_choice(id).is_some());
        assert!(game.take_challenge_choice(id).is_none());
    }

    #[test]
    fn test_knows_published_reward_ids() {
        let mut game = Game::with_deck(endless(), deck(4)).unwrap();
        let reward = policy(41, InsuranceTerms::whole_life(1));
        game.challenge_choices = vec![crate::cards::create_challenge_card(
            CardId::new(40),
            "Promotion",
            3,
            ChallengeReward::Insurance(Box::new(reward)),
        )];

        assert!(game.knows_card(CardId::new(40)));
        assert!(game.knows_card(CardId::new(41)));
        assert!(!game.in_card_pool(CardId::new(41)));
        assert!(!game.knows_card(CardId::new(42)));
    }

    #[test]
    fn test_spend_score() {
        let mut game = Game::with_deck(endless(), deck(6)).unwrap();
        game.add_score(5);
        assert!(game.spend_score(6).is_err());
        assert_eq!(game.score(), 5);
        game.spend_score(5).unwrap();
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = Game::new(GameConfig::new().with_seed(9)).unwrap();
        let b = Game::new(GameConfig::new().with_seed(9)).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
