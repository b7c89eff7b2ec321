//! Built-in action handlers.
//!
//! Each handler validates its payload against the game first, then applies
//! it. `validate` must not mutate anything; `apply` may assume `validate`
//! passed, and the processor restores the game if `apply` still fails.

use tracing::debug;

use super::result::{ActionData, ActionPayload, Applied, ChallengeOutcome, EffectKind, EffectReport};
use crate::cards::{Card, CardType, ChallengeReward, EffectTag};
use crate::core::{CardId, GameError, Result};
use crate::game::{Game, GameStatus, ProgressReport, TurnReport, MAX_CHALLENGE_CHOICES};
use crate::zones::{CardManager, DrawOutcome, MAX_DRAW};

pub const PUBLISH_CHALLENGES: &str = "publish_challenges";
pub const DRAW_CARDS: &str = "draw_cards";
pub const CHALLENGE: &str = "challenge";
pub const BUY_INSURANCE: &str = "buy_insurance";
pub const DISCARD_CARDS: &str = "discard_cards";
pub const END_TURN: &str = "end_turn";

/// A named action the processor can dispatch to.
pub trait ActionHandler {
    /// Name callers use to select this action.
    fn name(&self) -> &'static str;

    /// Check the payload against the current game without changing it.
    fn validate(&self, payload: &ActionPayload, game: &Game) -> Result<()>;

    /// Perform the action.
    fn apply(&self, payload: ActionPayload, game: &mut Game) -> Result<Applied>;
}

fn malformed(action: &str, expected: &str, payload: &ActionPayload) -> GameError {
    GameError::validation(format!(
        "{} expects a {} payload (got {})",
        action,
        expected,
        payload.shape()
    ))
}

/// Sum of an effect's values over held insurance.
fn held_effect_total(game: &Game, tag: &EffectTag) -> i64 {
    game.insurance_cards()
        .iter()
        .flat_map(|card| card.effects_with(tag))
        .map(|effect| i64::from(effect.value_or(0)))
        .sum()
}

fn draw_reports(outcome: &DrawOutcome) -> Vec<EffectReport> {
    let drawn = outcome.drawn_cards.len();
    let mut effects = vec![EffectReport::new(EffectKind::CardDraw, format!("{} cards drawn", drawn))
        .with_cards(outcome.drawn_cards.clone())
        .with_value(drawn as i64)];

    if !outcome.trouble_cards.is_empty() {
        effects.push(
            EffectReport::new(
                EffectKind::TroubleDrawn,
                format!("{} trouble cards drawn", outcome.trouble_cards.len()),
            )
            .with_cards(outcome.trouble_cards.clone()),
        );
    }
    if !outcome.discarded_cards.is_empty() {
        effects.push(
            EffectReport::new(
                EffectKind::CardsDiscarded,
                format!("{} cards discarded over the hand limit", outcome.discarded_cards.len()),
            )
            .with_cards(outcome.discarded_cards.clone()),
        );
    }
    effects
}

fn progress_reports(progress: &ProgressReport, game: &Game) -> Vec<EffectReport> {
    let mut effects: Vec<EffectReport> = progress
        .stages_entered
        .iter()
        .map(|stage| {
            EffectReport::new(EffectKind::StageAdvanced, format!("entered {}", stage))
                .with_value(stage.index() as i64)
        })
        .collect();
    if progress.completed {
        effects.push(
            EffectReport::new(EffectKind::GameCompleted, "life goals reached")
                .with_value(i64::from(game.score())),
        );
    }
    effects
}

fn vitality_reports(applied: i64, game: &Game) -> Vec<EffectReport> {
    let mut effects = Vec::new();
    if applied != 0 {
        effects.push(
            EffectReport::new(EffectKind::VitalityChange, format!("vitality {:+}", applied))
                .with_value(applied),
        );
    }
    if game.status() == GameStatus::GameOver {
        effects.push(EffectReport::new(EffectKind::GameOver, "vitality exhausted"));
    }
    effects
}

// === publish_challenges ===

/// Replace the published challenge set with `n` freshly rolled challenges
/// (`ActionPayload::Count`).
#[derive(Clone, Copy, Debug, Default)]
pub struct PublishChallengesHandler;

impl ActionHandler for PublishChallengesHandler {
    fn name(&self) -> &'static str {
        PUBLISH_CHALLENGES
    }

    fn validate(&self, payload: &ActionPayload, _game: &Game) -> Result<()> {
        match payload {
            ActionPayload::Count(count) if (1..=MAX_CHALLENGE_CHOICES).contains(count) => Ok(()),
            ActionPayload::Count(count) => Err(GameError::validation(format!(
                "challenge count must be between 1 and {} (got {})",
                MAX_CHALLENGE_CHOICES, count
            ))),
            other => Err(malformed(PUBLISH_CHALLENGES, "count", other)),
        }
    }

    fn apply(&self, payload: ActionPayload, game: &mut Game) -> Result<Applied> {
        let ActionPayload::Count(count) = payload else {
            return Err(malformed(PUBLISH_CHALLENGES, "count", &payload));
        };
        let choices = game.publish_challenges(count)?.to_vec();
        let effects = vec![EffectReport::new(
            EffectKind::ChallengesPublished,
            format!("{} challenges published", choices.len()),
        )
        .with_cards(choices.clone())];
        Ok(Applied::new(ActionData::Challenges(choices), effects))
    }
}

// === draw_cards ===

/// Draw `n` cards into the hand (`ActionPayload::Count`).
#[derive(Clone, Copy, Debug, Default)]
pub struct DrawCardsHandler;

impl ActionHandler for DrawCardsHandler {
    fn name(&self) -> &'static str {
        DRAW_CARDS
    }

    fn validate(&self, payload: &ActionPayload, _game: &Game) -> Result<()> {
        match payload {
            ActionPayload::Count(count) => CardManager::validate_draw_count(*count),
            other => Err(malformed(DRAW_CARDS, "count", other)),
        }
    }

    fn apply(&self, payload: ActionPayload, game: &mut Game) -> Result<Applied> {
        let ActionPayload::Count(count) = payload else {
            return Err(malformed(DRAW_CARDS, "count", &payload));
        };
        let outcome = game.cards_mut().draw_cards(count)?;
        let effects = draw_reports(&outcome);
        Ok(Applied::new(ActionData::Drawn(outcome.drawn_cards), effects))
    }
}

// === challenge ===

/// Play hand cards against a challenge.
///
/// Total power is the sum of the played cards' effective power at the
/// current stage. Meeting the requirement exactly is a success.
///
/// On failure the shortfall becomes a vitality penalty, reduced by the
/// coverage of unused `Shield` policies. Policies are consumed in holding
/// order until the shortfall is covered, and stay used until the next turn. On success the reward is granted and held
/// `Heal` effects restore vitality. Played cards go to the discard pile
/// either way.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChallengeHandler;

impl ChallengeHandler {
    fn required_power(challenge: &Card) -> Result<i32> {
        challenge.required_power().ok_or_else(|| {
            GameError::validation(format!("{} is not a challenge card", challenge.id()))
        })
    }

    /// Unused shield policies with coverage, in holding order.
    fn shields(game: &Game) -> Vec<(CardId, u32)> {
        game.insurance_cards()
            .iter()
            .filter(|card| !card.is_used() && card.has_effect(&EffectTag::Shield))
            .filter_map(|card| card.insurance_terms().map(|t| (card.id(), t.coverage)))
            .filter(|(_, coverage)| *coverage > 0)
            .collect()
    }

    /// A caller-built challenge and its reward need ids the game has not seen.
    fn validate_unpublished(challenge: &Card, played: &[CardId], game: &Game) -> Result<()> {
        if game.knows_card(challenge.id()) {
            return Err(GameError::validation(format!(
                "{} is already part of the card pool",
                challenge.id()
            )));
        }
        if let Some(ChallengeReward::Insurance(reward)) = challenge.challenge_reward() {
            if reward.id() == challenge.id()
                || game.knows_card(reward.id())
                || played.contains(&reward.id())
            {
                return Err(GameError::validation(format!(
                    "reward {} is already part of the card pool",
                    reward.id()
                )));
            }
        }
        Ok(())
    }
}

impl ActionHandler for ChallengeHandler {
    fn name(&self) -> &'static str {
        CHALLENGE
    }

    fn validate(&self, payload: &ActionPayload, game: &Game) -> Result<()> {
        let ActionPayload::Challenge { challenge, played } = payload else {
            return Err(malformed(CHALLENGE, "challenge", payload));
        };
        Self::required_power(challenge)?;
        match game.published_challenge(challenge.id()) {
            Some(published) if published == challenge => {}
            Some(_) => {
                return Err(GameError::validation(format!(
                    "{} does not match the published challenge",
                    challenge.id()
                )))
            }
            None => Self::validate_unpublished(challenge, played, game)?,
        }
        game.cards().check_in_hand(played)
    }

    fn apply(&self, payload: ActionPayload, game: &mut Game) -> Result<Applied> {
        let ActionPayload::Challenge { challenge, played } = payload else {
            return Err(malformed(CHALLENGE, "challenge", &payload));
        };
        let required_power = i64::from(Self::required_power(&challenge)?);
        let stage = game.stage();

        let played_cards = game.cards_mut().take_from_hand(&played)?;
        let total_power: i64 = played_cards
            .iter()
            .map(|c| i64::from(c.effective_power(stage)))
            .sum();
        game.take_challenge_choice(challenge.id());

        let success = total_power >= required_power;
        let mut outcome = ChallengeOutcome {
            success,
            required_power,
            total_power,
            vitality_change: 0,
            coverage_applied: 0,
            reward: None,
        };
        let mut effects = Vec::new();

        if success {
            match challenge.challenge_reward() {
                Some(ChallengeReward::Score(points)) => {
                    game.add_score(*points);
                    effects.push(
                        EffectReport::new(EffectKind::ScoreChange, format!("score +{}", points))
                            .with_value(i64::from(*points)),
                    );
                }
                Some(ChallengeReward::Insurance(card)) => {
                    game.discard_card((**card).clone())?;
                    effects.push(
                        EffectReport::new(
                            EffectKind::InsuranceGranted,
                            format!("{} joins the card pool", card.name()),
                        )
                        .with_cards(vec![(**card).clone()]),
                    );
                }
                None => {}
            }
            outcome.reward = challenge.challenge_reward().cloned();

            let heal = held_effect_total(game, &EffectTag::Heal);
            if heal > 0 {
                outcome.vitality_change = game.change_vitality(heal);
                effects.extend(vitality_reports(outcome.vitality_change, game));
            }
        } else {
            let shortfall = u32::try_from(required_power - total_power).unwrap_or(u32::MAX);
            let mut coverage = 0u32;
            let mut consumed = Vec::new();
            for (id, cover) in Self::shields(game) {
                if coverage >= shortfall {
                    break;
                }
                coverage = coverage.saturating_add(cover);
                consumed.push(id);
            }
            outcome.coverage_applied = coverage.min(shortfall);
            if !consumed.is_empty() {
                game.mark_insurance_used(&consumed);
            }

            let penalty = shortfall - outcome.coverage_applied;
            outcome.vitality_change = game.change_vitality(-i64::from(penalty));
            effects.extend(vitality_reports(outcome.vitality_change, game));
        }

        for card in played_cards {
            game.cards_mut().add_to_discard(card)?;
        }

        let progress = game.update_progress();
        effects.extend(progress_reports(&progress, game));

        debug!(
            challenge = %challenge.id(),
            required_power,
            total_power,
            success,
            vitality_change = outcome.vitality_change,
            "challenge resolved"
        );
        Ok(Applied::new(ActionData::Challenge(outcome), effects))
    }
}

// === buy_insurance ===

/// Acquire an insurance card, paying its cost from score.
///
/// The card may come from the hand or be brand new (e.g. offered by a
/// shop). Held policies count against `max_insurance_count`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuyInsuranceHandler;

impl ActionHandler for BuyInsuranceHandler {
    fn name(&self) -> &'static str {
        BUY_INSURANCE
    }

    fn validate(&self, payload: &ActionPayload, game: &Game) -> Result<()> {
        let ActionPayload::Insurance(card) = payload else {
            return Err(malformed(BUY_INSURANCE, "insurance", payload));
        };
        if card.card_type() != CardType::Insurance {
            return Err(GameError::validation(format!(
                "{} is not an insurance card",
                card.id()
            )));
        }

        let max = game.config().max_insurance_count;
        if game.insurance_cards().len() >= max {
            return Err(GameError::validation(format!(
                "insurance limit of {} policies reached",
                max
            )));
        }

        let cost = card.cost().value();
        if game.score() < cost {
            return Err(GameError::validation(format!(
                "score {} cannot cover cost {}",
                game.score(),
                cost
            )));
        }

        if !game.cards().hand_contains(card.id()) && game.knows_card(card.id()) {
            return Err(GameError::validation(format!(
                "{} is already held or in another pile",
                card.id()
            )));
        }
        Ok(())
    }

    fn apply(&self, payload: ActionPayload, game: &mut Game) -> Result<Applied> {
        let ActionPayload::Insurance(card) = payload else {
            return Err(malformed(BUY_INSURANCE, "insurance", &payload));
        };

        let card = if game.cards().hand_contains(card.id()) {
            game.cards_mut()
                .take_from_hand(&[card.id()])?
                .pop()
                .ok_or_else(|| GameError::not_found(format!("{} is not in hand", card.id())))?
        } else {
            card
        };

        let cost = card.cost().value();
        game.spend_score(cost)?;
        let card = card.with_used(false);
        game.hold_insurance(card.clone())?;

        let mut effects = Vec::new();
        if cost > 0 {
            effects.push(
                EffectReport::new(EffectKind::ScoreChange, format!("score -{}", cost))
                    .with_value(-i64::from(cost)),
            );
        }
        effects.push(
            EffectReport::new(EffectKind::InsuranceAcquired, format!("{} acquired", card.name()))
                .with_cards(vec![card.clone()]),
        );
        Ok(Applied::new(ActionData::Insurance(card), effects))
    }
}

// === discard_cards ===

/// Move chosen hand cards to the discard pile.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardCardsHandler;

impl ActionHandler for DiscardCardsHandler {
    fn name(&self) -> &'static str {
        DISCARD_CARDS
    }

    fn validate(&self, payload: &ActionPayload, game: &Game) -> Result<()> {
        match payload {
            ActionPayload::Cards(ids) if ids.is_empty() => {
                Err(GameError::validation("no cards to discard"))
            }
            ActionPayload::Cards(ids) => game.cards().check_in_hand(ids),
            other => Err(malformed(DISCARD_CARDS, "cards", other)),
        }
    }

    fn apply(&self, payload: ActionPayload, game: &mut Game) -> Result<Applied> {
        let ActionPayload::Cards(ids) = payload else {
            return Err(malformed(DISCARD_CARDS, "cards", &payload));
        };
        let discarded = game.cards_mut().discard(&ids)?;
        let effects = vec![EffectReport::new(
            EffectKind::CardsDiscarded,
            format!("{} cards discarded", discarded.len()),
        )
        .with_cards(discarded.clone())];
        Ok(Applied::new(ActionData::Discarded(discarded), effects))
    }
}

// === end_turn ===

/// Advance to the next turn, then draw for held `Draw` effects.
#[derive(Clone, Copy, Debug, Default)]
pub struct EndTurnHandler;

impl EndTurnHandler {
    fn turn_reports(report: &TurnReport, game: &Game) -> Vec<EffectReport> {
        let mut effects = vec![EffectReport::new(
            EffectKind::TurnAdvanced,
            format!("turn {}", report.turn),
        )
        .with_value(i64::from(report.turn))];

        if report.upkeep_paid > 0 {
            effects.push(
                EffectReport::new(EffectKind::ScoreChange, format!("upkeep -{}", report.upkeep_paid))
                    .with_value(-i64::from(report.upkeep_paid)),
            );
        }
        if !report.expired.is_empty() {
            effects.push(
                EffectReport::new(
                    EffectKind::InsuranceExpired,
                    format!("{} policies expired", report.expired.len()),
                )
                .with_cards(report.expired.clone()),
            );
        }
        if !report.lapsed.is_empty() {
            effects.push(
                EffectReport::new(
                    EffectKind::InsuranceLapsed,
                    format!("{} policies lapsed", report.lapsed.len()),
                )
                .with_cards(report.lapsed.clone()),
            );
        }
        effects.extend(progress_reports(&report.progress, game));
        effects
    }
}

impl ActionHandler for EndTurnHandler {
    fn name(&self) -> &'static str {
        END_TURN
    }

    fn validate(&self, payload: &ActionPayload, _game: &Game) -> Result<()> {
        match payload {
            ActionPayload::Empty => Ok(()),
            other => Err(malformed(END_TURN, "empty", other)),
        }
    }

    fn apply(&self, _payload: ActionPayload, game: &mut Game) -> Result<Applied> {
        let report = game.advance_turn()?;
        let mut effects = Self::turn_reports(&report, game);

        if !game.is_terminal() {
            let extra = held_effect_total(game, &EffectTag::Draw);
            if extra > 0 {
                let count = usize::try_from(extra).unwrap_or(MAX_DRAW).min(MAX_DRAW);
                let outcome = game.cards_mut().draw_cards(count)?;
                effects.extend(draw_reports(&outcome));
            }
        }

        Ok(Applied::new(ActionData::Turn(report), effects))
    }
}

/// Every built-in handler.
#[must_use]
pub fn builtin_handlers() -> Vec<Box<dyn ActionHandler>> {
    vec![
        Box::new(PublishChallengesHandler),
        Box::new(DrawCardsHandler),
        Box::new(ChallengeHandler),
        Box::new(BuyInsuranceHandler),
        Box::new(DiscardCardsHandler),
        Box::new(EndTurnHandler),
    ]
}
