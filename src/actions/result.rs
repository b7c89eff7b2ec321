//! Action payloads and results.
//!
//! Every call to the processor returns an `ActionResult`: a success flag,
//! optional structured data, an error string on failure, and the list of
//! side effects the caller should render.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, ChallengeReward};
use crate::core::{CardId, GameError};
use crate::game::TurnReport;

/// Input to an action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPayload {
    #[default]
    Empty,
    /// A count (`draw_cards`, `publish_challenges`).
    Count(usize),
    /// Hand cards (`discard_cards`).
    Cards(Vec<CardId>),
    /// A challenge and the hand cards played against it.
    Challenge { challenge: Card, played: Vec<CardId> },
    /// An insurance card to buy (`buy_insurance`).
    Insurance(Card),
}

impl ActionPayload {
    /// Short name of the payload shape, for error messages.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            ActionPayload::Empty => "empty",
            ActionPayload::Count(_) => "count",
            ActionPayload::Cards(_) => "cards",
            ActionPayload::Challenge { .. } => "challenge",
            ActionPayload::Insurance(_) => "insurance",
        }
    }
}

impl From<usize> for ActionPayload {
    fn from(count: usize) -> Self {
        ActionPayload::Count(count)
    }
}

impl From<Vec<CardId>> for ActionPayload {
    fn from(ids: Vec<CardId>) -> Self {
        ActionPayload::Cards(ids)
    }
}

impl From<()> for ActionPayload {
    fn from(_: ()) -> Self {
        ActionPayload::Empty
    }
}

/// Kind of side effect reported to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    ChallengesPublished,
    CardDraw,
    TroubleDrawn,
    CardsDiscarded,
    VitalityChange,
    ScoreChange,
    InsuranceGranted,
    InsuranceAcquired,
    InsuranceExpired,
    InsuranceLapsed,
    TurnAdvanced,
    StageAdvanced,
    GameOver,
    GameCompleted,
}

/// One reported side effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectReport {
    pub kind: EffectKind,
    pub description: String,
    /// Cards involved, if any.
    pub cards: Vec<Card>,
    /// Signed amount, if any (vitality delta, score delta, turn number).
    pub value: Option<i64>,
}

impl EffectReport {
    pub fn new(kind: EffectKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            cards: Vec::new(),
            value: None,
        }
    }

    #[must_use]
    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = cards;
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }
}

/// Result of resolving a challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeOutcome {
    pub success: bool,
    pub required_power: i64,
    /// Sum of the played cards' effective power.
    pub total_power: i64,
    /// Signed vitality change (negative on failure, heals on success).
    pub vitality_change: i64,
    /// Coverage that absorbed part of a failure penalty.
    pub coverage_applied: u32,
    /// Granted reward on success.
    pub reward: Option<ChallengeReward>,
}

/// Structured data returned by a successful action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionData {
    Challenges(Vec<Card>),
    Drawn(Vec<Card>),
    Discarded(Vec<Card>),
    Challenge(ChallengeOutcome),
    Insurance(Card),
    Turn(TurnReport),
}

/// What an action handler produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    pub data: ActionData,
    pub effects: Vec<EffectReport>,
}

impl Applied {
    #[must_use]
    pub fn new(data: ActionData, effects: Vec<EffectReport>) -> Self {
        Self { data, effects }
    }
}

/// The result handed back to the caller of `ActionProcessor::execute`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub data: Option<ActionData>,
    pub error: Option<String>,
    pub effects: Vec<EffectReport>,
}

impl ActionResult {
    #[must_use]
    pub fn ok(applied: Applied) -> Self {
        Self {
            success: true,
            data: Some(applied.data),
            error: None,
            effects: applied.effects,
        }
    }

    #[must_use]
    pub fn failure(error: &GameError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            effects: Vec::new(),
        }
    }

    /// Reports of one kind.
    pub fn effects_of(&self, kind: EffectKind) -> impl Iterator<Item = &EffectReport> {
        self.effects.iter().filter(move |e| e.kind == kind)
    }
}

/// A record of one executed action, handed to observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action: String,
    /// Turn the action was executed on.
    pub turn: u32,
    pub success: bool,
    pub error: Option<String>,
    pub effects: Vec<EffectKind>,
}

impl ActionRecord {
    #[must_use]
    pub fn new(action: impl Into<String>, turn: u32, result: &ActionResult) -> Self {
        Self {
            action: action.into(),
            turn,
            success: result.success,
            error: result.error.clone(),
            effects: result.effects.iter().map(|e| e.kind).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_conversions() {
        assert_eq!(ActionPayload::from(3), ActionPayload::Count(3));
        assert_eq!(
            ActionPayload::from(vec![CardId::new(1)]),
            ActionPayload::Cards(vec![CardId::new(1)])
        );
        assert_eq!(ActionPayload::from(()), ActionPayload::Empty);
        assert_eq!(ActionPayload::Count(1).shape(), "count");
    }

    #[test]
    fn test_failure_result() {
        let result = ActionResult::failure(&GameError::UnknownAction("jump".into()));
        assert!(!result.success);
        assert!(result.data.is_none());
        assert!(result.effects.is_empty());
        assert_eq!(result.error.as_deref(), Some("unknown action type: jump"));
    }

    #[test]
    fn test_effects_of() {
        let result = ActionResult::ok(Applied::new(
            ActionData::Drawn(vec![]),
            vec![
                EffectReport::new(EffectKind::CardDraw, "0 cards drawn"),
                EffectReport::new(EffectKind::ScoreChange, "score").with_value(3),
            ],
        ));
        assert_eq!(result.effects_of(EffectKind::CardDraw).count(), 1);
        assert_eq!(
            result.effects_of(EffectKind::ScoreChange).next().unwrap().value,
            Some(3)
        );
    }

    #[test]
    fn test_record_from_result() {
        let result = ActionResult::failure(&GameError::validation("nope"));
        let record = ActionRecord::new("draw_cards", 4, &result);
        assert_eq!(record.turn, 4);
        assert!(!record.success);
        assert!(record.error.unwrap().contains("nope"));
    }
}
