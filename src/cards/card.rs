//! The card entity.
//!
//! A `Card` is an immutable value. Changing anything about a card (ticking
//! an insurance term down, marking it used) means deriving a new card with
//! [`Card::copy`]; the original is never touched.
//!
//! ## Kinds
//!
//! - `Life`: everyday cards played into challenges
//! - `Challenge`: `power` is the power required to succeed; carries a reward
//! - `Insurance`: coverage, upkeep penalty, term or whole-life duration
//! - `Other`: any other category (dream cards use `"dream"`)

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::effect::{Effect, EffectTag};
use crate::core::{CardId, LifeStage};

/// Effects storage. Most cards carry at most two effects.
pub type Effects = SmallVec<[Effect; 2]>;

/// Signed card power. Negative power marks a trouble card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Power(i32);

impl Power {
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl std::fmt::Display for Power {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Non-negative acquisition cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cost(u32);

impl Cost {
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Card category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Life,
    Challenge,
    Insurance,
    Other,
}

/// How long an insurance policy lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Duration {
    /// Expires after `remaining_turns` further turns.
    Term { remaining_turns: u32 },
    /// Never expires.
    WholeLife,
}

/// Insurance-only fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InsuranceTerms {
    /// Subtracted from challenge-failure penalties (with a `Shield` effect).
    pub coverage: u32,
    /// Upkeep charged against score every turn.
    pub penalty: u32,
    pub duration: Duration,
    /// Added to effective power once the holder is past youth.
    pub age_bonus: i32,
}

impl InsuranceTerms {
    /// Term policy lasting `turns` turns.
    #[must_use]
    pub fn term(coverage: u32, turns: u32) -> Self {
        Self {
            coverage,
            penalty: 0,
            duration: Duration::Term {
                remaining_turns: turns,
            },
            age_bonus: 0,
        }
    }

    /// Whole-life policy.
    #[must_use]
    pub fn whole_life(coverage: u32) -> Self {
        Self {
            coverage,
            penalty: 0,
            duration: Duration::WholeLife,
            age_bonus: 0,
        }
    }

    #[must_use]
    pub fn with_penalty(mut self, penalty: u32) -> Self {
        self.penalty = penalty;
        self
    }

    #[must_use]
    pub fn with_age_bonus(mut self, bonus: i32) -> Self {
        self.age_bonus = bonus;
        self
    }

    /// Remaining turns for term policies.
    #[must_use]
    pub fn remaining_turns(&self) -> Option<u32> {
        match self.duration {
            Duration::Term { remaining_turns } => Some(remaining_turns),
            Duration::WholeLife => None,
        }
    }

    #[must_use]
    pub fn is_term(&self) -> bool {
        matches!(self.duration, Duration::Term { .. })
    }

    /// Terms after one turn has passed. Whole-life terms are unchanged.
    #[must_use]
    pub fn ticked(self) -> Self {
        match self.duration {
            Duration::Term { remaining_turns } => Self {
                duration: Duration::Term {
                    remaining_turns: remaining_turns.saturating_sub(1),
                },
                ..self
            },
            Duration::WholeLife => self,
        }
    }
}

/// What winning a challenge grants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeReward {
    /// Add to score.
    Score(u32),
    /// An insurance card that joins the player's card pool.
    Insurance(Box<Card>),
}

/// Kind-specific card data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Life,
    Challenge { reward: ChallengeReward },
    Insurance(InsuranceTerms),
    Other { category: String },
}

impl CardKind {
    #[must_use]
    pub fn card_type(&self) -> CardType {
        match self {
            CardKind::Life => CardType::Life,
            CardKind::Challenge { .. } => CardType::Challenge,
            CardKind::Insurance(_) => CardType::Insurance,
            CardKind::Other { .. } => CardType::Other,
        }
    }
}

/// Fields to replace when deriving a card with [`Card::copy`].
///
/// `id` is deliberately absent: a copy keeps its source's identity.
#[derive(Clone, Debug, Default)]
pub struct CardOverrides {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<CardKind>,
    pub power: Option<i32>,
    pub cost: Option<u32>,
    pub effects: Option<Vec<Effect>>,
    pub used: Option<bool>,
}

/// A playable card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    name: String,
    description: String,
    kind: CardKind,
    power: Power,
    cost: Cost,
    effects: Effects,
    #[serde(default)]
    used: bool,
}

impl Card {
    /// Create a card from its full field set.
    #[must_use]
    pub fn new(
        id: CardId,
        name: impl Into<String>,
        description: impl Into<String>,
        kind: CardKind,
        power: i32,
        cost: u32,
        effects: impl IntoIterator<Item = Effect>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            kind,
            power: Power::new(power),
            cost: Cost::new(cost),
            effects: effects.into_iter().collect(),
            used: false,
        }
    }

    /// Derive a card with some fields replaced.
    #[must_use]
    pub fn copy(&self, overrides: CardOverrides) -> Card {
        Card {
            id: self.id,
            name: overrides.name.unwrap_or_else(|| self.name.clone()),
            description: overrides
                .description
                .unwrap_or_else(|| self.description.clone()),
            kind: overrides.kind.unwrap_or_else(|| self.kind.clone()),
            power: overrides.power.map_or(self.power, Power::new),
            cost: overrides.cost.map_or(self.cost, Cost::new),
            effects: overrides
                .effects
                .map_or_else(|| self.effects.clone(), |e| e.into_iter().collect()),
            used: overrides.used.unwrap_or(self.used),
        }
    }

    /// Derive a copy with the `used` flag set.
    #[must_use]
    pub fn with_used(&self, used: bool) -> Card {
        self.copy(CardOverrides {
            used: Some(used),
            ..CardOverrides::default()
        })
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn kind(&self) -> &CardKind {
        &self.kind
    }

    #[must_use]
    pub fn card_type(&self) -> CardType {
        self.kind.card_type()
    }

    #[must_use]
    pub fn power(&self) -> Power {
        self.power
    }

    #[must_use]
    pub fn cost(&self) -> Cost {
        self.cost
    }

    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    #[must_use]
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Negative-power cards are trouble.
    #[must_use]
    pub fn is_trouble(&self) -> bool {
        self.power.is_negative()
    }

    #[must_use]
    pub fn insurance_terms(&self) -> Option<&InsuranceTerms> {
        match &self.kind {
            CardKind::Insurance(terms) => Some(terms),
            _ => None,
        }
    }

    #[must_use]
    pub fn challenge_reward(&self) -> Option<&ChallengeReward> {
        match &self.kind {
            CardKind::Challenge { reward } => Some(reward),
            _ => None,
        }
    }

    /// Power required to beat this card, if it is a challenge.
    #[must_use]
    pub fn required_power(&self) -> Option<i32> {
        self.challenge_reward().map(|_| self.power.value())
    }

    #[must_use]
    pub fn has_effect(&self, tag: &EffectTag) -> bool {
        self.effects.iter().any(|e| &e.tag == tag)
    }

    /// Iterate over effects carrying `tag`.
    pub fn effects_with<'a>(&'a self, tag: &'a EffectTag) -> impl Iterator<Item = &'a Effect> + 'a {
        self.effects.iter().filter(move |e| &e.tag == tag)
    }

    /// Power this card contributes when played at `stage`.
    ///
    /// Insurance cards add their age bonus once the holder is past youth.
    #[must_use]
    pub fn effective_power(&self, stage: LifeStage) -> i32 {
        match &self.kind {
            CardKind::Insurance(terms) if stage > LifeStage::Youth => {
                self.power.value().saturating_add(terms.age_bonus)
            }
            _ => self.power.value(),
        }
    }
}
