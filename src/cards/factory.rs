//! Card factories.
//!
//! The named constructors the rest of the engine (and callers building
//! custom decks) use, plus the seeded rolls a game uses to fill its draw
//! pile and publish challenges. Ids are always supplied by the caller.

use super::card::{Card, CardKind, ChallengeReward, InsuranceTerms};
use super::effect::{Effect, EffectTag};
use crate::core::{CardId, Difficulty, GameError, GameRng, LifeStage, Result};

/// Category name of dream cards.
pub const DREAM_CATEGORY: &str = "dream";

/// Create a life card. The description states the signed power.
///
/// ```
/// use life_cards::cards::create_life_card;
/// use life_cards::core::CardId;
///
/// let card = create_life_card(CardId::new(1), "Friendship", 1);
/// assert!(card.description().contains("+1"));
/// ```
#[must_use]
pub fn create_life_card(id: CardId, name: impl Into<String>, power: i32) -> Card {
    let power_text = super::card::Power::new(power).to_string();
    Card::new(
        id,
        name,
        format!("Power {}", power_text),
        CardKind::Life,
        power,
        0,
        std::iter::empty(),
    )
}

/// Create a challenge card. `power` holds the required power.
#[must_use]
pub fn create_challenge_card(
    id: CardId,
    name: impl Into<String>,
    required_power: i32,
    reward: ChallengeReward,
) -> Card {
    Card::new(
        id,
        name,
        format!("Requires power {}", required_power),
        CardKind::Challenge { reward },
        required_power,
        0,
        std::iter::empty(),
    )
}

/// Create an insurance card. At least one effect is required.
pub fn create_insurance_card(
    id: CardId,
    name: impl Into<String>,
    power: i32,
    terms: InsuranceTerms,
    effects: impl IntoIterator<Item = Effect>,
) -> Result<Card> {
    let effects: Vec<Effect> = effects.into_iter().collect();
    if effects.is_empty() {
        return Err(GameError::validation(
            "insurance cards need at least one effect",
        ));
    }

    let description = match terms.duration {
        super::card::Duration::Term { remaining_turns } => {
            format!("Term cover {} for {} turns", terms.coverage, remaining_turns)
        }
        super::card::Duration::WholeLife => format!("Whole-life cover {}", terms.coverage),
    };

    // Buying a policy costs its coverage.
    let cost = terms.coverage;
    Ok(Card::new(
        id,
        name,
        description,
        CardKind::Insurance(terms),
        power,
        cost,
        effects,
    ))
}

/// Create a dream card themed to `stage`.
#[must_use]
pub fn create_dream_card(id: CardId, stage: LifeStage) -> Card {
    let (name, power) = match stage {
        LifeStage::Youth => ("Travel the world", 2),
        LifeStage::Adult => ("Start a family", 3),
        LifeStage::MiddleAge => ("Open a shop", 4),
        LifeStage::Elderly => ("Write a memoir", 5),
    };
    Card::new(
        id,
        name,
        format!("Dream of {}: power {}", stage, power),
        CardKind::Other {
            category: DREAM_CATEGORY.to_string(),
        },
        power,
        0,
        [Effect::new(EffectTag::Other(DREAM_CATEGORY.to_string()))
            .with_description(stage.label())],
    )
}

/// Roll a life card for the starter deck.
pub fn roll_life_card(id: CardId, difficulty: Difficulty, rng: &mut GameRng) -> Card {
    if rng.chance(difficulty.trouble_ratio()) {
        let power = if rng.chance(0.5) { -1 } else { -2 };
        let name = if power == -1 { "Bad luck" } else { "Illness" };
        return create_life_card(id, name, power);
    }

    const NAMES: [&str; 4] = ["Rest day", "Part-time job", "Friendship", "Promotion"];
    let power = rng.roll(0..4);
    create_life_card(id, NAMES[power as usize], power)
}

/// Roll a challenge for `stage`. `reward_id` is used if the reward is a card.
pub fn roll_challenge_card(
    id: CardId,
    reward_id: CardId,
    stage: LifeStage,
    difficulty: Difficulty,
    rng: &mut GameRng,
) -> Card {
    let names: [&str; 2] = match stage {
        LifeStage::Youth => ["Entrance exam", "First job hunt"],
        LifeStage::Adult => ["Wedding", "Buying a home"],
        LifeStage::MiddleAge => ["Career change", "Tuition bills"],
        LifeStage::Elderly => ["Retirement", "Health scare"],
    };
    let name = names[rng.pick_index(names.len()).unwrap_or(0)];

    let base = 3 + 2 * stage.index() as i32;
    let spread = [-1, 0, 1, 2];
    let pick = rng.weighted_index(&[1, 3, 2, 1]).unwrap_or(1);
    let required = (base + spread[pick] + difficulty.challenge_offset()).max(1);

    let reward = if rng.chance(0.3) {
        ChallengeReward::Insurance(Box::new(roll_insurance_reward(reward_id, stage, rng)))
    } else {
        ChallengeReward::Score(required as u32 * 3)
    };

    create_challenge_card(id, name, required, reward)
}

fn roll_insurance_reward(id: CardId, stage: LifeStage, rng: &mut GameRng) -> Card {
    let coverage = 2 + stage.index() as u32;
    let whole_life = stage >= LifeStage::MiddleAge && rng.chance(0.5);

    let (name, terms) = if whole_life {
        (
            "Whole-life policy",
            InsuranceTerms::whole_life(coverage).with_penalty(1).with_age_bonus(1),
        )
    } else {
        ("Term policy", InsuranceTerms::term(coverage, 3).with_age_bonus(1))
    };

    Card::new(
        id,
        name,
        format!("Cover {}", coverage),
        CardKind::Insurance(terms),
        1,
        coverage,
        [Effect::shield().with_value(coverage as i32)],
    )
}
