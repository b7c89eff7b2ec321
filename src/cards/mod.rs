//! Card system: the card entity, effects, and factories.
//!
//! ## Key Types
//!
//! - `Card`: immutable card value (life, challenge, insurance, other)
//! - `Power` / `Cost`: value objects with `value()` accessors
//! - `Effect` / `EffectTag`: ordered effect descriptors
//! - `ChallengeReward`: mandatory reward carried by every challenge
//! - `InsuranceTerms`: coverage, upkeep penalty, duration, age bonus

pub mod card;
pub mod effect;
pub mod factory;

pub use card::{
    Card, CardKind, CardOverrides, CardType, ChallengeReward, Cost, Duration, Effects,
    InsuranceTerms, Power,
};
pub use effect::{Effect, EffectTag};
pub use factory::{
    create_challenge_card, create_dream_card, create_insurance_card, create_life_card,
    roll_challenge_card, roll_life_card, DREAM_CATEGORY,
};
