//! Action processing.
//!
//! The presentation layer drives a game exclusively through named actions:
//!
//! | Action               | Payload                                 |
//! |----------------------|-----------------------------------------|
//! | `publish_challenges` | `ActionPayload::Count(n)`, `1..=5`      |
//! | `draw_cards`         | `ActionPayload::Count(n)`, `1..=10`     |
//! | `challenge`          | `ActionPayload::Challenge { .. }`       |
//! | `buy_insurance`      | `ActionPayload::Insurance(card)`        |
//! | `discard_cards`      | `ActionPayload::Cards(ids)`             |
//! | `end_turn`           | `ActionPayload::Empty`                  |
//!
//! ## Key Types
//!
//! - `ActionProcessor`: name-keyed dispatch table, atomic execution
//! - `ActionHandler`: validate-then-apply trait for one action
//! - `ActionResult` / `EffectReport`: what the caller renders

pub mod result;
pub mod handlers;
pub mod processor;

pub use handlers::{
    builtin_handlers, ActionHandler, BuyInsuranceHandler, ChallengeHandler, DiscardCardsHandler,
    DrawCardsHandler, EndTurnHandler, PublishChallengesHandler, BUY_INSURANCE, CHALLENGE,
    DISCARD_CARDS, DRAW_CARDS, END_TURN, PUBLISH_CHALLENGES,
};
pub use processor::ActionProcessor;
pub use result::{
    ActionData, ActionPayload, ActionRecord, ActionResult, Applied, ChallengeOutcome, EffectKind,
    EffectReport,
};
