//! Card piles: draw pile, hand, discard pile.
//!
//! ## Key Types
//!
//! - `CardManager`: owns the three piles and the draw/reshuffle protocol
//! - `DrawOutcome`: drawn, auto-discarded and trouble cards of one draw
//! - `Pile`: which pile a card is in

pub mod manager;

pub use manager::{CardManager, DrawOutcome, Pile, MAX_DRAW, MIN_DRAW};
