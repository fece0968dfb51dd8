//! Card-level building blocks: actions, decks and hands.
//!
//! - [`Action`] - The three card-selection strategies
//! - [`Deck`] / [`DeckComposition`] - Shuffled deck dealt from the top
//! - [`Hand`] - Sorted, fixed-capacity hand with the turn-resolution rules
//!
//! Two played cards "deal" when their sum does not exceed [`DEAL_LIMIT`].

pub use self::{action::*, deck::*, hand::*};

mod action;
mod deck;
mod hand;

/// Largest sum of two played cards that still scores for both players.
pub const DEAL_LIMIT: f32 = 1.0;
