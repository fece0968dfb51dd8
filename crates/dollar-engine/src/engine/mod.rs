//! Game-level logic built on the card primitives.
//!
//! - [`GameRules`] - Deck composition and hand size, with the derived round count
//! - [`Observation`] / [`Feature`] - What a player sees before acting
//! - [`Policy`] - The interface every player implements
//! - [`GameTable`] - Plays complete episodes between two policies
//!
//! # Game Flow
//!
//! A game is a fixed number of rounds ([`GameRules::num_rounds`]). In each round
//! the leader commits to an [`Action`](crate::Action) seeing no card, the
//! follower then commits seeing the leader's card, and both score their own
//! card when the pair "deals" (sums to at most [`DEAL_LIMIT`](crate::DEAL_LIMIT)).
//! The player with the higher total at the end wins.

pub use self::{observation::*, policy::*, rules::*, table::*};

mod observation;
mod policy;
mod rules;
mod table;
