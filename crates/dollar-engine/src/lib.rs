//! Simulation of the two-player "divide the dollar" card game.
//!
//! Players hold a small sorted hand of fractional cards. Every round one
//! player leads a card and the other follows; if the two cards sum to at most
//! one dollar, both players bank their own card, otherwise neither scores.
//! Leading low keeps deals alive, following high can "spoil" the opponent's
//! round.
//!
//! Players never pick cards directly: they pick one of three [`Action`]s and
//! the hand resolves it to a concrete card (see [`Hand::select`]).
//!
//! # Modules
//!
//! - [`core`] - Actions, decks and hands
//! - [`engine`] - Rules, observations, the [`Policy`] trait and the [`GameTable`]
//!
//! # Example
//!
//! ```
//! use dollar_engine::{Action, FixedPolicy, GameRules, GameTable};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let mut rng = Pcg32::seed_from_u64(0);
//! let mut table = GameTable::new(GameRules::default()).unwrap();
//!
//! let mut cautious = FixedPolicy(Action::SmallSpoil);
//! let mut greedy = FixedPolicy(Action::LargeMax);
//! let outcome = table.play_episode([&mut cautious, &mut greedy], &mut rng).unwrap();
//!
//! match outcome.winner() {
//!     Some(seat) => println!("seat {seat} wins"),
//!     None => println!("draw"),
//! }
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
