//! Behavioral decision automata for the divide-the-dollar game.
//!
//! An [`Automaton`] is a small state machine whose states each test one
//! observation feature against a threshold and branch on the result. Every
//! branch names an [`Action`](dollar_engine::Action) and a successor state, so
//! the automaton carries a little memory from one turn to the next within a
//! game.
//!
//! # Components
//!
//! - [`State`] / [`Branch`] / [`Comparison`] - One node and its two outcomes
//! - [`Automaton`] - The interpreter ([`Automaton::run`]) and the genetic
//!   operators ([`Automaton::crossover`], [`Automaton::mutate`])
//! - [`codec`] - Compact seven-field text form and its parser
//! - [`Render`] - Human-readable pseudocode listing
//!
//! # Validity
//!
//! Every constructor, randomizer and genetic operator keeps all codes in range:
//! transitions in `0..num_states`, thresholds in `[0, 1]`, and features,
//! comparisons and actions as enums. Parsing ([`Automaton::from_compact`]) is
//! the only place invalid input can appear, and it is rejected there.
//!
//! # Example
//!
//! ```
//! use dollar_automaton::Automaton;
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let mut rng = Pcg32::seed_from_u64(1);
//! let mut a = Automaton::random(8, &mut rng);
//! let mut b = Automaton::random(8, &mut rng);
//!
//! a.crossover(&mut b, &mut rng);
//! a.mutate(&mut rng);
//!
//! let text = a.to_compact();
//! assert_eq!(Automaton::from_compact(&text).unwrap(), a);
//! println!("{}", a.render());
//! ```

pub use self::{
    automaton::{Automaton, MAX_TRANSITIONS, Mutation},
    codec::{InvalidAutomatonError, ParseAutomatonError, ParseRecordError, StateRecord},
    render::Render,
    state::{Branch, Comparison, NEAR, State, StateField, THRESHOLD_STEPS, random_threshold},
};

mod automaton;
pub mod codec;
mod render;
mod state;
