//! Steady-state evolution of divide-the-dollar automata.
//!
//! # How Training Works
//!
//! 1. **Population** - An evolving set of random automata and a baseline set
//!    of random opponents
//! 2. **Evaluation** - Every evolving automaton plays every baseline automaton
//!    ([`fitness`])
//! 3. **Fitness** - The fraction of games won
//! 4. **Selection** - A random tournament; its two weakest members are replaced
//!    by crossed and mutated copies of its two strongest ([`evolution`])
//! 5. **Refresh** - The baseline is re-randomized, so the opponents are a
//!    moving target rather than something to overfit
//! 6. **Repeat** - For a fixed number of generations
//!
//! # Architecture
//!
//! ```text
//! EvolutionEngine (owns RNG, table, both populations)
//!     ↓ each generation
//! evaluate_round_robin
//!     ↓ plays
//! GameTable::play_episode (dollar-engine)
//!     ↓ asks
//! Automaton::run (dollar-automaton)
//!     ↓ produces
//! MatchStats → GenerationReport (dollar-stats)
//! ```
//!
//! A run is a pure function of its [`EvolutionParams`] and [`RunSeed`].

pub use self::{
    evolution::{EvolutionEngine, EvolutionError},
    fitness::{MatchStats, PairingOutcome},
    params::{EvolutionParams, ParamsError},
    report::{GenerationReport, RankedIndividual, Summary},
    seed::{ParseSeedError, RunSeed},
};

pub mod evolution;
pub mod fitness;
pub mod params;
pub mod report;
pub mod seed;
