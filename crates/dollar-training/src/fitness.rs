//! Round-robin fitness evaluation.
//!
//! Every evolving automaton plays a fixed number of games against every
//! baseline automaton, always from seat 0. The per-game results are folded
//! into one [`MatchStats`] per evolving automaton; its win fraction is the
//! fitness used for selection.

use dollar_automaton::Automaton;
use dollar_engine::{DeckUnderflowError, EpisodeOutcome, GameTable, Policy};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Seat occupied by the evolving automaton in every evaluation game.
pub const EVOLVING_SEAT: usize = 0;

/// Tally of the games between one evolving and one baseline automaton.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PairingOutcome {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    /// Total score banked by the evolving seat.
    pub score_earned: f32,
    /// Total of the evolving seat's score minus the opponent's.
    pub score_diff: f32,
}

impl PairingOutcome {
    #[must_use]
    pub fn episodes(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    fn record(&mut self, outcome: &EpisodeOutcome) {
        match outcome.winner() {
            Some(EVOLVING_SEAT) => self.wins += 1,
            Some(_) => self.losses += 1,
            None => self.draws += 1,
        }
        self.score_earned += outcome.scores[EVOLVING_SEAT];
        self.score_diff += outcome.score_diff(EVOLVING_SEAT);
    }
}

/// Aggregate results of one evolving automaton over a generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct MatchStats {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub score_earned: f32,
    pub score_diff: f32,
}

impl MatchStats {
    pub fn add(&mut self, pairing: &PairingOutcome) {
        self.wins += pairing.wins;
        self.losses += pairing.losses;
        self.draws += pairing.draws;
        self.score_earned += pairing.score_earned;
        self.score_diff += pairing.score_diff;
    }

    #[must_use]
    pub fn episodes(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    /// Wins minus losses.
    #[expect(clippy::cast_possible_wrap)]
    #[must_use]
    pub fn plus_minus(&self) -> i64 {
        self.wins as i64 - self.losses as i64
    }

    /// Fraction of games won; this is the selection fitness.
    ///
    /// Zero before any game has been recorded.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn win_fraction(&self) -> f32 {
        match self.episodes() {
            0 => 0.0,
            n => self.wins as f32 / n as f32,
        }
    }
}

/// Plays `episodes` games with `evolving` in seat 0 and `opponent` in seat 1.
///
/// Each game reshuffles the deck, deals fresh hands and resets both automata.
pub fn play_pairing<R>(
    table: &mut GameTable,
    evolving: &mut Automaton,
    opponent: &mut Automaton,
    episodes: usize,
    rng: &mut R,
) -> Result<PairingOutcome, DeckUnderflowError>
where
    R: Rng + ?Sized,
{
    let mut tally = PairingOutcome::default();
    for _ in 0..episodes {
        let players: [&mut dyn Policy; 2] = [&mut *evolving, &mut *opponent];
        let outcome = table.play_episode(players, rng)?;
        tally.record(&outcome);
    }
    Ok(tally)
}

/// Plays every evolving automaton against every baseline automaton.
///
/// Returns one [`MatchStats`] per evolving automaton, in the same order.
pub fn evaluate_round_robin<R>(
    table: &mut GameTable,
    evolving: &mut [Automaton],
    baseline: &mut [Automaton],
    episodes: usize,
    rng: &mut R,
) -> Result<Vec<MatchStats>, DeckUnderflowError>
where
    R: Rng + ?Sized,
{
    evolving
        .iter_mut()
        .map(|individual| {
            let mut stats = MatchStats::default();
            for opponent in baseline.iter_mut() {
                let pairing = play_pairing(table, individual, opponent, episodes, rng)?;
                stats.add(&pairing);
            }
            Ok(stats)
        })
        .collect()
}
