use std::fmt;

use dollar_automaton::Automaton;
use dollar_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

use crate::fitness::MatchStats;

/// Confidence level of the reported interval on the mean.
pub const CONFIDENCE: f32 = 0.95;

/// One aggregate summarized across the evolving population.
///
/// Displays as `mean ci_upper std_dev max`, six decimals each.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Summary {
    pub mean: f32,
    /// Upper end of the 95% confidence interval on the mean.
    pub ci_upper: f32,
    /// Population standard deviation.
    pub std_dev: f32,
    pub max: f32,
}

impl Summary {
    /// Summarizes `values`; `None` if there are none.
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let stats = DescriptiveStats::new(values)?;
        Some(Self {
            mean: stats.mean,
            ci_upper: stats.mean_upper_bound(CONFIDENCE),
            std_dev: stats.std_dev,
            max: stats.max,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6} {:.6} {:.6} {:.6}",
            self.mean, self.ci_upper, self.std_dev, self.max
        )
    }
}

/// Per-generation statistics of the evolving population.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub win_fraction: Summary,
    pub plus_minus: Summary,
    pub score_earned: Summary,
    pub score_diff: Summary,
}

impl GenerationReport {
    /// Summarizes one generation's match statistics.
    ///
    /// # Panics
    ///
    /// Panics if `stats` is empty.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(generation: usize, stats: &[MatchStats]) -> Self {
        let summarize = |f: fn(&MatchStats) -> f32| {
            Summary::new(stats.iter().map(f)).expect("population must not be empty")
        };
        Self {
            generation,
            win_fraction: summarize(MatchStats::win_fraction),
            plus_minus: summarize(|s| s.plus_minus() as f32),
            score_earned: summarize(|s| s.score_earned),
            score_diff: summarize(|s| s.score_diff),
        }
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation {}: win_fraction {} | plus_minus {} | score_earned {} | score_diff {}",
            self.generation, self.win_fraction, self.plus_minus, self.score_earned, self.score_diff
        )
    }
}

/// An evolving automaton with the statistics of the final generation.
///
/// Displays as the population dump entry: a header line
/// `<fitness> -fitness (<plus_minus> <score_earned> <score_diff>)`, then the
/// human-readable rendering, then the compact rows.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RankedIndividual {
    pub rank: usize,
    pub fitness: f32,
    pub stats: MatchStats,
    pub automaton: Automaton,
}

impl fmt::Display for RankedIndividual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:.6} -fitness ({} {:.2} {:.2})",
            self.fitness,
            self.stats.plus_minus(),
            self.stats.score_earned,
            self.stats.score_diff
        )?;
        write!(f, "{}", self.automaton.render())?;
        write!(f, "{}", self.automaton.to_compact())
    }
}
