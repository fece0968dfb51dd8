//! Steady-state evolution of an automaton population.
//!
//! # Generation Cycle
//!
//! 1. **Refresh** - Re-randomize every baseline automaton (skipped in
//!    generation 0, whose baseline is fresh from construction)
//! 2. **Evaluate** - Round robin of evolving against baseline automata
//! 3. **Report** - Summarize the evolving population's match statistics
//! 4. **Select** - Draw `tournament_size` evolving individuals and order
//!    them by ascending fitness
//! 5. **Replace** - Overwrite the two weakest of the tournament with copies of
//!    the two strongest
//! 6. **Cross** - Cross the two copies with each other
//! 7. **Vary** - Mutate the two copies `mutations_per_offspring` times each,
//!    alternating between them
//!
//! Steps 4-7 are skipped in the final generation, whose statistics rank the
//! population. Only two slots change per generation, so the population size
//! never changes.

use dollar_automaton::Automaton;
use dollar_engine::{DeckUnderflowError, GameTable};
use rand::seq::index;
use rand_pcg::Pcg32;
use tracing::{debug, info};

use crate::{
    fitness::{self, MatchStats},
    params::{EvolutionParams, ParamsError},
    report::{GenerationReport, RankedIndividual},
    seed::RunSeed,
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EvolutionError {
    #[display("evaluation failed: {_0}")]
    #[from]
    DeckUnderflow(DeckUnderflowError),
    #[display("all {generations} generations have already run")]
    Finished { generations: usize },
}

/// Owns a population, its opponents, the game table and the random generator
/// for one run.
///
/// # Example
///
/// ```
/// use dollar_training::{EvolutionEngine, EvolutionParams, RunSeed};
///
/// let params = EvolutionParams {
///     population_size: 6,
///     baseline_size: 3,
///     tournament_size: 4,
///     episodes_per_pairing: 2,
///     num_generations: 3,
///     ..EvolutionParams::default()
/// };
/// let mut engine = EvolutionEngine::new(params, RunSeed::from_u128(1)).unwrap();
/// let ranked = engine.run(|report| println!("{report}")).unwrap();
///
/// assert_eq!(ranked.len(), 6);
/// assert!(ranked.is_sorted_by(|a, b| a.fitness >= b.fitness));
/// ```
#[derive(Debug, Clone)]
pub struct EvolutionEngine {
    params: EvolutionParams,
    seed: RunSeed,
    rng: Pcg32,
    table: GameTable,
    evolving: Vec<Automaton>,
    baseline: Vec<Automaton>,
    stats: Vec<MatchStats>,
    generation: usize,
}

impl EvolutionEngine {
    /// Validates `params` and randomizes both the evolving and the baseline
    /// population.
    pub fn new(params: EvolutionParams, seed: RunSeed) -> Result<Self, ParamsError> {
        params.validate()?;
        let table = GameTable::new(params.rules.clone())?;
        let mut rng = seed.rng();
        let evolving = (0..params.population_size)
            .map(|_| Automaton::random(params.num_states, &mut rng))
            .collect();
        let baseline = (0..params.baseline_size)
            .map(|_| Automaton::random(params.num_states, &mut rng))
            .collect();
        info!(
            %seed,
            population = params.population_size,
            baseline = params.baseline_size,
            episodes = params.episodes_per_generation(),
            generations = params.num_generations,
            rounds = table.num_rounds(),
            "starting evolution"
        );
        Ok(Self {
            params,
            seed,
            rng,
            table,
            evolving,
            baseline,
            stats: Vec::new(),
            generation: 0,
        })
    }

    #[must_use]
    pub fn params(&self) -> &EvolutionParams {
        &self.params
    }

    #[must_use]
    pub fn seed(&self) -> RunSeed {
        self.seed
    }

    /// Number of generations already run.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.generation >= self.params.num_generations
    }

    #[must_use]
    pub fn evolving(&self) -> &[Automaton] {
        &self.evolving
    }

    #[must_use]
    pub fn baseline(&self) -> &[Automaton] {
        &self.baseline
    }

    /// Match statistics of the last evaluated generation, one per evolving
    /// automaton. Empty before the first [`step`](Self::step).
    #[must_use]
    pub fn stats(&self) -> &[MatchStats] {
        &self.stats
    }

    /// Runs one generation and reports on its evaluation.
    pub fn step(&mut self) -> Result<GenerationReport, EvolutionError> {
        if self.is_finished() {
            return Err(EvolutionError::Finished {
                generations: self.params.num_generations,
            });
        }

        if self.generation > 0 {
            for automaton in &mut self.baseline {
                automaton.randomize(&mut self.rng);
            }
        }

        self.stats = fitness::evaluate_round_robin(
            &mut self.table,
            &mut self.evolving,
            &mut self.baseline,
            self.params.episodes_per_pairing,
            &mut self.rng,
        )?;
        debug_assert!(
            self.stats
                .iter()
                .all(|s| s.episodes() == self.params.episodes_per_generation())
        );
        let report = GenerationReport::new(self.generation, &self.stats);
        debug!(
            generation = self.generation,
            mean = report.win_fraction.mean,
            max = report.win_fraction.max,
            "evaluated generation"
        );

        self.generation += 1;
        if !self.is_finished() {
            self.reproduce();
        }
        Ok(report)
    }

    /// Runs every remaining generation, handing each report to `on_report`,
    /// and returns the final ranking.
    pub fn run<F>(&mut self, mut on_report: F) -> Result<Vec<RankedIndividual>, EvolutionError>
    where
        F: FnMut(&GenerationReport),
    {
        while !self.is_finished() {
            let report = self.step()?;
            on_report(&report);
        }
        Ok(self.finalize())
    }

    /// Evolving automata ranked by the last generation's fitness, best first.
    ///
    /// Ties keep population order. Empty before the first generation. Before
    /// the run is finished, the two slots replaced after the last evaluation
    /// still carry their predecessors' statistics.
    #[must_use]
    pub fn finalize(&self) -> Vec<RankedIndividual> {
        let mut order = (0..self.stats.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| self.fitness(b).total_cmp(&self.fitness(a)));
        let ranked = order
            .into_iter()
            .enumerate()
            .map(|(rank, i)| {
                let mut automaton = self.evolving[i].clone();
                automaton.reset();
                RankedIndividual {
                    rank,
                    fitness: self.fitness(i),
                    stats: self.stats[i],
                    automaton,
                }
            })
            .collect::<Vec<_>>();
        if let Some(best) = ranked.first() {
            info!(
                generations = self.generation,
                best_fitness = best.fitness,
                "evolution finished"
            );
        }
        ranked
    }

    fn fitness(&self, index: usize) -> f32 {
        self.stats[index].win_fraction()
    }

    /// Tournament selection, replacement, crossover and mutation.
    fn reproduce(&mut self) {
        let size = self.params.tournament_size;
        let mut tournament =
            index::sample(&mut self.rng, self.params.population_size, size).into_vec();
        tournament.sort_by(|&a, &b| self.fitness(a).total_cmp(&self.fitness(b)));

        // Copies are made in order, so with two entrants the second copy
        // reads the slot the first one just overwrote and both become the best.
        let (worst, second_worst) = (tournament[0], tournament[1]);
        self.evolving[worst] = self.evolving[tournament[size - 1]].clone();
        self.evolving[second_worst] = self.evolving[tournament[size - 2]].clone();

        let (first, second) = pair_mut(&mut self.evolving, worst, second_worst);
        first.crossover(second, &mut self.rng);
        for _ in 0..self.params.mutations_per_offspring {
            first.mutate(&mut self.rng);
            second.mutate(&mut self.rng);
        }
    }
}

fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    assert_ne!(a, b, "indices must be distinct");
    if a < b {
        let (left, right) = items.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

#[cfg(test)]
mod tests {
    use dollar_automaton::State;

    use super::*;

    fn genomes(population: &[Automaton]) -> Vec<Vec<State>> {
        population.iter().map(|a| a.states().to_vec()).collect()
    }

    fn small_params() -> EvolutionParams {
        EvolutionParams {
            num_states: 4,
            population_size: 6,
            baseline_size: 4,
            tournament_size: 4,
            mutations_per_offspring: 2,
            episodes_per_pairing: 2,
            num_generations: 5,
            ..EvolutionParams::default()
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let seed = RunSeed::from_u128(0x5eed);
        let mut a = EvolutionEngine::new(small_params(), seed).unwrap();
        let mut b = EvolutionEngine::new(small_params(), seed).unwrap();

        let mut reports_a = vec![];
        let mut reports_b = vec![];
        let ranked_a = a.run(|r| reports_a.push(*r)).unwrap();
        let ranked_b = b.run(|r| reports_b.push(*r)).unwrap();

        assert_eq!(reports_a, reports_b);
        assert_eq!(ranked_a, ranked_b);
        assert_eq!(reports_a.len(), 5);
    }

    #[test]
    fn test_population_size_is_constant() {
        let mut engine = EvolutionEngine::new(small_params(), RunSeed::from_u128(3)).unwrap();
        while !engine.is_finished() {
            let report = engine.step().unwrap();
            assert_eq!(engine.evolving().len(), 6);
            assert_eq!(engine.baseline().len(), 4);
            assert_eq!(engine.stats().len(), 6);
            assert!((0.0..=1.0).contains(&report.win_fraction.max));
        }
        assert_eq!(engine.generation(), 5);
        assert_eq!(
            engine.step(),
            Err(EvolutionError::Finished { generations: 5 })
        );
    }

    #[test]
    fn test_generation_changes_at_most_two_slots() {
        let mut engine = EvolutionEngine::new(small_params(), RunSeed::from_u128(11)).unwrap();
        let before = genomes(engine.evolving());
        engine.step().unwrap();
        let changed = before
            .iter()
            .zip(genomes(engine.evolving()))
            .filter(|(a, b)| **a != *b)
            .count();
        assert!(changed <= 2, "{changed} slots changed");
    }

    #[test]
    fn test_baseline_is_refreshed() {
        let mut engine = EvolutionEngine::new(small_params(), RunSeed::from_u128(12)).unwrap();
        engine.step().unwrap();
        let before = genomes(engine.baseline());
        engine.step().unwrap();
        assert_ne!(genomes(engine.baseline()), before);
    }

    #[test]
    fn test_final_generation_only_ranks() {
        let params = EvolutionParams {
            num_generations: 1,
            ..small_params()
        };
        let mut engine = EvolutionEngine::new(params, RunSeed::from_u128(5)).unwrap();
        let before = genomes(engine.evolving());
        let ranked = engine.run(|_| {}).unwrap();
        assert_eq!(genomes(engine.evolving()), before);

        assert_eq!(ranked.len(), 6);
        assert!(ranked.is_sorted_by(|a, b| a.fitness >= b.fitness));
        for (rank, entry) in ranked.iter().enumerate() {
            assert_eq!(entry.rank, rank);
            assert_eq!(entry.fitness, entry.stats.win_fraction());
            assert_eq!(entry.stats.episodes(), 4 * 2);
        }
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = EvolutionParams {
            tournament_size: 7,
            ..small_params()
        };
        assert!(matches!(
            EvolutionEngine::new(params, RunSeed::from_u128(0)),
            Err(ParamsError::TournamentSize { .. })
        ));
    }

    /// An engine whose evolving automata are distinct one-state genomes and
    /// whose fitness rises with the slot index.
    fn ranked_engine(population_size: usize, tournament_size: usize) -> EvolutionEngine {
        let params = EvolutionParams {
            num_states: 1,
            population_size,
            tournament_size,
            mutations_per_offspring: 0,
            ..small_params()
        };
        let mut engine = EvolutionEngine::new(params, RunSeed::from_u128(21)).unwrap();
        engine.evolving = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6]
            .into_iter()
            .take(population_size)
            .map(|threshold| {
                Automaton::from_states(vec![State {
                    threshold,
                    ..State::default()
                }])
                .unwrap()
            })
            .collect();
        engine.stats = (0..population_size)
            .map(|wins| MatchStats {
                wins,
                losses: population_size - wins,
                ..MatchStats::default()
            })
            .collect();
        engine
    }

    #[test]
    fn test_weakest_replaced_by_strongest() {
        // (population = tournament size, genome in slot 0, genome in slot 1)
        for (size, first, second) in [(3, 2, 1), (4, 3, 2), (6, 5, 4)] {
            let mut engine = ranked_engine(size, size);
            let before = genomes(engine.evolving());
            engine.reproduce();
            let after = genomes(engine.evolving());

            assert_eq!(after[0], before[first], "size {size}");
            assert_eq!(after[1], before[second], "size {size}");
            assert_eq!(after[2..], before[2..], "size {size}");
        }
    }

    #[test]
    fn test_tournament_of_two_copies_the_best_twice() {
        let mut engine = ranked_engine(5, 2);
        let before = genomes(engine.evolving());
        engine.reproduce();
        let after = genomes(engine.evolving());

        let changed = (0..5).filter(|&i| after[i] != before[i]).collect::<Vec<_>>();
        assert_eq!(changed.len(), 1);
        let worst = changed[0];
        let best = before.iter().position(|g| *g == after[worst]).unwrap();
        assert!(best > worst);
        assert_eq!(after[best], before[best]);
    }

    #[test]
    fn test_variation_touches_only_replaced_slots() {
        let params = EvolutionParams {
            num_states: 4,
            population_size: 5,
            tournament_size: 5,
            mutations_per_offspring: 3,
            ..small_params()
        };
        let mut engine = EvolutionEngine::new(params, RunSeed::from_u128(22)).unwrap();
        engine.stats = (0..5)
            .map(|wins| MatchStats {
                wins,
                losses: 5 - wins,
                ..MatchStats::default()
            })
            .collect();
        let before = genomes(engine.evolving());
        engine.reproduce();
        let after = genomes(engine.evolving());

        assert_eq!(after[2..], before[2..]);
        assert_eq!(after.len(), 5);
    }

    #[test]
    fn test_pair_mut() {
        let mut items = [1, 2, 3, 4];
        let (a, b) = pair_mut(&mut items, 3, 1);
        std::mem::swap(a, b);
        assert_eq!(items, [1, 4, 3, 2]);
    }
}
