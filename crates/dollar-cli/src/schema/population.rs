use chrono::{DateTime, Utc};
use dollar_automaton::Automaton;
use dollar_training::{EvolutionParams, MatchStats, RankedIndividual, RunSeed};
use serde::{Deserialize, Serialize};

/// Final population of one evolution run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PopulationModel {
    /// Timestamp when the run finished (ISO 8601 format)
    pub trained_at: DateTime<Utc>,
    /// Index of the run within a multi-run experiment
    pub run: usize,
    /// Seed the run was started from
    pub seed: RunSeed,
    pub params: EvolutionParams,
    /// Evolving automata, best first
    pub individuals: Vec<TrainedAutomaton>,
}

/// One ranked automaton with the statistics of the final generation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainedAutomaton {
    pub rank: usize,
    pub fitness: f32,
    pub plus_minus: i64,
    pub stats: MatchStats,
    /// Compact rows, one per state
    pub states: Vec<String>,
}

impl From<&RankedIndividual> for TrainedAutomaton {
    fn from(individual: &RankedIndividual) -> Self {
        Self {
            rank: individual.rank,
            fitness: individual.fitness,
            plus_minus: individual.stats.plus_minus(),
            stats: individual.stats,
            states: individual
                .automaton
                .to_records()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl PopulationModel {
    pub fn automaton(&self, rank: usize) -> anyhow::Result<Automaton> {
        let individual = self.individuals.get(rank).ok_or_else(|| {
            anyhow::anyhow!(
                "Rank {rank} not found: population has {} individuals",
                self.individuals.len()
            )
        })?;
        Ok(Automaton::from_compact(&individual.states.join("\n"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_roundtrip_recovers_automata() {
        let automaton = Automaton::from_compact("3 0 0.500 0 1 2 0\n4 2 0.125 1 0 1 1\n").unwrap();
        let ranked = RankedIndividual {
            rank: 0,
            fitness: 0.75,
            stats: MatchStats {
                wins: 3,
                losses: 1,
                draws: 0,
                score_earned: 12.5,
                score_diff: 1.25,
            },
            automaton: automaton.clone(),
        };
        let model = PopulationModel {
            trained_at: Utc::now(),
            run: 2,
            seed: RunSeed::from_u128(9),
            params: EvolutionParams::default(),
            individuals: vec![TrainedAutomaton::from(&ranked)],
        };
        assert_eq!(model.individuals[0].plus_minus, 2);
        assert_eq!(model.individuals[0].states[1], "4 2 0.125 1 0 1 1");

        let json = serde_json::to_string(&model).unwrap();
        let back: PopulationModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back.automaton(0).unwrap(), automaton);
        assert!(back.automaton(1).is_err());
    }
}
