use dollar_engine::{GameRules, RulesError};
use serde::{Deserialize, Serialize};

/// Parameters of one evolution run.
///
/// Every field has a default, so a JSON file only needs to name the values it
/// changes:
///
/// ```
/// use dollar_training::EvolutionParams;
///
/// let params: EvolutionParams =
///     serde_json::from_str(r#"{ "num_generations": 10, "rules": { "hand_size": 3 } }"#).unwrap();
/// assert_eq!(params.num_generations, 10);
/// assert_eq!(params.rules.hand_size, 3);
/// assert_eq!(params.population_size, 15);
/// params.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EvolutionParams {
    /// States per automaton.
    pub num_states: usize,
    /// Size of the evolving subset.
    pub population_size: usize,
    /// Size of the baseline subset, re-randomized every generation.
    pub baseline_size: usize,
    /// Individuals drawn into each generation's tournament.
    pub tournament_size: usize,
    /// `mutate` calls applied to each of the two offspring.
    pub mutations_per_offspring: usize,
    /// Games played between every evolving/baseline pair.
    pub episodes_per_pairing: usize,
    pub num_generations: usize,
    pub rules: GameRules,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            num_states: 8,
            population_size: 15,
            baseline_size: 25,
            tournament_size: 11,
            mutations_per_offspring: 9,
            episodes_per_pairing: 5,
            num_generations: 250,
            rules: GameRules::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ParamsError {
    #[display("invalid game rules: {_0}")]
    #[from]
    Rules(RulesError),
    #[display("{name} must be positive")]
    Zero { name: &'static str },
    #[display("tournament size must be between 2 and the population size {population_size}, got {tournament_size}")]
    TournamentSize {
        tournament_size: usize,
        population_size: usize,
    },
}

impl EvolutionParams {
    /// Checks every parameter, including the game rules.
    pub fn validate(&self) -> Result<(), ParamsError> {
        self.rules.validate()?;
        for (name, value) in [
            ("num_states", self.num_states),
            ("population_size", self.population_size),
            ("baseline_size", self.baseline_size),
            ("episodes_per_pairing", self.episodes_per_pairing),
            ("num_generations", self.num_generations),
        ] {
            if value == 0 {
                return Err(ParamsError::Zero { name });
            }
        }
        if !(2..=self.population_size).contains(&self.tournament_size) {
            return Err(ParamsError::TournamentSize {
                tournament_size: self.tournament_size,
                population_size: self.population_size,
            });
        }
        Ok(())
    }

    /// Games each evolving individual plays per generation.
    #[must_use]
    pub fn episodes_per_generation(&self) -> usize {
        self.baseline_size * self.episodes_per_pairing
    }
}
