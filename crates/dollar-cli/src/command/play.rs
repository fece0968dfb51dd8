use std::path::PathBuf;

use dollar_engine::GameTable;
use dollar_training::{EvolutionParams, RunSeed, fitness};
use rand::Rng as _;
use tracing::info;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Automaton in seat 0 (compact file or population JSON)
    first: PathBuf,
    /// Automaton in seat 1 (compact file or population JSON)
    second: PathBuf,
    /// Rank to pick from the first file when it is a population JSON file
    #[arg(long, default_value_t = 0)]
    first_rank: usize,
    /// Rank to pick from the second file when it is a population JSON file
    #[arg(long, default_value_t = 0)]
    second_rank: usize,
    /// Number of games to play
    #[arg(long, default_value_t = 1000)]
    episodes: usize,
    /// Parameters JSON file whose game rules are used
    #[arg(long)]
    params: Option<PathBuf>,
    /// Seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<RunSeed>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[expect(clippy::cast_precision_loss)]
pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        first,
        second,
        first_rank,
        second_rank,
        episodes,
        params,
        seed,
        output,
    } = arg;
    anyhow::ensure!(*episodes > 0, "--episodes must be positive");

    let rules = match params {
        Some(path) => util::read_json_file::<EvolutionParams, _>("parameters", path)?.rules,
        None => EvolutionParams::default().rules,
    };
    let mut table = GameTable::new(rules)?;
    let mut a = util::read_automaton_file(first, *first_rank)?;
    let mut b = util::read_automaton_file(second, *second_rank)?;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    info!(%seed, episodes, "playing");
    let mut rng = seed.rng();
    let tally = fitness::play_pairing(&mut table, &mut a, &mut b, *episodes, &mut rng)?;

    let n = *episodes as f32;
    let first_mean = tally.score_earned / n;
    let second_mean = (tally.score_earned - tally.score_diff) / n;
    let mut output = Output::from_output_path(output.clone())?;
    output.write_line(format_args!(
        "{}: {} wins ({:.1}%), mean score {first_mean:.3}",
        first.display(),
        tally.wins,
        100.0 * tally.wins as f32 / n,
    ))?;
    output.write_line(format_args!(
        "{}: {} wins ({:.1}%), mean score {second_mean:.3}",
        second.display(),
        tally.losses,
        100.0 * tally.losses as f32 / n,
    ))?;
    output.write_line(format_args!("draws: {}", tally.draws))?;
    output.finish()
}
