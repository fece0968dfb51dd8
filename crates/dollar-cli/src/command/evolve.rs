use std::{
    fs,
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use chrono::Utc;
use dollar_training::{EvolutionEngine, EvolutionParams, GenerationReport, RunSeed};
use rand::Rng as _;
use tracing::info;

use crate::{
    schema::population::{PopulationModel, TrainedAutomaton},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvolveArg {
    /// Parameters JSON file (defaults are used for missing fields)
    #[arg(long)]
    params: Option<PathBuf>,
    /// Number of independent runs
    #[arg(long, default_value_t = 1)]
    runs: usize,
    /// Override the number of generations per run
    #[arg(long)]
    generations: Option<usize>,
    /// Base seed as 32 hex digits (random if omitted); each run derives its own
    #[arg(long)]
    seed: Option<RunSeed>,
    /// Directory receiving the report and population files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

/// The four per-generation report files of one run.
struct ReportFiles {
    win_fraction: Output,
    plus_minus: Output,
    score_earned: Output,
    score_diff: Output,
}

impl ReportFiles {
    fn create(dir: &Path, run: usize) -> anyhow::Result<Self> {
        let open = |name: &str| Output::open(dir.join(format!("{name}-{run}.txt")));
        Ok(Self {
            win_fraction: open("win_fraction")?,
            plus_minus: open("plus_minus")?,
            score_earned: open("score_earned")?,
            score_diff: open("score_diff")?,
        })
    }

    fn write(&mut self, report: &GenerationReport) -> anyhow::Result<()> {
        self.win_fraction.write_line(report.win_fraction)?;
        self.plus_minus.write_line(report.plus_minus)?;
        self.score_earned.write_line(report.score_earned)?;
        self.score_diff.write_line(report.score_diff)?;
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.win_fraction.finish()?;
        self.plus_minus.finish()?;
        self.score_earned.finish()?;
        self.score_diff.finish()?;
        Ok(())
    }
}

pub(crate) fn run(arg: &EvolveArg) -> anyhow::Result<()> {
    let EvolveArg {
        params,
        runs,
        generations,
        seed,
        output_dir,
    } = arg;

    let mut params = match params {
        Some(path) => util::read_json_file::<EvolutionParams, _>("parameters", path)?,
        None => EvolutionParams::default(),
    };
    if let Some(generations) = generations {
        params.num_generations = *generations;
    }
    params.validate().context("Invalid evolution parameters")?;

    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let base_seed = seed.unwrap_or_else(|| rand::rng().random());
    info!(%base_seed, runs, "evolving");
    for run in 0..*runs {
        run_once(&params, run, base_seed.for_run(run), output_dir)
            .with_context(|| format!("Run {run} failed"))?;
    }
    Ok(())
}

fn run_once(
    params: &EvolutionParams,
    run: usize,
    seed: RunSeed,
    output_dir: &Path,
) -> anyhow::Result<()> {
    info!(run, %seed, "starting run");
    let mut engine = EvolutionEngine::new(params.clone(), seed)?;
    let mut reports = ReportFiles::create(output_dir, run)?;
    while !engine.is_finished() {
        let report = engine.step()?;
        reports.write(&report)?;
    }
    reports.finish()?;
    let ranked = engine.finalize();

    let dump_path = output_dir.join(format!("population-{run}.txt"));
    let mut dump = Output::open(dump_path)?;
    for individual in &ranked {
        writeln!(dump, "{individual}")
            .with_context(|| format!("Failed to write to {}", dump.display_path()))?;
    }
    dump.finish()?;

    let model = PopulationModel {
        trained_at: Utc::now(),
        run,
        seed,
        params: params.clone(),
        individuals: ranked.iter().map(TrainedAutomaton::from).collect(),
    };
    let model_path = output_dir.join(format!("population-{run}.json"));
    Output::save_json(&model, Some(model_path.clone()))?;

    if let Some(best) = model.individuals.first() {
        info!(
            run,
            best_fitness = best.fitness,
            path = %model_path.display(),
            "run completed"
        );
    }
    Ok(())
}
