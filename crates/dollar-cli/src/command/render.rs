use std::{io::Write as _, path::PathBuf};

use anyhow::Context as _;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RenderArg {
    /// Compact automaton file, or a population JSON file
    input: PathBuf,
    /// Rank to pick when reading a population JSON file
    #[arg(long, default_value_t = 0)]
    rank: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &RenderArg) -> anyhow::Result<()> {
    let RenderArg {
        input,
        rank,
        output,
    } = arg;
    let automaton = util::read_automaton_file(input, *rank)?;
    let mut output = Output::from_output_path(output.clone())?;
    write!(output, "{}", automaton.render())
        .with_context(|| format!("Failed to write to {}", output.display_path()))?;
    output.finish()
}
