use clap::{Parser, Subcommand};

use self::{evolve::EvolveArg, play::PlayArg, render::RenderArg};

mod evolve;
mod play;
mod render;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve automata against a refreshed pool of random opponents
    Evolve(#[clap(flatten)] EvolveArg),
    /// Print an automaton as human-readable pseudocode
    Render(#[clap(flatten)] RenderArg),
    /// Play two automata against each other and print the tally
    Play(#[clap(flatten)] PlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Evolve(arg) => evolve::run(&arg)?,
        Mode::Render(arg) => render::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
    }
    Ok(())
}
