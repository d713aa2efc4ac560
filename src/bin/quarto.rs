//! Quarto CLI - Train, play and evaluate tabular Quarto agents

use anyhow::Result;
use clap::{Parser, Subcommand};
use flexi_logger::Logger;

#[derive(Parser)]
#[command(name = "quarto")]
#[command(version, about = "Tabular Sarsa and Q-learning agents for Quarto", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Sarsa or Q-learning agent
    Train(Box<quarto::cli::commands::train::TrainArgs>),

    /// Play random-vs-random games
    Play(quarto::cli::commands::play::PlayArgs),

    /// Evaluate a saved Q-table against the random opponent
    Evaluate(quarto::cli::commands::evaluate::EvaluateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let _logger = Logger::try_with_env_or_str(level)?
        .format(flexi_logger::colored_default_format)
        .start()?;

    match cli.command {
        Commands::Train(args) => quarto::cli::commands::train::execute(*args),
        Commands::Play(args) => quarto::cli::commands::play::execute(args),
        Commands::Evaluate(args) => quarto::cli::commands::evaluate::execute(args),
    }
}
