//! Evaluate command - Evaluate a saved Q-table greedily against the random opponent

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::output::{format_number, print_kv, print_outcome_counts, print_section},
    pipeline::{RANDOM_BASELINE_WIN_RATE, RandomPolicy, evaluate_policy},
    q_learning::{GreedyPolicy, SavedQTable},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a saved Q-table")]
pub struct EvaluateArgs {
    /// Path to a saved Q-table
    pub agent: PathBuf,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 1000)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    println!("Loading Q-table from: {}", args.agent.display());
    let saved = SavedQTable::load_from_file(&args.agent)?;

    print_section("Loaded Agent Info");
    print_kv("Algorithm", saved.algorithm.label());
    print_kv("Policy", &saved.metadata.policy);
    print_kv("Episodes trained", &format_number(saved.metadata.episodes));
    print_kv("Q-values", &format_number(saved.len()));
    if let Some(rate) = saved.metadata.final_win_rate {
        print_kv("Final win rate", &format!("{rate:.3}"));
    }

    let table = saved.to_q_table()?;
    let (mut policy, opponent) = match args.seed {
        Some(seed) => (
            GreedyPolicy::new(table).with_seed(seed),
            RandomPolicy::with_seed("Random", seed.wrapping_add(1)),
        ),
        None => (GreedyPolicy::new(table), RandomPolicy::default()),
    };

    print_section(&format!("Greedy evaluation over {} games", args.games));
    let counts = evaluate_policy(&mut policy, Box::new(opponent), args.games)?;
    print_outcome_counts(&counts);
    print_kv("Win rate", &format!("{:.3}", counts.win_rate()));
    print_kv("Random baseline", &format!("{RANDOM_BASELINE_WIN_RATE:.3}"));
    Ok(())
}
