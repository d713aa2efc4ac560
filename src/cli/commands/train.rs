//! Train command - Train a Sarsa or Q-learning agent against the random opponent

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    cli::output::{format_number, print_kv, print_outcome_counts, print_section, print_subsection},
    pipeline::{
        CurveCsvObserver, PolicyKind, ProgressObserver, RANDOM_BASELINE_WIN_RATE, Trainer,
        TrainingConfig, TrainingReport, TrainingStats,
    },
    q_learning::{
        DEFAULT_DISCOUNT, DEFAULT_LEARNING_RATE, EpsilonGreedyPolicy, SavedQTable, TdAlgorithm,
        TrainingMetadata,
    },
    quarto::OutcomeCounts,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AlgorithmArg {
    /// On-policy TD control
    Sarsa,
    /// Off-policy TD control
    Qlearn,
}

impl From<AlgorithmArg> for TdAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Sarsa => TdAlgorithm::Sarsa,
            AlgorithmArg::Qlearn => TdAlgorithm::QLearning,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Always the highest-valued action
    Greedy,
    /// Random action with probability epsilon
    EpsilonGreedy,
}

#[derive(Parser, Debug)]
#[command(about = "Train a tabular agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// TD algorithm to train with
    #[arg(value_enum)]
    pub algorithm: AlgorithmArg,

    /// Learning rate α (0.0-1.0]
    #[arg(long, short = 'a', default_value_t = DEFAULT_LEARNING_RATE)]
    pub alpha: f64,

    /// Discount factor γ (0.0-1.0)
    #[arg(long, default_value_t = DEFAULT_DISCOUNT)]
    pub gamma: f64,

    /// Learner policy
    #[arg(long, short = 'p', value_enum, default_value = "greedy")]
    pub policy: PolicyArg,

    /// Exploration rate for the epsilon-greedy policy
    #[arg(long, default_value_t = EpsilonGreedyPolicy::DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Episodes per reported batch
    #[arg(long, short = 'w', default_value_t = 1000)]
    pub batch_width: usize,

    /// Number of batches
    #[arg(long, short = 'n', default_value_t = 100)]
    pub num_batches: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write every episode outcome as a JSON array
    #[arg(long)]
    pub result_log: Option<PathBuf>,

    /// Write the per-batch learning curve as CSV
    #[arg(long)]
    pub curve: Option<PathBuf>,

    /// Save the trained Q-table (MessagePack)
    #[arg(long, short = 'O')]
    pub save: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl TrainArgs {
    fn policy_kind(&self) -> PolicyKind {
        match self.policy {
            PolicyArg::Greedy => PolicyKind::Greedy,
            PolicyArg::EpsilonGreedy => PolicyKind::EpsilonGreedy {
                epsilon: self.epsilon,
            },
        }
    }

    fn config(&self) -> TrainingConfig {
        let config = TrainingConfig::new(self.algorithm.into(), self.alpha)
            .with_gamma(self.gamma)
            .with_policy(self.policy_kind())
            .with_batches(self.batch_width, self.num_batches);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    config: &'a TrainingConfig,
    totals: OutcomeCounts,
    win_rates: &'a [f64],
    final_win_rate: Option<f64>,
    baseline_win_rate: f64,
    stats: &'a TrainingStats,
    q_values: usize,
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

fn print_report(report: &TrainingReport, q_values: usize) {
    print_subsection("Results");
    print_outcome_counts(&report.totals);
    print_kv("Steps", &format_number(report.stats.steps));
    print_kv("Q-values", &format_number(q_values));
    print_kv(
        "Throughput",
        &format!("{:.0} episodes/s", report.stats.episodes_per_second),
    );

    if let (Some(first), Some(last)) = (report.win_rates.first(), report.win_rates.last()) {
        print_subsection("Learning curve");
        print_kv("First batch", &format!("{first:.3}"));
        print_kv("Final batch", &format!("{last:.3}"));
        print_kv("Random baseline", &format!("{RANDOM_BASELINE_WIN_RATE:.3}"));
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.config();
    config.validate()?;

    let label = format!(
        "{}(alpha={}, {})",
        config.algorithm.label(),
        config.alpha,
        config.policy.label()
    );

    print_section(&format!("Training {label}"));
    print_kv("Opponent", "Random");
    print_kv(
        "Episodes",
        &format!(
            "{} ({} x {})",
            format_number(config.total_episodes()),
            config.num_batches,
            config.batch_width
        ),
    );
    print_kv("Discount", &config.gamma.to_string());
    if let Some(seed) = config.seed {
        print_kv("Seed", &seed.to_string());
    }

    let mut trainer = Trainer::new(config.clone());
    if !args.no_progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.curve {
        ensure_parent(path)?;
        trainer = trainer.with_observer(Box::new(CurveCsvObserver::new(path, label.clone())?));
    }

    let run = trainer.run()?;
    let q_values = run.learner.q_table().size();
    print_report(&run.report, q_values);

    if let Some(path) = &args.result_log {
        ensure_parent(path)?;
        run.report.result_log.save_json(path)?;
        println!("\nResult log written to {}", path.display());
    }

    if let Some(path) = &args.curve {
        println!("Learning curve written to {}", path.display());
    }

    if let Some(path) = &args.save {
        ensure_parent(path)?;
        let saved = SavedQTable::from_q_table(
            run.learner.q_table(),
            config.algorithm,
            TrainingMetadata {
                policy: config.policy.label(),
                episodes: run.report.stats.episodes,
                final_win_rate: run.report.final_win_rate(),
                seed: config.seed,
            },
        );
        saved.save_to_file(path)?;
        println!(
            "Q-table saved to {} ({} entries)",
            path.display(),
            format_number(saved.len())
        );
    }

    if let Some(path) = &args.summary {
        ensure_parent(path)?;
        let summary = TrainingSummaryFile {
            config: &config,
            totals: run.report.totals,
            win_rates: &run.report.win_rates,
            final_win_rate: run.report.final_win_rate(),
            baseline_win_rate: RANDOM_BASELINE_WIN_RATE,
            stats: &run.report.stats,
            q_values,
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create summary {}", path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}
