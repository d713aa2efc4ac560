//! Sarsa and Q-learning training loops
//!
//! The trainer owns the environment for the duration of a run, drives the
//! learner and the opponent turn by turn and writes TD updates into the
//! learner's Q-table. Runs stop as soon as the result log holds
//! `num_batches * batch_width` episodes; the update for the transition that
//! completed the last episode is still applied.

use std::time::Instant;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::opponents::RandomPolicy;
use crate::{
    Error, Result,
    ports::{Observer, Policy, ValuePolicy},
    q_learning::{
        DEFAULT_DISCOUNT, DEFAULT_LEARNING_RATE, EpsilonGreedyPolicy, GreedyPolicy, QTable,
        TdAlgorithm,
    },
    quarto::{Action, ActionAddress, Environment, Outcome, OutcomeCounts, ResultLog, encode_state},
};

/// Which value policy the learner follows
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Greedy,
    EpsilonGreedy { epsilon: f64 },
}

impl PolicyKind {
    pub fn label(&self) -> String {
        match self {
            PolicyKind::Greedy => "Greedy".to_string(),
            PolicyKind::EpsilonGreedy { epsilon } => format!("EpsilonGreedy(eps={epsilon})"),
        }
    }

    /// Build a learner policy around `q_table`
    pub fn build(&self, q_table: QTable, seed: Option<u64>) -> Box<dyn ValuePolicy> {
        match *self {
            PolicyKind::Greedy => {
                let policy = GreedyPolicy::new(q_table);
                Box::new(match seed {
                    Some(seed) => policy.with_seed(seed),
                    None => policy,
                })
            }
            PolicyKind::EpsilonGreedy { epsilon } => {
                let policy = EpsilonGreedyPolicy::new(q_table, epsilon);
                Box::new(match seed {
                    Some(seed) => policy.with_seed(seed),
                    None => policy,
                })
            }
        }
    }
}

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Sarsa or Q-learning
    pub algorithm: TdAlgorithm,

    /// Learning rate α
    pub alpha: f64,

    /// Discount factor γ
    pub gamma: f64,

    /// Learner policy
    pub policy: PolicyKind,

    /// Episodes per reported batch
    pub batch_width: usize,

    /// Number of batches to train for
    pub num_batches: usize,

    /// Random seed
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            algorithm: TdAlgorithm::Sarsa,
            alpha: DEFAULT_LEARNING_RATE,
            gamma: DEFAULT_DISCOUNT,
            policy: PolicyKind::Greedy,
            batch_width: 1000,
            num_batches: 100,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn new(algorithm: TdAlgorithm, alpha: f64) -> Self {
        Self {
            algorithm,
            alpha,
            ..Self::default()
        }
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_batches(mut self, batch_width: usize, num_batches: usize) -> Self {
        self.batch_width = batch_width;
        self.num_batches = num_batches;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Episode budget of the run
    pub fn total_episodes(&self) -> usize {
        self.batch_width * self.num_batches
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for out-of-range
    /// hyperparameters or an empty episode budget.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return invalid(format!("alpha must be in (0, 1], got {}", self.alpha));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return invalid(format!("gamma must be in [0, 1], got {}", self.gamma));
        }
        if let PolicyKind::EpsilonGreedy { epsilon } = self.policy {
            if !(0.0..=1.0).contains(&epsilon) {
                return invalid(format!("epsilon must be in [0, 1], got {epsilon}"));
            }
        }
        if self.batch_width == 0 || self.num_batches == 0 {
            return invalid(format!(
                "batch width and batch count must be positive, got {} x {}",
                self.batch_width, self.num_batches
            ));
        }
        Ok(())
    }
}

/// Throughput of a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingStats {
    pub episodes: usize,
    pub steps: usize,
    pub elapsed_secs: f64,
    pub episodes_per_second: f64,
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub algorithm: TdAlgorithm,
    /// Fraction of learner wins per batch
    pub win_rates: Vec<f64>,
    /// Win/tie/loss tallies per batch
    pub batches: Vec<OutcomeCounts>,
    pub totals: OutcomeCounts,
    pub stats: TrainingStats,
    #[serde(skip)]
    pub result_log: ResultLog,
}

impl TrainingReport {
    pub fn final_win_rate(&self) -> Option<f64> {
        self.win_rates.last().copied()
    }
}

/// A finished run together with the trained learner
pub struct TrainingRun {
    pub report: TrainingReport,
    pub learner: Box<dyn ValuePolicy>,
}

/// Forwards newly logged episodes to observers and the log
struct EpisodeTracker<'a> {
    observers: &'a mut [Box<dyn Observer>],
    batch_width: usize,
    num_batches: usize,
    seen: usize,
}

impl EpisodeTracker<'_> {
    fn sync(&mut self, log: &ResultLog) -> Result<()> {
        while self.seen < log.len() {
            let outcome = log.as_slice()[self.seen];
            for observer in self.observers.iter_mut() {
                observer.on_episode_end(self.seen, outcome)?;
            }
            self.seen += 1;

            if self.seen.is_multiple_of(self.batch_width) {
                let batch = self.seen / self.batch_width - 1;
                let window = &log.as_slice()[self.seen - self.batch_width..self.seen];
                let counts = OutcomeCounts::from_outcomes(window);
                info!(
                    "batch {}/{}: win rate {:.3} (W:{} T:{} L:{})",
                    batch + 1,
                    self.num_batches,
                    counts.win_rate(),
                    counts.wins,
                    counts.ties,
                    counts.losses
                );
                for observer in self.observers.iter_mut() {
                    observer.on_batch_end(batch, &counts)?;
                }
            }
        }
        Ok(())
    }
}

/// Training pipeline for a learner against an opponent policy
pub struct Trainer {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl Trainer {
    /// Create a new trainer
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the trainer
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train a fresh learner built from the configuration against the
    /// random opponent
    pub fn run(&mut self) -> Result<TrainingRun> {
        self.config.validate()?;
        let q_table = QTable::new(self.config.alpha, self.config.gamma);
        let mut learner = self.config.policy.build(q_table, None);
        let opponent = Box::new(RandomPolicy::new("Random"));
        let report = self.train(learner.as_mut(), opponent)?;
        Ok(TrainingRun { report, learner })
    }

    /// Run the configured algorithm with the given learner and opponent
    pub fn train<L: ValuePolicy + ?Sized>(
        &mut self,
        learner: &mut L,
        mut opponent: Box<dyn Policy>,
    ) -> Result<TrainingReport> {
        self.config.validate()?;
        if let PolicyKind::EpsilonGreedy { epsilon } = self.config.policy {
            if epsilon == 0.0 {
                warn!("epsilon is 0; the epsilon-greedy learner behaves greedily");
            }
        }
        if let Some(seed) = self.config.seed {
            learner.set_rng_seed(seed)?;
            opponent.set_rng_seed(seed.wrapping_add(1))?;
        }

        let total = self.config.total_episodes();
        info!(
            "training {} ({}) with alpha={} gamma={} against {} for {} episodes",
            self.config.algorithm.label(),
            learner.name(),
            self.config.alpha,
            self.config.gamma,
            opponent.name(),
            total
        );
        for observer in &mut self.observers {
            observer.on_training_start(total)?;
        }

        let started = Instant::now();
        let mut env = Environment::new(opponent);
        let mut tracker = EpisodeTracker {
            observers: &mut self.observers,
            batch_width: self.config.batch_width,
            num_batches: self.config.num_batches,
            seen: 0,
        };
        let steps = match self.config.algorithm {
            TdAlgorithm::Sarsa => run_sarsa(learner, &mut env, &mut tracker, total)?,
            TdAlgorithm::QLearning => run_q_learning(learner, &mut env, &mut tracker, total)?,
        };
        let elapsed_secs = started.elapsed().as_secs_f64();

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result_log = env.into_result_log();
        let batches = result_log.batch_counts(self.config.batch_width, self.config.num_batches);
        let win_rates = result_log.batch_win_rates(self.config.batch_width, self.config.num_batches);
        let stats = TrainingStats {
            episodes: result_log.len(),
            steps,
            elapsed_secs,
            episodes_per_second: if elapsed_secs > 0.0 {
                result_log.len() as f64 / elapsed_secs
            } else {
                0.0
            },
        };
        info!(
            "finished {} episodes in {:.2}s ({:.0} episodes/s), {} Q-values stored",
            stats.episodes,
            stats.elapsed_secs,
            stats.episodes_per_second,
            learner.q_table().size()
        );

        Ok(TrainingReport {
            algorithm: self.config.algorithm,
            win_rates,
            batches,
            totals: result_log.counts(),
            stats,
            result_log,
        })
    }
}

fn run_sarsa<L: ValuePolicy + ?Sized>(
    learner: &mut L,
    env: &mut Environment,
    tracker: &mut EpisodeTracker<'_>,
    target: usize,
) -> Result<usize> {
    let mut steps = 0;
    let mut state = env.state_address();
    let mut action = learner.choose_action(&env.view())?;

    while env.result_log().len() < target {
        let step = env.step(action)?;
        let next_state = encode_state(&step.board);

        // determine a'
        let next_action = learner.choose_action(&env.view())?;

        learner.q_table_mut().sarsa_update(
            state,
            action.address(),
            step.reward,
            next_state,
            next_action.address(),
        );

        state = next_state;
        action = next_action;
        steps += 1;
        tracker.sync(env.result_log())?;
    }
    Ok(steps)
}

fn run_q_learning<L: ValuePolicy + ?Sized>(
    learner: &mut L,
    env: &mut Environment,
    tracker: &mut EpisodeTracker<'_>,
    target: usize,
) -> Result<usize> {
    let mut steps = 0;
    let mut state = env.state_address();

    while env.result_log().len() < target {
        let action = learner.choose_action(&env.view())?;
        let step = env.step(action)?;
        let next_state = encode_state(&step.board);
        let next_actions: Vec<ActionAddress> =
            env.legal_actions().into_iter().map(Action::address).collect();

        learner.q_table_mut().q_learning_update(
            state,
            action.address(),
            step.reward,
            next_state,
            &next_actions,
        );

        state = next_state;
        steps += 1;
        tracker.sync(env.result_log())?;
    }
    Ok(steps)
}

fn run_entry_point(
    algorithm: TdAlgorithm,
    alpha: f64,
    policy: PolicyKind,
    batch_width: usize,
    num_batches: usize,
) -> Result<Vec<f64>> {
    let config = TrainingConfig::new(algorithm, alpha)
        .with_policy(policy)
        .with_batches(batch_width, num_batches);
    Ok(Trainer::new(config).run()?.report.win_rates)
}

/// Train with Sarsa (γ = 0.9) against the random opponent and return the
/// per-batch win rates
pub fn sarsa(
    alpha: f64,
    policy: PolicyKind,
    batch_width: usize,
    num_batches: usize,
) -> Result<Vec<f64>> {
    run_entry_point(TdAlgorithm::Sarsa, alpha, policy, batch_width, num_batches)
}

/// Train with Q-learning (γ = 0.9) against the random opponent and return
/// the per-batch win rates
pub fn qlearn(
    alpha: f64,
    policy: PolicyKind,
    batch_width: usize,
    num_batches: usize,
) -> Result<Vec<f64>> {
    run_entry_point(TdAlgorithm::QLearning, alpha, policy, batch_width, num_batches)
}

/// Play one episode of `policy` against `opponent` in a fresh environment
pub fn play_episode<P: Policy + ?Sized>(
    policy: &mut P,
    opponent: Box<dyn Policy>,
    trace: bool,
) -> Result<Outcome> {
    let mut env = Environment::new(opponent);
    env.set_trace(trace);
    loop {
        let action = policy.choose_action(&env.view())?;
        env.step(action)?;
        if let Some(outcome) = env.result_log().last() {
            return Ok(outcome);
        }
    }
}

/// Play `episodes` episodes without learning and tally the outcomes
pub fn evaluate_policy<P: Policy + ?Sized>(
    policy: &mut P,
    opponent: Box<dyn Policy>,
    episodes: usize,
) -> Result<OutcomeCounts> {
    let mut env = Environment::new(opponent);
    while env.result_log().len() < episodes {
        let action = policy.choose_action(&env.view())?;
        env.step(action)?;
    }
    Ok(env.result_log().counts())
}
