//! Training and evaluation pipeline
//!
//! This module provides:
//! - The random baseline opponent
//! - Sarsa and Q-learning training loops driven by [`Trainer`]
//! - Evaluation of frozen policies
//! - Observers recording progress and learning curves

pub mod observers;
pub mod opponents;
pub mod training;

pub use observers::{CurveCsvObserver, CurveRecord, ProgressObserver, RANDOM_BASELINE_WIN_RATE};
pub use opponents::RandomPolicy;
pub use training::{
    PolicyKind, Trainer, TrainingConfig, TrainingReport, TrainingRun, TrainingStats,
    evaluate_policy, play_episode, qlearn, sarsa,
};

pub use crate::ports::{Observer, Policy, ValuePolicy};
