//! Quarto with tabular temporal-difference learners
//!
//! This crate provides:
//! - A complete Quarto environment with a built-in opponent and result log
//! - Injective state and action codecs for tabular value storage
//! - Sparse Q-tables with Sarsa and Q-learning updates
//! - Greedy and ε-greedy value policies plus a random baseline
//! - A training pipeline reporting per-batch win rates

pub mod cli;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod quarto;

pub use error::{Error, Result};
