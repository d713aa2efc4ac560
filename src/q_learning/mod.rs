//! Tabular Q-learning and SARSA
//!
//! The Q-table maps `(state address, action address)` pairs to value
//! estimates. Value policies read it to pick moves; the trainer writes TD
//! updates back into it.
//!
//! | Aspect | Q-learning | SARSA |
//! |--------|------------|-------|
//! | Policy | Off-policy (learns Q*) | On-policy (learns Q^π) |
//! | Update | Uses max_a Q(s',a') | Uses actual Q(s',a') |
//!
//! ## Usage Example
//!
//! ```no_run
//! use quarto::q_learning::{EpsilonGreedyPolicy, GreedyPolicy, QTable};
//!
//! let greedy = GreedyPolicy::new(QTable::new(0.5, 0.9)).with_seed(7);
//! let explorer = EpsilonGreedyPolicy::new(QTable::new(0.05, 0.9), 0.1);
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::{EpsilonGreedyPolicy, GreedyPolicy};
pub use q_table::{DEFAULT_DISCOUNT, DEFAULT_LEARNING_RATE, QTable};
pub use serialization::{SavedQTable, TdAlgorithm, TrainingMetadata};
