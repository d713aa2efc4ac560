//! Observer port - abstraction for training observation
//!
//! Observers receive training events without the trainer knowing how they
//! are displayed or stored.
//!
//! # Event Sequence
//!
//! 1. `on_training_start(total_episodes)` - once
//! 2. `on_episode_end(episode, outcome)` - every time the result log grows
//! 3. `on_batch_end(batch, counts)` - every `batch_width` episodes
//! 4. `on_training_end()` - once

use crate::{
    Result,
    quarto::{Outcome, OutcomeCounts},
};

/// Observer trait for monitoring training
///
/// # Examples
///
/// ```no_run
/// use quarto::{ports::Observer, quarto::Outcome};
///
/// struct Counter {
///     episodes: usize,
/// }
///
/// impl Observer for Counter {
///     fn on_episode_end(&mut self, _episode: usize, _outcome: Outcome) -> quarto::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after an episode is appended to the result log.
    ///
    /// `episode` is the 0-based index of the new log entry.
    fn on_episode_end(&mut self, _episode: usize, _outcome: Outcome) -> Result<()> {
        Ok(())
    }

    /// Called when a batch of episodes is complete.
    fn on_batch_end(&mut self, _batch: usize, _counts: &OutcomeCounts) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
