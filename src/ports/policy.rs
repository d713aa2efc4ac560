//! Policy port - abstraction over anything that can pick a Quarto move
//!
//! The learner's value-based policies, the random baseline and any
//! externally supplied opponent strategy all implement [`Policy`]. The
//! environment calls the opponent through this trait; the trainer drives the
//! learner through [`ValuePolicy`], which additionally exposes the Q-table
//! the policy reads from.

use crate::{
    Result,
    q_learning::QTable,
    quarto::{Action, EnvironmentView},
};

/// Policy trait - chooses a `(position, piece)` action for the side to move
///
/// # Examples
///
/// ```no_run
/// use quarto::{
///     ports::Policy,
///     quarto::{Action, EnvironmentView},
/// };
///
/// struct FirstFree;
///
/// impl Policy for FirstFree {
///     fn choose_action(&mut self, view: &EnvironmentView<'_>) -> quarto::Result<Action> {
///         view.legal_actions()
///             .into_iter()
///             .next()
///             .ok_or(quarto::Error::NoLegalActions)
///     }
///
///     fn name(&self) -> &str {
///         "first-free"
///     }
/// }
/// ```
pub trait Policy: Send {
    /// Select an action for the current state.
    ///
    /// Implementations are expected to return a legal action, but the
    /// environment does not rely on it: an illegal action forfeits the
    /// episode for the side that played it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoLegalActions`] if the state offers no
    /// position or no piece.
    fn choose_action(&mut self, view: &EnvironmentView<'_>) -> Result<Action>;

    /// Get the policy's name.
    ///
    /// Used for identification in logs and saved metadata.
    fn name(&self) -> &str;

    /// Seed the policy's internal random number generator.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for deterministic policies.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}

/// A policy whose choices are driven by a Q-table the trainer writes back to
pub trait ValuePolicy: Policy {
    fn q_table(&self) -> &QTable;

    fn q_table_mut(&mut self) -> &mut QTable;
}
