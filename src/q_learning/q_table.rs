//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use crate::quarto::{ActionAddress, StateAddress};

/// Default discount factor γ
pub const DEFAULT_DISCOUNT: f64 = 0.9;

/// Default learning rate α
pub const DEFAULT_LEARNING_RATE: f64 = 0.5;

/// Sparse Q-table mapping (state, action) addresses to Q-values
///
/// Logically covers 17^16 states x 256 actions; only written entries are
/// stored and every other pair reads as 0.0.
#[derive(Debug, Clone)]
pub struct QTable {
    /// Q-values: (state address, action address) -> Q-value
    q_values: HashMap<(StateAddress, ActionAddress), f64>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a new Q-table
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            discount_factor,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: StateAddress, action: ActionAddress) -> f64 {
        self.q_values.get(&(state, action)).copied().unwrap_or(0.0)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateAddress, action: ActionAddress, value: f64) {
        self.q_values.insert((state, action), value);
    }

    /// Get maximum Q-value over the candidate actions in a state
    ///
    /// Returns negative infinity when `candidates` is empty.
    pub fn max_over(&self, state: StateAddress, candidates: &[ActionAddress]) -> f64 {
        candidates
            .iter()
            .map(|&action| self.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// All candidates attaining the maximum Q-value, in candidate order
    pub fn best_actions(
        &self,
        state: StateAddress,
        candidates: &[ActionAddress],
    ) -> Vec<ActionAddress> {
        let best = self.max_over(state, candidates);
        candidates
            .iter()
            .copied()
            .filter(|&action| self.get(state, action) == best)
            .collect()
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    pub fn q_learning_update(
        &mut self,
        state: StateAddress,
        action: ActionAddress,
        reward: f64,
        next_state: StateAddress,
        next_actions: &[ActionAddress],
    ) {
        let max_next_q = if next_actions.is_empty() {
            0.0
        } else {
            self.max_over(next_state, next_actions)
        };
        self.apply_target(state, action, reward + self.discount_factor * max_next_q);
    }

    /// SARSA update: on-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ Q(s',a') - Q(s,a)]
    pub fn sarsa_update(
        &mut self,
        state: StateAddress,
        action: ActionAddress,
        reward: f64,
        next_state: StateAddress,
        next_action: ActionAddress,
    ) {
        let next_q = self.get(next_state, next_action);
        self.apply_target(state, action, reward + self.discount_factor * next_q);
    }

    fn apply_target(&mut self, state: StateAddress, action: ActionAddress, td_target: f64) {
        let current_q = self.get(state, action);
        let td_error = td_target - current_q;
        self.set(state, action, current_q + self.learning_rate * td_error);
    }

    /// Iterate over stored entries
    pub fn iter(&self) -> impl Iterator<Item = (StateAddress, ActionAddress, f64)> + '_ {
        self.q_values
            .iter()
            .map(|(&(state, action), &value)| (state, action, value))
    }

    /// Reset all Q-values
    pub fn reset(&mut self) {
        self.q_values.clear();
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.len()
    }
}

impl Default for QTable {
    fn default() -> Self {
        Self::new(DEFAULT_LEARNING_RATE, DEFAULT_DISCOUNT)
    }
}
