//! Greedy and ε-greedy value policies
//!
//! Both read the Q-table they own; the trainer writes back into it through
//! [`ValuePolicy::q_table_mut`].

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    ports::{Policy, ValuePolicy},
    q_learning::q_table::QTable,
    quarto::{Action, ActionAddress, EnvironmentView, decode_action},
};

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Greedy policy: highest Q-value, ties broken uniformly at random
#[derive(Debug, Clone)]
pub struct GreedyPolicy {
    q_table: QTable,
    rng: StdRng,
}

impl GreedyPolicy {
    pub fn new(q_table: QTable) -> Self {
        Self {
            q_table,
            rng: build_rng(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn into_q_table(self) -> QTable {
        self.q_table
    }

    /// Greedy choice over every legal (position, piece) pair
    fn select_greedy(&mut self, view: &EnvironmentView<'_>) -> Result<Action> {
        let state = view.state_address();
        let candidates: Vec<ActionAddress> = view
            .legal_actions()
            .into_iter()
            .map(Action::address)
            .collect();
        let best = self.q_table.best_actions(state, &candidates);
        let chosen = best.choose(&mut self.rng).ok_or(Error::NoLegalActions)?;
        decode_action(chosen.value())
    }
}

impl Default for GreedyPolicy {
    fn default() -> Self {
        Self::new(QTable::default())
    }
}

impl Policy for GreedyPolicy {
    fn choose_action(&mut self, view: &EnvironmentView<'_>) -> Result<Action> {
        self.select_greedy(view)
    }

    fn name(&self) -> &str {
        "Greedy"
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

impl ValuePolicy for GreedyPolicy {
    fn q_table(&self) -> &QTable {
        &self.q_table
    }

    fn q_table_mut(&mut self) -> &mut QTable {
        &mut self.q_table
    }
}

/// ε-greedy policy: a uniformly random legal action with probability ε,
/// the greedy action otherwise
#[derive(Debug, Clone)]
pub struct EpsilonGreedyPolicy {
    greedy: GreedyPolicy,
    epsilon: f64,
}

impl EpsilonGreedyPolicy {
    pub const DEFAULT_EPSILON: f64 = 0.1;

    pub fn new(q_table: QTable, epsilon: f64) -> Self {
        Self {
            greedy: GreedyPolicy::new(q_table),
            epsilon,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.greedy = self.greedy.with_seed(seed);
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn into_q_table(self) -> QTable {
        self.greedy.into_q_table()
    }
}

impl Policy for EpsilonGreedyPolicy {
    fn choose_action(&mut self, view: &EnvironmentView<'_>) -> Result<Action> {
        if self.greedy.rng.random::<f64>() < self.epsilon {
            // Explore: random position and random piece
            view.random_action(&mut self.greedy.rng)
        } else {
            self.greedy.select_greedy(view)
        }
    }

    fn name(&self) -> &str {
        "EpsilonGreedy"
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.greedy.set_rng_seed(seed)
    }
}

impl ValuePolicy for EpsilonGreedyPolicy {
    fn q_table(&self) -> &QTable {
        self.greedy.q_table()
    }

    fn q_table_mut(&mut self) -> &mut QTable {
        self.greedy.q_table_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quarto::{AvailablePieces, Board, Phase, Piece};

    fn view<'a>(board: &'a Board, available: &'a AvailablePieces) -> EnvironmentView<'a> {
        EnvironmentView {
            board,
            available,
            selected: Piece::FIRST,
            phase: Phase::AwaitingLearnerMove,
        }
    }

    #[test]
    fn test_greedy_picks_unique_maximum() {
        let board = Board::new();
        let available = AvailablePieces::initial();
        let target = Action::from_raw(5, 9).unwrap();

        let mut table = QTable::default();
        table.set(encode(&board), target.address(), 0.4);
        let mut policy = GreedyPolicy::new(table).with_seed(3);

        for _ in 0..20 {
            assert_eq!(policy.choose_action(&view(&board, &available)).unwrap(), target);
        }
    }

    #[test]
    fn test_greedy_avoids_negative_actions() {
        let board = Board::from_identities([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 0, 0])
            .unwrap();
        let mut available = AvailablePieces::initial();
        for identity in 2..=14 {
            available.remove(Piece::new(identity).unwrap());
        }
        // 2 positions x 2 pieces; penalize three of them
        let state = encode(&board);
        let mut table = QTable::default();
        for (position, piece) in [(14, 15), (14, 16), (15, 15)] {
            table.set(state, Action::from_raw(position, piece).unwrap().address(), -1.0);
        }
        let mut policy = GreedyPolicy::new(table).with_seed(11);
        let chosen = policy.choose_action(&view(&board, &available)).unwrap();
        assert_eq!(chosen, Action::from_raw(15, 16).unwrap());
    }

    #[test]
    fn test_epsilon_one_is_uniform_random_but_legal() {
        let mut cells = [0; 16];
        cells[0] = 1;
        let board = Board::from_identities(cells).unwrap();
        let mut available = AvailablePieces::initial();
        available.remove(Piece::new(2).unwrap());

        let mut policy = EpsilonGreedyPolicy::new(QTable::default(), 1.0).with_seed(5);
        for _ in 0..50 {
            let action = policy.choose_action(&view(&board, &available)).unwrap();
            assert_ne!(action.position, 0);
            assert!(available.contains(action.piece));
        }
    }

    #[test]
    fn test_epsilon_zero_matches_greedy() {
        let board = Board::new();
        let available = AvailablePieces::initial();
        let target = Action::from_raw(10, 3).unwrap();
        let mut table = QTable::default();
        table.set(encode(&board), target.address(), 2.0);

        let mut policy = EpsilonGreedyPolicy::new(table, 0.0).with_seed(1);
        assert_eq!(policy.choose_action(&view(&board, &available)).unwrap(), target);
    }

    #[test]
    fn test_empty_pool_has_no_actions() {
        let board = Board::new();
        let mut available = AvailablePieces::initial();
        for identity in 2..=16 {
            available.remove(Piece::new(identity).unwrap());
        }
        let mut policy = GreedyPolicy::default().with_seed(0);
        assert!(matches!(
            policy.choose_action(&view(&board, &available)),
            Err(Error::NoLegalActions)
        ));
    }

    fn encode(board: &Board) -> crate::quarto::StateAddress {
        crate::quarto::encode_state(board)
    }
}
