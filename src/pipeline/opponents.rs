//! Baseline opponent policies

use rand::{SeedableRng, random, rngs::StdRng};

use crate::{
    Result,
    ports::Policy,
    quarto::{Action, EnvironmentView},
};

/// Random policy - uniformly random empty cell and, independently, a
/// uniformly random available piece
pub struct RandomPolicy {
    name: String,
    rng: StdRng,
}

impl RandomPolicy {
    /// Create a new random policy
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create a new random policy with a deterministic seed
    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new("Random")
    }
}

impl Policy for RandomPolicy {
    fn choose_action(&mut self, view: &EnvironmentView<'_>) -> Result<Action> {
        view.random_action(&mut self.rng)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
