//! Episode outcomes and the append-only result log

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Outcome of one episode from the learner's perspective
///
/// Serialized as the integers +1, -1 and 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Outcome {
    /// Learner won, or the opponent forfeited with an illegal move
    LearnerWin,
    /// Opponent won, or the learner forfeited with an illegal move
    OpponentWin,
    Tie,
}

impl Outcome {
    pub fn value(self) -> i8 {
        match self {
            Outcome::LearnerWin => 1,
            Outcome::OpponentWin => -1,
            Outcome::Tie => 0,
        }
    }

    /// Outcome in favour of the side with the given sign (+1 learner, -1 opponent)
    pub(crate) fn win_for(sign: i8) -> Self {
        if sign > 0 {
            Outcome::LearnerWin
        } else {
            Outcome::OpponentWin
        }
    }

    /// Outcome against the side with the given sign
    pub(crate) fn loss_for(sign: i8) -> Self {
        Self::win_for(-sign)
    }
}

impl TryFrom<i8> for Outcome {
    type Error = Error;

    fn try_from(value: i8) -> Result<Self> {
        match value {
            1 => Ok(Outcome::LearnerWin),
            -1 => Ok(Outcome::OpponentWin),
            0 => Ok(Outcome::Tie),
            value => Err(Error::InvalidOutcome { value }),
        }
    }
}

impl From<Outcome> for i8 {
    fn from(outcome: Outcome) -> i8 {
        outcome.value()
    }
}

/// Win/tie/loss tally over a run of episodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub wins: usize,
    pub ties: usize,
    pub losses: usize,
}

impl OutcomeCounts {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a Outcome>) -> Self {
        let mut counts = Self::default();
        for &outcome in outcomes {
            counts.record(outcome);
        }
        counts
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::LearnerWin => self.wins += 1,
            Outcome::OpponentWin => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.wins + self.ties + self.losses
    }

    pub fn win_rate(&self) -> f64 {
        Self::rate(self.wins, self.total())
    }

    pub fn tie_rate(&self) -> f64 {
        Self::rate(self.ties, self.total())
    }

    pub fn loss_rate(&self) -> f64 {
        Self::rate(self.losses, self.total())
    }

    fn rate(count: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        }
    }
}

/// Append-only sequence of episode outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultLog {
    outcomes: Vec<Outcome>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn last(&self) -> Option<Outcome> {
        self.outcomes.last().copied()
    }

    pub fn as_slice(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn counts(&self) -> OutcomeCounts {
        OutcomeCounts::from_outcomes(&self.outcomes)
    }

    /// Tallies for consecutive batches of `batch_width` episodes.
    ///
    /// Batches past the end of the log are counted as empty.
    pub fn batch_counts(&self, batch_width: usize, num_batches: usize) -> Vec<OutcomeCounts> {
        (0..num_batches)
            .map(|i| {
                let start = (i * batch_width).min(self.outcomes.len());
                let end = ((i + 1) * batch_width).min(self.outcomes.len());
                OutcomeCounts::from_outcomes(&self.outcomes[start..end])
            })
            .collect()
    }

    /// Fraction of learner wins in each batch, relative to `batch_width`
    pub fn batch_win_rates(&self, batch_width: usize, num_batches: usize) -> Vec<f64> {
        self.batch_counts(batch_width, num_batches)
            .iter()
            .map(|counts| {
                if batch_width == 0 {
                    0.0
                } else {
                    counts.wins as f64 / batch_width as f64
                }
            })
            .collect()
    }

    /// Save the log as a JSON array of +1/-1/0
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("create result log {}", path.as_ref().display()),
            source,
        })?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("open result log {}", path.as_ref().display()),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

impl FromIterator<Outcome> for ResultLog {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}
