//! Serialization support for trained Q-tables.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{
    q_learning::q_table::QTable,
    quarto::{ActionAddress, StateAddress},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TdAlgorithm {
    QLearning,
    Sarsa,
}

impl TdAlgorithm {
    pub fn label(self) -> &'static str {
        match self {
            TdAlgorithm::QLearning => "Q-learning",
            TdAlgorithm::Sarsa => "Sarsa",
        }
    }
}

/// Provenance of a saved table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub policy: String,
    pub episodes: usize,
    pub final_win_rate: Option<f64>,
    pub seed: Option<u64>,
}

/// One stored Q-value; the state address is split into two 64-bit words
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SavedEntry {
    state: [u64; 2],
    action: u8,
    value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedQTable {
    pub version: u32,
    pub algorithm: TdAlgorithm,
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub metadata: TrainingMetadata,
    entries: Vec<SavedEntry>,
}

impl SavedQTable {
    pub const VERSION: u32 = 1;

    pub fn from_q_table(table: &QTable, algorithm: TdAlgorithm, metadata: TrainingMetadata) -> Self {
        let mut entries: Vec<SavedEntry> = table
            .iter()
            .map(|(state, action, value)| SavedEntry {
                state: state.to_parts(),
                action: action.value() as u8,
                value,
            })
            .collect();
        entries.sort_by_key(|entry| (entry.state, entry.action));

        Self {
            version: Self::VERSION,
            algorithm,
            learning_rate: table.learning_rate(),
            discount_factor: table.discount_factor(),
            metadata,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_q_table(&self) -> Result<QTable> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported Q-table save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }

        let mut table = QTable::new(self.learning_rate, self.discount_factor);
        for entry in &self.entries {
            let action = ActionAddress::new(usize::from(entry.action))?;
            table.set(StateAddress::from_parts(entry.state), action, entry.value);
        }
        Ok(table)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize Q-table")?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize Q-table")
    }
}
