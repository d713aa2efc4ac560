//! Observer implementations for training runs
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{fs::File, io::BufWriter, path::Path};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::Observer,
    quarto::{Outcome, OutcomeCounts},
};

/// Win rate of a random-vs-random baseline, drawn alongside learning curves
pub const RANDOM_BASELINE_WIN_RATE: f64 = 0.475;

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    counts: OutcomeCounts,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            counts: OutcomeCounts::default(),
        }
    }

    fn message(&self) -> String {
        format!(
            "{} T:{} L:{}",
            self.counts.wins, self.counts.ties, self.counts.losses
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (W:{msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, outcome: Outcome) -> Result<()> {
        self.counts.record(outcome);
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// One row of a learning-curve export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveRecord {
    pub batch: usize,
    pub win_rate: f64,
    pub tie_rate: f64,
    pub loss_rate: f64,
    pub baseline: f64,
    pub label: String,
}

/// Learning-curve observer - Writes one CSV row per completed batch
pub struct CurveCsvObserver {
    writer: csv::Writer<BufWriter<File>>,
    label: String,
}

impl CurveCsvObserver {
    /// Create a new curve observer writing to `path`
    pub fn new<P: AsRef<Path>>(path: P, label: impl Into<String>) -> Result<Self> {
        let file = File::create(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("create curve file {}", path.as_ref().display()),
            source,
        })?;
        Ok(Self {
            writer: csv::Writer::from_writer(BufWriter::new(file)),
            label: label.into(),
        })
    }
}

impl Observer for CurveCsvObserver {
    fn on_batch_end(&mut self, batch: usize, counts: &OutcomeCounts) -> Result<()> {
        self.writer.serialize(CurveRecord {
            batch,
            win_rate: counts.win_rate(),
            tie_rate: counts.tie_rate(),
            loss_rate: counts.loss_rate(),
            baseline: RANDOM_BASELINE_WIN_RATE,
            label: self.label.clone(),
        })?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
