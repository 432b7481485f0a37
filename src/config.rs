//! Configuration for batch experiments.

use crate::error::{Error, Result};
use crate::player::Opening;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for the sweep batch.
///
/// Every field has a default, so a TOML file only needs the values it
/// changes:
///
/// ```
/// use ttt_minimax::config::ExperimentConfig;
///
/// let config: ExperimentConfig = toml::from_str("trial_counts = [20]\nseed = 7").unwrap();
/// assert_eq!(config.trial_counts, vec![20]);
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.probability_steps, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Trials per round; each count produces its own pair of charts.
    pub trial_counts: Vec<usize>,
    /// Number of intervals between probability 0 and 1.
    pub probability_steps: usize,
    /// Probability of the subject moving first in the first-move sweep.
    pub first_move_probability: f64,
    /// Subject opening used by the probability sweep.
    pub opening: Opening,
    /// Seed for reproducible runs; `None` draws from the thread RNG.
    pub seed: Option<u64>,
    /// Spread trials of a round across threads.
    pub parallel: bool,
    /// Directory for JSON chart files; `None` prints tables only.
    pub output_dir: Option<PathBuf>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            trial_counts: vec![50, 100, 1000],
            probability_steps: 10,
            first_move_probability: 1.0,
            opening: Opening::Random,
            seed: None,
            parallel: true,
            output_dir: None,
        }
    }
}

impl ExperimentConfig {
    /// Loads a TOML file and validates it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("read config {}", path.display()), e))?;
        let config: ExperimentConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_trial_counts(mut self, trial_counts: Vec<usize>) -> Self {
        self.trial_counts = trial_counts;
        self
    }

    pub fn with_probability_steps(mut self, steps: usize) -> Self {
        self.probability_steps = steps;
        self
    }

    pub fn with_first_move_probability(mut self, probability: f64) -> Self {
        self.first_move_probability = probability;
        self
    }

    pub fn with_opening(mut self, opening: Opening) -> Self {
        self.opening = opening;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.trial_counts.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "trial_counts must not be empty".to_string(),
            });
        }
        if self.probability_steps == 0 {
            return Err(Error::InvalidConfiguration {
                message: "probability_steps must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.first_move_probability) {
            return Err(Error::InvalidProbability {
                value: self.first_move_probability,
            });
        }
        Ok(())
    }
}
