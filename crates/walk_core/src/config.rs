use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::particle::DEFAULT_STEPS;
use crate::rng::Generator;
use crate::step::StepDistribution;

/// Particles per block in the default configuration.
pub const DEFAULT_BLOCK_SIZE: usize = 4_096;

/// Tunables for a propagation run.
///
/// `steps`, `generator` and `distribution` change the numbers a run
/// produces. `workers` and `block_size` only change how the work is laid
/// out; `workers` never affects the result bits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub steps: u32,
    /// Worker threads; `0` uses rayon's default width.
    pub workers: usize,
    pub block_size: usize,
    pub generator: Generator,
    pub distribution: StepDistribution,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            workers: 0,
            block_size: DEFAULT_BLOCK_SIZE,
            generator: Generator::default(),
            distribution: StepDistribution::default(),
        }
    }
}

impl EngineConfig {
    /// Load a config JSON document from disk.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Deserialize a config document from an arbitrary reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(Error::InvalidConfig("block_size must be > 0".into()));
        }
        self.distribution.validate()
    }
}
