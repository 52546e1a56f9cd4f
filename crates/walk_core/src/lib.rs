pub mod config;
pub mod engine;
pub mod error;
pub mod particle;
pub mod reduce;
pub mod report;
pub mod rng;
pub mod step;
pub mod vector;

pub use config::EngineConfig;
pub use engine::PropagationEngine;
pub use error::{Error, Result};
pub use report::Summary;
pub use vector::Vector3;

/// Population size used when none is given.
pub const DEFAULT_PARTICLES: i64 = 1_000_000;

/// Seed used when none is given.
pub const DEFAULT_SEED: i64 = 0;

/// Walk `n` particles for the default number of steps and return the sum of
/// their final displacements.
///
/// Uses [`EngineConfig::default`] on rayon's global pool. Build a
/// [`PropagationEngine`] directly to change the step count, generator,
/// distribution or pool width.
pub fn propagate(n: i64, seed: i64) -> Result<Vector3> {
    PropagationEngine::new(EngineConfig::default())?.run(n, seed)
}
