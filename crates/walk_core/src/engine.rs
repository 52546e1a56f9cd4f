//! Parallel fan-out of particles and reduction of their displacements.
//!
//! Particle indices are cut into fixed-size blocks. Each block is walked on
//! one worker and reduced into a double precision partial; the partials are
//! then reduced in block order. The shape of both reduction trees depends
//! only on `n` and `block_size`, never on the number of workers or on the
//! order in which blocks finish, so results are bit-identical across pool
//! widths.

use std::ops::Range;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::particle::propagate;
use crate::reduce::{partial_sum, reduce_wide};
use crate::rng::{ChaChaDeriver, Generator, SplitMixDeriver, StreamDeriver};
use crate::vector::{Vector3, WideVector3};

pub struct PropagationEngine {
    config: EngineConfig,
    pool: Option<ThreadPool>,
}

impl PropagationEngine {
    /// Validate `config` and start a dedicated pool when `workers > 0`.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let pool = if config.workers > 0 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(config.workers)
                    .thread_name(|index| format!("walk-worker-{index}"))
                    .build()?,
            )
        } else {
            None
        };
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of threads blocks are spread over.
    pub fn workers(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Final displacement of a single particle under this configuration.
    pub fn propagate_particle(&self, seed: i64, particle_index: u64) -> Vector3 {
        match self.config.generator {
            Generator::SplitMix => self.walk(&SplitMixDeriver, seed, particle_index),
            Generator::ChaCha => self.walk(&ChaChaDeriver, seed, particle_index),
        }
    }

    /// Sum of the final displacements of particles `0..n`.
    ///
    /// An empty or negative population yields the zero vector.
    pub fn run(&self, n: i64, seed: i64) -> Result<Vector3> {
        if n <= 0 {
            debug!(n, "empty population, nothing to propagate");
            return Ok(Vector3::zero());
        }
        let particles = n as u64;
        match self.config.generator {
            Generator::SplitMix => self.run_with(&SplitMixDeriver, particles, seed),
            Generator::ChaCha => self.run_with(&ChaChaDeriver, particles, seed),
        }
    }

    fn run_with<D: StreamDeriver>(&self, deriver: &D, particles: u64, seed: i64) -> Result<Vector3> {
        let block_size = self.config.block_size as u64;
        let block_count = usize::try_from(particles.div_ceil(block_size))
            .map_err(|_| Error::Allocation { particles })?;
        debug!(
            particles,
            seed,
            steps = self.config.steps,
            block_count,
            workers = self.workers(),
            "propagating population"
        );

        let fan_out = || -> Result<Vec<WideVector3>> {
            (0..block_count)
                .into_par_iter()
                .map(|block| {
                    let start = block as u64 * block_size;
                    let end = (start + block_size).min(particles);
                    self.block_partial(deriver, seed, start..end)
                })
                .collect()
        };
        let partials = match &self.pool {
            Some(pool) => pool.install(fan_out),
            None => fan_out(),
        }?;

        Ok(reduce_wide(&partials).narrow())
    }

    fn block_partial<D: StreamDeriver>(
        &self,
        deriver: &D,
        seed: i64,
        indices: Range<u64>,
    ) -> Result<WideVector3> {
        let len = indices.end - indices.start;
        let mut finals = Vec::new();
        finals
            .try_reserve_exact(len as usize)
            .map_err(|_| Error::Allocation { particles: len })?;
        let first = indices.start;
        finals.extend(indices.map(|index| self.walk(deriver, seed, index)));
        trace!(first, len, "block propagated");
        Ok(partial_sum(&finals))
    }

    #[inline]
    fn walk<D: StreamDeriver>(&self, deriver: &D, seed: i64, particle_index: u64) -> Vector3 {
        propagate(
            deriver,
            &self.config.distribution,
            seed,
            particle_index,
            self.config.steps,
        )
    }
}
