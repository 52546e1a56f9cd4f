use rand::RngCore;

use crate::rng::StreamDeriver;
use crate::step::StepDistribution;
use crate::vector::Vector3;

/// Number of steps per particle in the reference configuration.
pub const DEFAULT_STEPS: u32 = 100;

/// A particle in flight: its position and its private stream.
#[derive(Clone, Debug)]
pub struct Particle<R> {
    pub position: Vector3,
    stream: R,
}

impl<R: RngCore> Particle<R> {
    /// Place a particle at the origin with the given stream.
    pub fn at_origin(stream: R) -> Self {
        Self {
            position: Vector3::zero(),
            stream,
        }
    }

    pub fn advance(&mut self, distribution: &StepDistribution) {
        self.position = distribution.step(&mut self.stream, self.position);
    }
}

/// Walk particle `particle_index` for `step_count` steps from the origin and
/// return its final displacement.
pub fn propagate<D: StreamDeriver>(
    deriver: &D,
    distribution: &StepDistribution,
    seed: i64,
    particle_index: u64,
    step_count: u32,
) -> Vector3 {
    let mut particle = Particle::at_origin(deriver.derive(seed, particle_index));
    for _ in 0..step_count {
        particle.advance(distribution);
    }
    particle.position
}
