//! Single random step applied to a particle position.

use rand::{Rng, RngCore};
use rand_distr::{Distribution, UnitSphere};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vector::Vector3;

/// Largest accepted cube half-width or sphere step length. Keeps a 100-step
/// walk, and the sum over a large population, well inside `f32` range.
pub const MAX_STEP_SCALE: f32 = 1.0e6;

/// Distribution of one step's displacement.
///
/// The choice is fixed per deployment: it changes both the numbers a run
/// produces and the tolerances its statistics are checked against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepDistribution {
    /// Each component independently uniform on `[-half_width, half_width)`.
    UniformCube { half_width: f32 },
    /// Direction uniform on the unit sphere, scaled to `step_length`.
    UnitSphere { step_length: f32 },
}

impl Default for StepDistribution {
    fn default() -> Self {
        StepDistribution::UniformCube { half_width: 1.0 }
    }
}

impl StepDistribution {
    /// Expected squared length of one displacement.
    pub fn mean_squared_step(&self) -> f64 {
        match *self {
            StepDistribution::UniformCube { half_width } => f64::from(half_width).powi(2),
            StepDistribution::UnitSphere { step_length } => f64::from(step_length).powi(2),
        }
    }

    pub fn scale(&self) -> f32 {
        match *self {
            StepDistribution::UniformCube { half_width } => half_width,
            StepDistribution::UnitSphere { step_length } => step_length,
        }
    }

    pub fn with_scale(&self, scale: f32) -> Self {
        match self {
            StepDistribution::UniformCube { .. } => {
                StepDistribution::UniformCube { half_width: scale }
            }
            StepDistribution::UnitSphere { .. } => {
                StepDistribution::UnitSphere { step_length: scale }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let scale = self.scale();
        if !scale.is_finite() || scale <= 0.0 || scale > MAX_STEP_SCALE {
            return Err(Error::InvalidConfig(format!(
                "step scale must be in (0, {MAX_STEP_SCALE}], got {scale}"
            )));
        }
        Ok(())
    }

    /// Draw one displacement from `rng`.
    pub fn sample<R: RngCore>(&self, rng: &mut R) -> Vector3 {
        match *self {
            StepDistribution::UniformCube { half_width } => Vector3::new(
                centered(rng, half_width),
                centered(rng, half_width),
                centered(rng, half_width),
            ),
            StepDistribution::UnitSphere { step_length } => {
                let [x, y, z]: [f64; 3] = UnitSphere.sample(rng);
                Vector3::new(x as f32, y as f32, z as f32) * step_length
            }
        }
    }

    /// Apply one step in place on the stream and return the new position.
    #[inline]
    pub fn step<R: RngCore>(&self, rng: &mut R, position: Vector3) -> Vector3 {
        position + self.sample(rng)
    }

    /// Consume `stream`, apply one step and hand back the advanced stream.
    pub fn advance<R: RngCore>(&self, mut stream: R, position: Vector3) -> (Vector3, R) {
        let next = self.step(&mut stream, position);
        (next, stream)
    }
}

/// Uniform sample on `[-half_width, half_width)` from one 24-bit draw.
#[inline]
fn centered<R: RngCore>(rng: &mut R, half_width: f32) -> f32 {
    let unit: f32 = rng.gen();
    half_width * (2.0 * unit - 1.0)
}
