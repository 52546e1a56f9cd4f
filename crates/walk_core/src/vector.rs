use std::ops::{Add, Div, Mul};

use serde::{Deserialize, Serialize};

/// Single precision position or displacement in three dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Multiply every component by `factor`.
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn norm_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn norm(self) -> f32 {
        self.norm_squared().sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

impl Div<f32> for Vector3 {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// Double precision accumulator for partial sums of [`Vector3`] values.
///
/// Conversion from [`Vector3`] is exact; conversion back rounds each
/// component once.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WideVector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WideVector3 {
    pub const fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    pub fn narrow(self) -> Vector3 {
        Vector3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl From<Vector3> for WideVector3 {
    fn from(value: Vector3) -> Self {
        Self {
            x: f64::from(value.x),
            y: f64::from(value.y),
            z: f64::from(value.z),
        }
    }
}

impl Add for WideVector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

/// Strategy producing finite vectors with components in `[-limit, limit]`.
#[cfg(any(test, feature = "proptest-support"))]
pub fn arb_vector3(limit: f32) -> impl proptest::strategy::Strategy<Value = Vector3> {
    use proptest::prelude::*;
    (-limit..=limit, -limit..=limit, -limit..=limit).prop_map(|(x, y, z)| Vector3::new(x, y, z))
}
