use std::fmt;

use serde::Serialize;

use crate::vector::Vector3;

/// Averaged view of a run's aggregate displacement.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub particles: i64,
    pub steps: u32,
    pub total: Vector3,
    pub average: Vector3,
    pub average_norm: f32,
}

impl Summary {
    /// Average `total` over `particles`. A non-positive population reports a
    /// zero average rather than dividing by zero.
    pub fn new(particles: i64, steps: u32, total: Vector3) -> Self {
        let average = if particles > 0 {
            total / particles as f32
        } else {
            Vector3::zero()
        };
        Self {
            particles,
            steps,
            total,
            average,
            average_norm: average.norm(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Moved {} particles {} steps. Average distance traveled is |({:.6}, {:.6}, {:.6})| = {:.6}",
            self.particles,
            self.steps,
            self.average.x,
            self.average.y,
            self.average.z,
            self.average_norm
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_and_formats() {
        let summary = Summary::new(4, 100, Vector3::new(8.0, 12.0, 24.0));
        assert_eq!(summary.average, Vector3::new(2.0, 3.0, 6.0));
        assert_eq!(summary.average_norm, 7.0);
        assert_eq!(
            summary.to_string(),
            "Moved 4 particles 100 steps. Average distance traveled is \
             |(2.000000, 3.000000, 6.000000)| = 7.000000"
        );
    }

    #[test]
    fn empty_population_reports_zero() {
        let summary = Summary::new(0, 100, Vector3::zero());
        assert_eq!(summary.average, Vector3::zero());
        assert_eq!(summary.average_norm, 0.0);
        assert!(!summary.to_string().contains("NaN"));
    }

    #[test]
    fn serializes_flat_fields() {
        let value = serde_json::to_value(Summary::new(2, 10, Vector3::new(1.0, 0.0, 0.0))).unwrap();
        assert_eq!(value["particles"], 2);
        assert_eq!(value["steps"], 10);
        assert_eq!(value["average"]["x"], 0.5);
    }
}
