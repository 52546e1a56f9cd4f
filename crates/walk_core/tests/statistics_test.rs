use walk_core::config::EngineConfig;
use walk_core::engine::PropagationEngine;
use walk_core::step::StepDistribution;

fn engine_for(distribution: StepDistribution) -> PropagationEngine {
    PropagationEngine::new(EngineConfig {
        distribution,
        ..EngineConfig::default()
    })
    .expect("engine builds")
}

#[test]
fn mean_squared_displacement_matches_step_distribution() {
    let particles = 4_000u64;
    for distribution in [
        StepDistribution::UniformCube { half_width: 1.0 },
        StepDistribution::UnitSphere { step_length: 1.0 },
    ] {
        let engine = engine_for(distribution);
        let expected = f64::from(engine.config().steps) * distribution.mean_squared_step();
        let observed = (0..particles)
            .map(|index| f64::from(engine.propagate_particle(11, index).norm_squared()))
            .sum::<f64>()
            / particles as f64;
        assert!(
            (observed - expected).abs() < expected * 0.1,
            "{distribution:?}: observed {observed}, expected {expected}"
        );
    }
}

#[test]
fn average_displacement_shrinks_with_population() {
    let distribution = StepDistribution::default();
    let engine = engine_for(distribution);
    let per_particle = f64::from(engine.config().steps) * distribution.mean_squared_step();
    for n in [1_000i64, 10_000, 50_000] {
        let total = engine.run(n, 2024).unwrap();
        let average = f64::from(total.norm()) / n as f64;
        let bound = 6.0 * (per_particle / n as f64).sqrt();
        assert!(
            average < bound,
            "n={n}: |total|/n = {average} exceeds {bound}"
        );
    }
}

#[test]
fn average_displacement_settles_as_population_grows() {
    let engine = engine_for(StepDistribution::default());
    let seeds = 8;
    let mean_average = |n: i64| {
        (0..seeds)
            .map(|seed| f64::from(engine.run(n, seed).unwrap().norm()) / n as f64)
            .sum::<f64>()
            / seeds as f64
    };

    // Quadrupling the population halves the expected |total|/n.
    let means: Vec<f64> = [500i64, 2_000, 8_000].into_iter().map(mean_average).collect();
    for pair in means.windows(2) {
        assert!(
            pair[1] < 0.8 * pair[0],
            "average did not settle: {:?}",
            means
        );
    }
}

#[test]
fn axes_are_balanced() {
    let engine = engine_for(StepDistribution::UnitSphere { step_length: 1.0 });
    let particles = 3_000u64;
    let mut sums = [0.0f64; 3];
    for index in 0..particles {
        let end = engine.propagate_particle(5, index);
        sums[0] += f64::from(end.x * end.x);
        sums[1] += f64::from(end.y * end.y);
        sums[2] += f64::from(end.z * end.z);
    }
    // Each axis carries a third of the squared displacement.
    let expected = 100.0 / 3.0;
    for sum in sums {
        let mean = sum / particles as f64;
        assert!((mean - expected).abs() < expected * 0.15, "axis mean {mean}");
    }
}
