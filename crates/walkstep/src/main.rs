use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use walk_core::rng::Generator;
use walk_core::step::StepDistribution;
use walk_core::{EngineConfig, PropagationEngine, Summary, DEFAULT_PARTICLES, DEFAULT_SEED};

#[derive(Parser, Debug)]
#[command(
    name = "walkstep",
    about = "Parallel random-walk propagation benchmark",
    allow_negative_numbers = true
)]
struct Args {
    /// Number of particles to propagate.
    #[arg(value_name = "N", default_value_t = DEFAULT_PARTICLES, value_parser = parse_leading_int)]
    particles: i64,

    /// Global random seed.
    #[arg(value_name = "SEED", default_value_t = DEFAULT_SEED, value_parser = parse_leading_int)]
    seed: i64,

    /// Path to an engine config JSON document. Flags override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Steps per particle.
    #[arg(long)]
    steps: Option<u32>,

    /// Worker threads (0 uses every available core).
    #[arg(long = "threads", value_name = "COUNT")]
    threads: Option<usize>,

    /// Particles handled per parallel task.
    #[arg(long = "block-size", value_name = "COUNT")]
    block_size: Option<usize>,

    #[arg(long, value_enum)]
    generator: Option<GeneratorArg>,

    #[arg(long, value_enum)]
    distribution: Option<DistributionArg>,

    /// Cube half-width or sphere step length, depending on the distribution.
    #[arg(long = "step-scale", value_name = "LENGTH")]
    step_scale: Option<f32>,

    /// Print the summary as a JSON object.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GeneratorArg {
    Splitmix,
    Chacha,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DistributionArg {
    Cube,
    Sphere,
}

/// Read the leading integer of `raw` the way C's `atoi` does: optional
/// whitespace and sign, then digits. Anything else reads as 0.
fn parse_leading_int(raw: &str) -> Result<i64, String> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
    }
    Ok(if negative { -value } else { value })
}

fn build_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from_path(path)
            .with_context(|| format!("failed to load config {:?}", path))?,
        None => EngineConfig::default(),
    };

    if let Some(steps) = args.steps {
        config.steps = steps;
    }
    if let Some(threads) = args.threads {
        config.workers = threads;
    }
    if let Some(block_size) = args.block_size {
        config.block_size = block_size;
    }
    if let Some(generator) = args.generator {
        config.generator = match generator {
            GeneratorArg::Splitmix => Generator::SplitMix,
            GeneratorArg::Chacha => Generator::ChaCha,
        };
    }
    if let Some(distribution) = args.distribution {
        let scale = config.distribution.scale();
        config.distribution = match distribution {
            DistributionArg::Cube => StepDistribution::UniformCube { half_width: scale },
            DistributionArg::Sphere => StepDistribution::UnitSphere { step_length: scale },
        };
    }
    if let Some(scale) = args.step_scale {
        config.distribution = config.distribution.with_scale(scale);
    }

    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let steps = config.steps;
    let engine = PropagationEngine::new(config).context("failed to start propagation engine")?;

    let started = Instant::now();
    let total = engine
        .run(args.particles, args.seed)
        .with_context(|| format!("failed to propagate {} particles", args.particles))?;
    let elapsed = started.elapsed();

    let particle_steps = args.particles.max(0) as f64 * f64::from(steps);
    info!(
        elapsed_ms = elapsed.as_millis() as u64,
        workers = engine.workers(),
        steps_per_sec = particle_steps / elapsed.as_secs_f64().max(f64::EPSILON),
        "propagation finished"
    );

    let summary = Summary::new(args.particles, steps, total);
    if args.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!("{summary}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn positional_arguments_default() {
        let args = Args::try_parse_from(["walkstep"]).unwrap();
        assert_eq!(args.particles, 1_000_000);
        assert_eq!(args.seed, 0);
        assert!(!args.json);
    }

    #[test]
    fn malformed_numbers_read_like_atoi() {
        let args = Args::try_parse_from(["walkstep", "12abc", "oops"]).unwrap();
        assert_eq!(args.particles, 12);
        assert_eq!(args.seed, 0);

        let args = Args::try_parse_from(["walkstep", "  +7", "-42"]).unwrap();
        assert_eq!(args.particles, 7);
        assert_eq!(args.seed, -42);
    }

    #[test]
    fn leading_int_saturates() {
        assert_eq!(parse_leading_int("99999999999999999999999"), Ok(i64::MAX));
        assert_eq!(parse_leading_int(""), Ok(0));
        assert_eq!(parse_leading_int("-"), Ok(0));
    }

    #[test]
    fn rejects_unknown_generator() {
        let err = Args::try_parse_from(["walkstep", "--generator", "mersenne"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "walkstep",
            "1000",
            "42",
            "--steps",
            "10",
            "--threads",
            "2",
            "--generator",
            "chacha",
            "--distribution",
            "sphere",
            "--step-scale",
            "0.5",
        ])
        .unwrap();
        let config = build_config(&args).unwrap();
        assert_eq!(config.steps, 10);
        assert_eq!(config.workers, 2);
        assert_eq!(config.generator, Generator::ChaCha);
        assert_eq!(
            config.distribution,
            StepDistribution::UnitSphere { step_length: 0.5 }
        );
    }

    #[test]
    fn missing_config_file_is_reported() {
        let args =
            Args::try_parse_from(["walkstep", "--config", "/nonexistent/walk.json"]).unwrap();
        let err = build_config(&args).unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }

    #[test]
    fn paired_runs_print_identical_summaries() {
        let run_once = |threads: usize| {
            let threads = threads.to_string();
            let args = Args::try_parse_from([
                "walkstep",
                "2000",
                "42",
                "--threads",
                threads.as_str(),
                "--block-size",
                "256",
            ])
            .unwrap();
            let config = build_config(&args).unwrap();
            let steps = config.steps;
            let engine = PropagationEngine::new(config).unwrap();
            let total = engine.run(args.particles, args.seed).unwrap();
            Summary::new(args.particles, steps, total).to_string()
        };
        assert_eq!(run_once(1), run_once(4));
    }
}
