use std::hint::black_box;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use rand::Rng;
use tracing::{debug, trace, warn};

use crate::generate::fill_random;
use crate::variant::Transform;

const TRACE_TARGET: &str = "upcase::bench";

/// Validated round count and string length shared by every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    rounds: u32,
    length: usize,
}

impl BenchConfig {
    pub fn new(rounds: u32, length: usize) -> Result<Self> {
        if rounds == 0 {
            bail!("N must be a non-zero positive integer.");
        }
        if length == 0 {
            bail!("L must be a non-zero positive integer.");
        }
        Ok(Self { rounds, length })
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchOutcome {
    /// Every round matched the oracle; `total` covers only the variant calls.
    Passed { total: Duration, rounds: u32 },
    /// First disagreement with the oracle. Later rounds were not run.
    Mismatch { round: u32, offset: usize },
}

impl BenchOutcome {
    /// Mean time per call in microseconds, if the variant passed.
    pub fn mean_micros(&self) -> Option<f64> {
        match self {
            BenchOutcome::Passed { total, rounds } => Some(total.as_nanos() as f64 / 1_000.0 / f64::from(*rounds)),
            BenchOutcome::Mismatch { .. } => None,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, BenchOutcome::Mismatch { .. })
    }
}

/// Time `transform` over `config.rounds()` freshly generated strings,
/// checking each output against `make_ascii_uppercase`.
///
/// Returns on the first mismatch without running the remaining rounds.
pub fn run_benchmark<T, R>(transform: &T, config: &BenchConfig, rng: &mut R) -> BenchOutcome
where
    T: Transform + ?Sized,
    R: Rng + ?Sized,
{
    let label = transform.label();
    debug!(target: TRACE_TARGET, label, rounds = config.rounds, length = config.length, "benchmark start");

    let mut input = vec![0u8; config.length];
    let mut output = vec![0u8; config.length];
    let mut expected = vec![0u8; config.length];

    let mut total = Duration::ZERO;
    for round in 0..config.rounds {
        fill_random(&mut input, rng);

        output.copy_from_slice(&input);
        let started = Instant::now();
        transform.apply(black_box(output.as_mut_slice()));
        let elapsed = started.elapsed();
        total += elapsed;
        trace!(target: TRACE_TARGET, label, round, elapsed_ns = elapsed.as_nanos() as u64, "round");

        expected.copy_from_slice(&input);
        expected.make_ascii_uppercase();
        if output != expected {
            let offset = first_difference(&output, &expected);
            warn!(target: TRACE_TARGET, label, round, offset, "output differs from reference");
            return BenchOutcome::Mismatch { round, offset };
        }
    }

    let outcome = BenchOutcome::Passed {
        total,
        rounds: config.rounds,
    };
    debug!(
        target: TRACE_TARGET,
        label,
        total_ns = total.as_nanos() as u64,
        mean_us = outcome.mean_micros().unwrap_or_default(),
        "benchmark done"
    );
    outcome
}

/// Benchmark each transform in order with one shared RNG, handing every
/// outcome to `on_result` as soon as it is known. A mismatch in one
/// transform does not stop the others.
pub fn run_suite<'a, T, R, F>(transforms: &'a [T], config: &BenchConfig, rng: &mut R, mut on_result: F) -> Result<()>
where
    T: Transform,
    R: Rng + ?Sized,
    F: FnMut(Stage<'a, T>) -> Result<()>,
{
    for transform in transforms {
        on_result(Stage::Started(transform))?;
        let outcome = run_benchmark(transform, config, rng);
        on_result(Stage::Finished(transform, outcome))?;
    }
    Ok(())
}

/// Progress notifications emitted by [`run_suite`].
#[derive(Debug)]
pub enum Stage<'a, T> {
    Started(&'a T),
    Finished(&'a T, BenchOutcome),
}

fn first_difference(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).position(|(x, y)| x != y).unwrap_or_else(|| a.len().min(b.len()))
}
