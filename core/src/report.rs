//! Rendering of benchmark outcomes.
//!
//! The text form is the stable line-per-variant format
//! (`function: <label> | time: <us> microseconds`), written in two halves so
//! the label is visible while a long run is still in progress. The JSON form
//! collects the whole suite into one [`SuiteReport`].

use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::bench::{BenchConfig, BenchOutcome};

pub fn write_prefix<W: Write + ?Sized>(out: &mut W, label: &str) -> io::Result<()> {
    write!(out, "function: {}", label)?;
    out.flush()
}

pub fn write_outcome<W: Write + ?Sized>(out: &mut W, outcome: &BenchOutcome) -> io::Result<()> {
    match outcome.mean_micros() {
        Some(mean_us) => writeln!(out, " | time: {:.3} microseconds", mean_us),
        None => writeln!(out, " | wrong output"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VariantStatus {
    Ok { mean_us: f64 },
    WrongOutput { round: u32, offset: usize },
}

impl From<&BenchOutcome> for VariantStatus {
    fn from(outcome: &BenchOutcome) -> Self {
        match *outcome {
            BenchOutcome::Passed { .. } => VariantStatus::Ok {
                mean_us: outcome.mean_micros().unwrap_or_default(),
            },
            BenchOutcome::Mismatch { round, offset } => VariantStatus::WrongOutput { round, offset },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantResult {
    pub function: String,
    #[serde(flatten)]
    pub status: VariantStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    generated_at: String,
    seed: u64,
    rounds: u32,
    length: usize,
    results: Vec<VariantResult>,
}

impl SuiteReport {
    pub fn new(seed: u64, config: &BenchConfig, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            seed,
            rounds: config.rounds(),
            length: config.length(),
            results: Vec::new(),
        }
    }

    pub fn record(&mut self, label: &str, outcome: &BenchOutcome) {
        self.results.push(VariantResult {
            function: label.to_string(),
            status: outcome.into(),
        });
    }

    pub fn results(&self) -> &[VariantResult] {
        &self.results
    }

    pub fn has_mismatch(&self) -> bool {
        self.results
            .iter()
            .any(|r| matches!(r.status, VariantStatus::WrongOutput { .. }))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize benchmark report")
    }
}
