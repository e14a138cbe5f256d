//! Core of `upcase-bench`: three ASCII uppercase strategies, a seeded random
//! input generator, and the timing driver that checks every variant against
//! the standard library before trusting its numbers.

pub mod bench;
pub mod generate;
pub mod report;
pub mod variant;

pub use bench::{BenchConfig, BenchOutcome, Stage, run_benchmark, run_suite};
pub use generate::{ALPHABET, fill_random, random_string};
pub use report::{SuiteReport, VariantResult, VariantStatus};
pub use variant::{Transform, Variant};
