use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

const CASE_DIFF: u8 = b'a' - b'A';

/// Uniform call contract for anything the benchmark driver can time.
pub trait Transform {
    fn label(&self) -> &str;

    /// Uppercase `buf` in place. Must not change its length.
    fn apply(&self, buf: &mut [u8]);
}

/// The closed set of conversion strategies under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Naive,
    Branchless,
    Reference,
}

impl Variant {
    /// Invocation order.
    pub const ALL: [Variant; 3] = [Variant::Naive, Variant::Branchless, Variant::Reference];

    pub fn label(self) -> &'static str {
        match self {
            Variant::Naive => "naive",
            Variant::Branchless => "branchless",
            Variant::Reference => "c std",
        }
    }
}

impl Transform for Variant {
    fn label(&self) -> &str {
        Variant::label(*self)
    }

    #[inline]
    fn apply(&self, buf: &mut [u8]) {
        match self {
            Variant::Naive => to_upper_naive(buf),
            Variant::Branchless => to_upper_branchless(buf),
            Variant::Reference => to_upper_std(buf),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naive" => Ok(Variant::Naive),
            "branchless" => Ok(Variant::Branchless),
            "c std" | "std" | "reference" => Ok(Variant::Reference),
            other => Err(anyhow!("Unknown variant '{}'", other)),
        }
    }
}

/// Subtract the case offset behind a data-dependent branch.
pub fn to_upper_naive(buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        if (b'a'..=b'z').contains(byte) {
            *byte -= CASE_DIFF;
        }
    }
}

/// Always subtract, scaled by the 0/1 "is lowercase" flag.
pub fn to_upper_branchless(buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        let is_lower = (*byte >= b'a') as u8 & (*byte <= b'z') as u8;
        *byte -= CASE_DIFF * is_lower;
    }
}

pub fn to_upper_std(buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        *byte = byte.to_ascii_uppercase();
    }
}
