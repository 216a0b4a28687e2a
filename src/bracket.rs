//! This module contains the computation of the two neighbours of a number at
//! a fixed binary precision.

use super::error::{Error, Result};
use super::normalize::significand;
use super::semantics::Semantics;
use super::utils::ldexp;

/// The consecutive numbers with `precision` significant bits that enclose a
/// value: `lower` is the value truncated to `precision` bits, and `upper` is
/// one unit in the last place above it.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Bracket {
    pub lower: f64,
    pub upper: f64,
    pub precision: usize,
    /// True if the truncation dropped no set bit (then `lower` is the value).
    pub exact: bool,
}

impl Bracket {
    /// Returns the distance between the neighbours (one ulp).
    pub fn gap(&self) -> f64 {
        self.upper - self.lower
    }

    /// Returns the gap relative to the lower neighbour. This is bounded by
    /// 2^(1 - precision).
    pub fn relative_gap(&self) -> f64 {
        if self.lower == 0.0 {
            return 0.0;
        }
        self.gap() / self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Returns the neighbours of `value` with `precision` significant bits.
pub fn bracket(value: f64, precision: usize, sem: Semantics) -> Result<Bracket> {
    if precision == 0 {
        return Err(Error::InvalidPrecision(precision));
    }

    let sig = significand(value, sem)?;
    if sig.digits.is_empty() {
        return Ok(Bracket {
            lower: 0.0,
            upper: 0.0,
            precision,
            exact: true,
        });
    }

    let mut kept = sig.digits.clone();
    let dropped = kept.resize(precision);

    // The digits past the 64th are below the precision of a double.
    let n = precision.min(64);
    let int = kept.prefix_as_u64(n) as f64;
    let lower = ldexp(int, sig.exponent - n as i64);
    let upper = lower + ldexp(1.0, sig.exponent - precision as i64);

    Ok(Bracket {
        lower,
        upper,
        precision,
        exact: !dropped && sig.termination.is_exact(),
    })
}

#[cfg(test)]
use super::semantics::{COMPACT, REFERENCE};

#[test]
fn test_bracket() {
    let b = bracket(2.3, 8, REFERENCE).unwrap();
    assert_eq!(b.lower, 2.296875);
    assert_eq!(b.upper, 2.3125);
    assert_eq!(b.gap(), 0.015625);
    assert!(!b.exact);
    assert!(b.contains(2.3));

    let b = bracket(0.1, 4, REFERENCE).unwrap();
    assert_eq!(b.lower, 0.09375);
    assert_eq!(b.upper, 0.1015625);
    assert!(b.contains(0.1));
}

#[test]
fn test_bracket_double_precision() {
    // A double has 53 significant bits, so truncating to 53 bits is exact.
    for v in [0.1, 2.3, 8.2, std::f64::consts::PI] {
        let b = bracket(v, 53, COMPACT).unwrap();
        assert!(b.exact, "{}", v);
        assert_eq!(b.lower, v);
        assert!(b.relative_gap() <= f64::EPSILON);
    }
}

#[test]
fn test_relative_gap_bound() {
    for p in 1..40 {
        let b = bracket(std::f64::consts::E, p, REFERENCE).unwrap();
        assert!(b.contains(std::f64::consts::E));
        assert!(b.relative_gap() <= ldexp(1.0, 1 - p as i64));
    }
}

#[test]
fn test_bracket_edge_cases() {
    let b = bracket(0.0, 8, REFERENCE).unwrap();
    assert_eq!((b.lower, b.upper), (0.0, 0.0));
    assert_eq!(b.relative_gap(), 0.0);

    assert_eq!(bracket(1.0, 0, REFERENCE), Err(Error::InvalidPrecision(0)));
    assert!(bracket(-1.0, 8, REFERENCE).is_err());

    // Integers with fewer bits than the precision are exact.
    let b = bracket(5.0, 8, REFERENCE).unwrap();
    assert!(b.exact);
    assert_eq!(b.lower, 5.0);
    assert_eq!(b.upper, 5.0 + 1.0 / 32.0);
}

#[test]
fn test_bracket_wide_precision() {
    // Precisions past the exponent range of a double.
    let b = bracket(1.0, 1100, REFERENCE).unwrap();
    assert!(b.exact);
    assert_eq!(b.lower, 1.0);
    assert!(b.upper.is_finite());
    assert!(b.contains(1.0));

    let b = bracket(2.3, 1100, REFERENCE).unwrap();
    assert!(b.exact);
    assert_eq!(b.lower, 2.3);
    assert!(b.upper.is_finite());
}
