//! This module contains the digit expansion of a non-negative number into
//! the binary digits of its integer part and the binary digits of its
//! fractional part.

use super::bits::Bits;
use tracing::debug;

/// Reports why the fractional expansion stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Termination {
    /// The remainder reached zero; the digits are the exact expansion.
    Exact,
    /// The digit cap was reached with a non-zero remainder; the digits are a
    /// truncation of the expansion.
    Truncated,
}

impl Termination {
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact)
    }
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated)
    }
}

/// Split `value` into its integral and fractional parts.
pub fn split(value: f64) -> (f64, f64) {
    let int = value.floor();
    (int, value - int)
}

/// Returns the binary digits of the integral value `int`, most significant
/// first. Zero has no digits.
pub fn integer_digits(int: f64) -> Bits {
    debug_assert!(int >= 0.0 && int.fract() == 0.0);

    // Peel off the lowest bit at each step. Both the remainder and the
    // halving are exact: values of 2^53 and above are always even, so the
    // subtraction only ever removes a one from small values.
    let mut digits = Vec::new();
    let mut rest = int;
    while rest > 0.0 {
        let bit = rest % 2.0;
        digits.push(bit == 1.0);
        rest = (rest - bit) / 2.0;
    }
    digits.reverse();
    Bits::from(digits)
}

/// Lazily generates the binary digits of a fraction in [0, 1) by repeated
/// doubling. The state of the generator is the remaining fraction, and the
/// generator is exhausted when the remainder is exactly zero.
#[derive(Debug, Clone)]
pub struct FractionDigits {
    remainder: f64,
}

impl FractionDigits {
    pub fn new(fraction: f64) -> Self {
        debug_assert!((0.0..1.0).contains(&fraction));
        FractionDigits {
            remainder: fraction,
        }
    }

    /// Returns the part of the fraction that was not emitted yet, scaled so
    /// that the next digit is its first binary digit.
    pub fn remainder(&self) -> f64 {
        self.remainder
    }
}

impl Iterator for FractionDigits {
    type Item = bool;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remainder == 0.0 {
            return None;
        }
        // Doubling a value below one, and subtracting one from a value in
        // [1, 2), are both exact.
        self.remainder *= 2.0;
        let bit = self.remainder >= 1.0;
        if bit {
            self.remainder -= 1.0;
        }
        Some(bit)
    }
}

/// The raw digits of a number before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    /// Digits of the integral part, most significant first.
    pub integer: Bits,
    /// Digits of the fractional part, at most `cap` of them.
    pub fraction: Bits,
    pub termination: Termination,
}

impl Expansion {
    /// Returns the integral digits followed by the fractional digits.
    pub fn digits(&self) -> Bits {
        let mut all = self.integer.clone();
        all.extend_from(&self.fraction);
        all
    }

    /// Returns the index of the most significant set bit in `digits()`, and
    /// the power of two that this bit represents.
    pub fn msb(&self) -> Option<(usize, i64)> {
        if !self.integer.is_empty() {
            return Some((0, self.integer.len() as i64 - 1));
        }
        let k = self.fraction.first_one()?;
        Some((k, -(k as i64 + 1)))
    }
}

/// Expand the non-negative finite `value` into integral digits and up to
/// `cap` fractional digits.
pub fn expand(value: f64, cap: usize) -> Expansion {
    let (int, frac) = split(value);
    let integer = integer_digits(int);

    let mut digits = FractionDigits::new(frac);
    let fraction: Bits = digits.by_ref().take(cap).collect();
    let termination = if digits.remainder() == 0.0 {
        Termination::Exact
    } else {
        debug!(value, cap, "fractional expansion reached the digit cap");
        Termination::Truncated
    };

    Expansion {
        integer,
        fraction,
        termination,
    }
}

#[test]
fn test_integer_digits() {
    assert_eq!(integer_digits(0.0).to_string(), "");
    assert_eq!(integer_digits(1.0).to_string(), "1");
    assert_eq!(integer_digits(8.0).to_string(), "1000");
    assert_eq!(integer_digits(13.0).to_string(), "1101");

    // Values that don't fit in any native integer.
    let big = integer_digits(2f64.powi(200));
    assert_eq!(big.len(), 201);
    assert_eq!(big.count_ones(), 1);
    let max = integer_digits(f64::MAX);
    assert_eq!(max.len(), 1024);
    assert_eq!(max.count_ones(), 53);
    assert_eq!(max.first_one(), Some(0));
}

#[test]
fn test_fraction_digits() {
    let digits: Bits = FractionDigits::new(0.625).collect();
    assert_eq!(digits.to_string(), "101");

    let mut digits = FractionDigits::new(0.1);
    let first: Bits = digits.by_ref().take(8).collect();
    assert_eq!(first.to_string(), "00011001");
    assert!(digits.remainder() > 0.0);

    // Every double has a finite expansion. The nearest double to 0.1 has
    // 55 fractional digits.
    assert_eq!(FractionDigits::new(0.1).count(), 55);
    assert_eq!(FractionDigits::new(0.0).count(), 0);
}

#[test]
fn test_expand() {
    let e = expand(8.2, 70);
    assert_eq!(e.integer.to_string(), "1000");
    assert_eq!(e.fraction.len(), 48);
    assert!(e.fraction.to_string().starts_with("0011001100110011"));
    assert!(e.termination.is_exact());
    assert_eq!(e.msb(), Some((0, 3)));

    let e = expand(0.1, 8);
    assert!(e.integer.is_empty());
    assert_eq!(e.fraction.to_string(), "00011001");
    assert!(e.termination.is_truncated());
    assert_eq!(e.msb(), Some((3, -4)));
    assert_eq!(e.digits().to_string(), "00011001");

    // The cap is strict.
    let e = expand(1e-6, 70);
    assert_eq!(e.fraction.len(), 70);
    assert!(e.termination.is_truncated());

    let e = expand(1e-30, 70);
    assert!(e.fraction.is_zero());
    assert_eq!(e.msb(), None);
}
