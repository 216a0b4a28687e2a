//! This module contains the binary normalizer, which converts a non-negative
//! number into a fixed-length mantissa and an exponent.

use super::bits::Bits;
use super::error::{Error, Result};
use super::expand::{expand, Termination};
use super::semantics::Semantics;
use super::utils::ldexp;
use core::fmt::Display;
use tracing::trace;

/// The normalizer reports the exponent of the most significant set bit plus
/// one. With this offset the result reads as `0.1mmmm x 2^exponent`, or
/// equivalently `1.mmmm x 2^(exponent - 1)`.
pub const EXPONENT_OFFSET: i64 = 1;

/// Declare the different categories of normalized numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Category {
    Normal,
    Zero,
}

/// The result of normalizing a number: the bits that follow the implicit
/// leading one, and the exponent that places them.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Normalized {
    // The bits after the leading one, padded or truncated to the mantissa
    // length of the semantics.
    mantissa: Bits,
    // The power of two of the leading one, plus EXPONENT_OFFSET.
    exponent: i64,
    // Why the fractional expansion stopped.
    termination: Termination,
    // True if a set bit did not fit in the mantissa.
    lost_bits: bool,
    category: Category,
}

impl Normalized {
    /// Returns the normalized zero: an all-zero mantissa and exponent zero.
    pub fn zero(sem: Semantics) -> Self {
        Normalized {
            mantissa: Bits::zeros(sem.get_mantissa_len()),
            exponent: 0,
            termination: Termination::Exact,
            lost_bits: false,
            category: Category::Zero,
        }
    }

    /// Returns the mantissa bits (the leading one is implicit).
    pub fn get_mantissa(&self) -> &Bits {
        &self.mantissa
    }

    /// Returns the exponent, including EXPONENT_OFFSET.
    pub fn get_exp(&self) -> i64 {
        self.exponent
    }

    /// Returns the power of two of the most significant set bit.
    pub fn msb_exponent(&self) -> i64 {
        self.exponent - EXPONENT_OFFSET
    }

    pub fn get_termination(&self) -> Termination {
        self.termination
    }

    pub fn get_category(&self) -> Category {
        self.category
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.category, Category::Zero)
    }

    /// Returns true if the mantissa holds every set bit of the input.
    pub fn is_exact(&self) -> bool {
        self.termination.is_exact() && !self.lost_bits
    }

    /// Rebuild the value 1.mmmm x 2^(exponent - 1).
    pub fn to_f64(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        // Only the leading one and the next 63 bits fit in the accumulator.
        // Later bits are below the precision of a double.
        let n = self.mantissa.len().min(63);
        let acc = (1u64 << n) | self.mantissa.prefix_as_u64(n);
        ldexp(acc as f64, self.msb_exponent() - n as i64)
    }
}

impl Display for Normalized {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_zero() {
            return write!(f, "0.0 x 2^0");
        }
        write!(f, "0.1{} x 2^{}", self.mantissa, self.exponent)
    }
}

fn check_input(value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidInput { value });
    }
    Ok(())
}

/// Normalize the non-negative finite `value` into a mantissa of exactly
/// `sem.mantissa_len` bits and an exponent.
///
/// The integral part is converted to binary digits, the fractional part is
/// expanded by repeated doubling until it is exhausted or `sem.fraction_cap`
/// digits were produced, and the mantissa is the run of digits that follows
/// the most significant set bit.
///
/// # Examples
///
/// ```
///    use floatlab::{normalize, REFERENCE};
///
///    let n = normalize(5.0, REFERENCE).unwrap();
///    assert_eq!(n.get_exp(), 3);
///    assert!(n.get_mantissa().to_string().starts_with("01000"));
///    assert_eq!(n.to_f64(), 5.0);
/// ```
pub fn normalize(value: f64, sem: Semantics) -> Result<Normalized> {
    sem.validate()?;
    check_input(value)?;

    if value == 0.0 {
        return Ok(Normalized::zero(sem));
    }

    let cap = sem.get_fraction_cap();
    let expansion = expand(value, cap);
    let (idx, msb) = expansion
        .msb()
        .ok_or(Error::BelowResolution { value, cap })?;

    let mut mantissa = expansion.digits().tail(idx + 1);
    let lost_bits = mantissa.resize(sem.get_mantissa_len());

    let res = Normalized {
        mantissa,
        exponent: msb + EXPONENT_OFFSET,
        termination: expansion.termination,
        lost_bits,
        category: Category::Normal,
    };
    trace!(value, exponent = res.exponent, exact = res.is_exact(), "normalized");
    Ok(res)
}

/// The significant digits of a number: every digit from the most
/// significant set bit onwards, with the leading one kept.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Significand {
    /// The digits, starting with the leading one. Empty for zero.
    pub digits: Bits,
    /// The exponent in the same convention as `Normalized`: the value reads
    /// as 0.dddd x 2^exponent.
    pub exponent: i64,
    pub termination: Termination,
}

impl Significand {
    /// Rebuild the value 0.dddd x 2^exponent. Digits past the 64th are
    /// ignored.
    pub fn to_f64(&self) -> f64 {
        let n = self.digits.len().min(64);
        let int = self.digits.prefix_as_u64(n) as f64;
        ldexp(int, self.exponent - n as i64)
    }
}

/// Returns the significant digits of `value`, without a fixed length. The
/// number of digits is bounded by the integral digits plus the fractional
/// digit cap of `sem`.
pub fn significand(value: f64, sem: Semantics) -> Result<Significand> {
    sem.validate()?;
    check_input(value)?;

    if value == 0.0 {
        return Ok(Significand {
            digits: Bits::new(),
            exponent: 0,
            termination: Termination::Exact,
        });
    }

    let cap = sem.get_fraction_cap();
    let expansion = expand(value, cap);
    let (idx, msb) = expansion
        .msb()
        .ok_or(Error::BelowResolution { value, cap })?;

    Ok(Significand {
        digits: expansion.digits().tail(idx),
        exponent: msb + EXPONENT_OFFSET,
        termination: expansion.termination,
    })
}

#[cfg(test)]
use super::semantics::{COMPACT, REFERENCE};

#[test]
fn test_exponent_offset() {
    assert_eq!(EXPONENT_OFFSET, 1);
    let n = normalize(1.0, REFERENCE).unwrap();
    assert_eq!(n.msb_exponent(), 0);
    assert_eq!(n.get_exp(), 1);
}

#[test]
fn test_golden_8_2() {
    let n = normalize(8.2, REFERENCE).unwrap();
    assert_eq!(
        n.get_mantissa().to_string(),
        "0000011001100110011001100110011001100110011001100110000000000000"
    );
    assert_eq!(n.get_exp(), 4);
    // The double nearest to 8.2 has 48 fractional digits, well below the cap.
    assert_eq!(n.get_termination(), Termination::Exact);
    assert!(n.is_exact());
    assert_eq!(n.to_f64(), 8.2);
}

#[test]
fn test_golden_fractions() {
    let n = normalize(0.1, REFERENCE).unwrap();
    assert_eq!(
        n.get_mantissa().to_string(),
        "1001100110011001100110011001100110011001100110011010000000000000"
    );
    assert_eq!(n.get_exp(), -3);
    assert_eq!(n.to_f64(), 0.1);

    let n = normalize(2.3, REFERENCE).unwrap();
    assert_eq!(
        n.get_mantissa().to_string(),
        "0010011001100110011001100110011001100110011001100110000000000000"
    );
    assert_eq!(n.get_exp(), 2);

    // The expansion of 1e-6 runs into the 70 digit cap.
    let n = normalize(1e-6, REFERENCE).unwrap();
    assert_eq!(
        n.get_mantissa().to_string(),
        "0000110001101111011110100000101101011110110110001100000000000000"
    );
    assert_eq!(n.get_exp(), -19);
    assert_eq!(n.get_termination(), Termination::Truncated);
    assert!(!n.is_exact());
}

#[test]
fn test_terminating_fractions() {
    fn check(value: f64, prefix: &str, exp: i64) {
        let n = normalize(value, REFERENCE).unwrap();
        let m = n.get_mantissa().to_string();
        assert_eq!(m.len(), 64);
        assert!(m.starts_with(prefix), "{} -> {}", value, m);
        assert!(m[prefix.len()..].chars().all(|c| c == '0'));
        assert_eq!(n.get_exp(), exp);
        assert!(n.is_exact());
        assert_eq!(n.to_f64(), value);
    }
    check(0.5, "", 0);
    check(0.25, "", -1);
    check(0.75, "1", 0);
    check(2.5, "01", 2);
    check(0.625, "01", 0);
    check(1.0, "", 1);
    check(3.0, "1", 2);
    check(5.0, "01", 3);
    check(1024.0, "", 11);
}

#[test]
fn test_zero() {
    let n = normalize(0.0, REFERENCE).unwrap();
    assert!(n.is_zero());
    assert_eq!(n.get_exp(), 0);
    assert_eq!(n.get_mantissa(), &Bits::zeros(64));
    assert_eq!(n.to_string(), "0.0 x 2^0");
    assert_eq!(n.to_f64(), 0.0);

    // Negative zero takes the same path.
    assert!(normalize(-0.0, REFERENCE).unwrap().is_zero());

    // 0.5 shares the mantissa and exponent of zero, but not the category.
    let half = normalize(0.5, REFERENCE).unwrap();
    assert_eq!(half.get_exp(), 0);
    assert!(!half.is_zero());
    assert_ne!(half, n);

    let compact = normalize(0.0, COMPACT).unwrap();
    assert_eq!(compact.get_mantissa().len(), 52);
}

#[test]
fn test_invalid_inputs() {
    use super::utils;
    for v in utils::get_invalid_test_values() {
        assert!(matches!(
            normalize(v, REFERENCE),
            Err(Error::InvalidInput { .. })
        ));
        assert!(significand(v, REFERENCE).is_err());
    }
    assert_eq!(
        normalize(1e-30, REFERENCE),
        Err(Error::BelowResolution {
            value: 1e-30,
            cap: 70
        })
    );
    assert!(normalize(1.0, Semantics::new(0, 70)).is_err());
}

#[test]
fn test_mantissa_length() {
    use super::utils;
    let sem = Semantics::new(64, 1100);
    for v in utils::get_special_test_values() {
        let n = normalize(v, sem).unwrap();
        assert_eq!(n.get_mantissa().len(), 64);
        for len in [1, 8, 52, 200] {
            let n = normalize(v, sem.with_mantissa_len(len)).unwrap();
            assert_eq!(n.get_mantissa().len(), len);
        }
    }
}

#[test]
fn test_reconstruct_special_values() {
    use super::utils;
    // A double has at most 53 significant bits, so with a long enough cap
    // every value is represented exactly.
    let sem = Semantics::new(64, 1100);
    for v in utils::get_special_test_values() {
        let n = normalize(v, sem).unwrap();
        assert!(n.is_exact(), "{}", v);
        assert_eq!(n.to_f64(), v);
    }
}

#[test]
fn test_wide_mantissa() {
    // Mantissas longer than the exponent range of a double still rebuild
    // to the input.
    let sem = Semantics::new(1100, 70);
    let n = normalize(1.0, sem).unwrap();
    assert_eq!(n.get_mantissa().len(), 1100);
    assert!(n.is_exact());
    assert_eq!(n.to_f64(), 1.0);

    for v in [8.2, 0.1, 2.3, 355. / 113.] {
        let n = normalize(v, sem).unwrap();
        assert!(n.is_exact(), "{}", v);
        assert_eq!(n.to_f64(), v);
    }
}

#[test]
fn test_strict_cap() {
    // The 71st fractional digit of this value is one. A cap of 70 drops it,
    // and a cap of 71 keeps it in mantissa bit 51.
    let v = 3.4049915740552072e-06;
    let n = normalize(v, REFERENCE).unwrap();
    assert_eq!(
        n.get_mantissa().to_string(),
        "1100100100000010100111101010000000001110101011101100000000000000"
    );
    assert_eq!(n.get_exp(), -18);
    assert!(!n.is_exact());

    let n = normalize(v, REFERENCE.with_fraction_cap(71)).unwrap();
    assert_eq!(n.get_mantissa().get(51), Some(true));
    assert_eq!(n.get_exp(), -18);
}

#[test]
fn test_small_cap() {
    let sem = Semantics::new(8, 8);
    let n = normalize(0.1, sem).unwrap();
    assert_eq!(n.get_mantissa().to_string(), "10010000");
    assert_eq!(n.get_exp(), -3);
    assert_eq!(n.get_termination(), Termination::Truncated);
    assert_eq!(n.to_string(), "0.110010000 x 2^-3");

    // Mantissa truncation alone also makes the result inexact.
    let n = normalize(8.2, Semantics::new(8, 70)).unwrap();
    assert_eq!(n.get_mantissa().to_string(), "00000110");
    assert_eq!(n.get_termination(), Termination::Exact);
    assert!(!n.is_exact());
}

#[test]
fn test_integers() {
    for i in 1..2000u64 {
        let n = normalize(i as f64, REFERENCE).unwrap();
        let bit_len = 64 - i.leading_zeros() as i64;
        assert_eq!(n.get_exp(), bit_len - 1 + EXPONENT_OFFSET);
        // Only the bits of the integer itself may be set.
        let m = n.get_mantissa();
        assert!(m.tail(bit_len as usize - 1).is_zero());
        assert_eq!(n.to_f64(), i as f64);
    }
}

#[test]
fn test_significand() {
    let s = significand(2.3, COMPACT).unwrap();
    assert_eq!(s.exponent, 2);
    assert!(s.digits.to_string().starts_with("10010011"));
    assert_eq!(s.digits.get(0), Some(true));
    assert_eq!(s.to_f64(), 2.3);

    let s = significand(0.1, REFERENCE).unwrap();
    assert_eq!(s.digits.len(), 52);
    assert_eq!(s.exponent, -3);
    assert_eq!(s.to_f64(), 0.1);

    let s = significand(0.0, COMPACT).unwrap();
    assert!(s.digits.is_empty());
    assert_eq!(s.exponent, 0);

    // The compact cap bounds the number of fractional digits.
    let s = significand(1e-6, COMPACT).unwrap();
    assert_eq!(s.termination, Termination::Truncated);
    assert_eq!(s.digits.len(), 56 - 19);
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn mantissa_has_fixed_length(v in 0.0f64..1e12, len in 1usize..128) {
            let n = normalize(v, REFERENCE.with_mantissa_len(len)).unwrap();
            prop_assert_eq!(n.get_mantissa().len(), len);
        }

        #[test]
        fn reconstruction_is_close(v in 1e-9f64..1e12) {
            let n = normalize(v, REFERENCE).unwrap();
            // Bits past the fractional cap are dropped by the expansion.
            let tolerance = ldexp(1.0, n.msb_exponent() - 52).max(ldexp(1.0, -70));
            prop_assert!((n.to_f64() - v).abs() <= tolerance);
        }

        #[test]
        fn cap_is_never_exceeded(v in 0.0f64..1.0, cap in 1usize..80) {
            let e = expand(v, cap);
            prop_assert!(e.fraction.len() <= cap);
            if e.fraction.len() < cap {
                prop_assert_eq!(e.termination, Termination::Exact);
            }
        }
    }
}
