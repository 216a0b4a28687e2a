//! Error types shared by the normalizer and the error-analysis code.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid input {value}: expected a finite, non-negative number")]
    InvalidInput { value: f64 },

    #[error("no set bit in the first {cap} fractional digits of {value}")]
    BelowResolution { value: f64, cap: usize },

    #[error("invalid semantics: mantissa length {mantissa_len} and fraction cap {fraction_cap} must be non-zero")]
    InvalidSemantics {
        mantissa_len: usize,
        fraction_cap: usize,
    },

    #[error("invalid precision {0}: at least one significant bit is required")]
    InvalidPrecision(usize),

    #[error("invalid step size {0}: expected a finite, positive number")]
    InvalidStep(f64),

    #[error("cannot analyze an empty list of step sizes")]
    EmptySweep,

    #[error("too many decades of step sizes: {count} (at most {max})")]
    TooManyDecades { count: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

#[test]
fn test_error_display() {
    assert_eq!(
        Error::InvalidInput { value: -1.5 }.to_string(),
        "invalid input -1.5: expected a finite, non-negative number"
    );
    assert_eq!(
        Error::BelowResolution { value: 1e-30, cap: 70 }.to_string(),
        "no set bit in the first 70 fractional digits of 0.000000000000000000000000000001"
    );
    assert_eq!(
        Error::EmptySweep.to_string(),
        "cannot analyze an empty list of step sizes"
    );
    assert_eq!(
        Error::TooManyDecades { count: 400, max: 300 }.to_string(),
        "too many decades of step sizes: 400 (at most 300)"
    );
}
