//! Floatlab takes floating point numbers apart. It converts a non-negative
//! number into a normalized binary mantissa and exponent by expanding its
//! digits bit by bit, brackets numbers between their neighbours at a given
//! binary precision, and measures the truncation and rounding error of
//! finite difference derivatives as the step size shrinks.
//!
//! # Example
//!
//! ```
//!    use floatlab::{normalize, REFERENCE};
//!
//!    let n = normalize(8.2, REFERENCE).unwrap();
//!    assert_eq!(n.get_exp(), 4);
//!    assert_eq!(n.get_mantissa().len(), 64);
//!    // Prints: 0.10000011001100... x 2^4
//!    println!("{}", n);
//! ```

mod analysis;
mod bits;
mod bracket;
mod diff;
mod error;
mod expand;
mod normalize;
mod semantics;
mod utils;

#[cfg(feature = "python")]
mod py;

pub use self::analysis::{
    compare, decade_steps, sample, sweep, CompareConfig, Comparison,
    ErrorSample, Sweep, SweepConfig, MAX_DECADES,
};
pub use self::bits::{Bits, ParseBitsError};
pub use self::bracket::{bracket, Bracket};
pub use self::diff::{function_by_name, Exponential, Function, Scheme, Sine};
pub use self::error::{Error, Result};
pub use self::expand::{expand, Expansion, FractionDigits, Termination};
pub use self::normalize::{
    normalize, significand, Category, Normalized, Significand,
    EXPONENT_OFFSET,
};
pub use self::semantics::{Semantics, COMPACT, REFERENCE};
