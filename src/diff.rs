//! This module contains the finite difference approximations of the first
//! derivative, and the leading error terms of each scheme.

use super::error::{Error, Result};
use core::fmt::Display;

/// A function with known derivatives, used as the ground truth when
/// measuring the error of an approximation.
pub trait Function {
    /// Returns f(x).
    fn value(&self, x: f64) -> f64;

    /// Returns the derivative of order `order` at x. Orders 0 to 3 must be
    /// supported.
    fn derivative(&self, order: u32, x: f64) -> f64;

    fn name(&self) -> &'static str;
}

impl core::fmt::Debug for dyn Function {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// f(x) = sin(x).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sine;

impl Function for Sine {
    fn value(&self, x: f64) -> f64 {
        x.sin()
    }
    fn derivative(&self, order: u32, x: f64) -> f64 {
        match order % 4 {
            0 => x.sin(),
            1 => x.cos(),
            2 => -x.sin(),
            _ => -x.cos(),
        }
    }
    fn name(&self) -> &'static str {
        "sin"
    }
}

/// f(x) = e^x.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exponential;

impl Function for Exponential {
    fn value(&self, x: f64) -> f64 {
        x.exp()
    }
    fn derivative(&self, _order: u32, x: f64) -> f64 {
        x.exp()
    }
    fn name(&self) -> &'static str {
        "exp"
    }
}

/// Look up one of the built-in functions by name.
pub fn function_by_name(name: &str) -> Option<&'static dyn Function> {
    match name {
        "sin" => Some(&Sine),
        "exp" => Some(&Exponential),
        _ => None,
    }
}

/// Defines the supported difference schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Scheme {
    /// (f(x + h) - f(x)) / h
    Forward,
    /// (f(x) - f(x - h)) / h
    Backward,
    /// (f(x + h) - f(x - h)) / 2h
    Central,
}

impl Scheme {
    pub const ALL: [Scheme; 3] = [Scheme::Forward, Scheme::Backward, Scheme::Central];

    /// Returns the order of accuracy of the scheme.
    pub fn order(&self) -> u32 {
        match self {
            Scheme::Forward | Scheme::Backward => 1,
            Scheme::Central => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Forward => "forward",
            Scheme::Backward => "backward",
            Scheme::Central => "central",
        }
    }

    /// Approximate f'(x) with the step `h`.
    pub fn approximate(&self, f: &dyn Function, x: f64, h: f64) -> Result<f64> {
        check_point(x)?;
        check_step(h)?;
        Ok(match self {
            Scheme::Forward => (f.value(x + h) - f.value(x)) / h,
            Scheme::Backward => (f.value(x) - f.value(x - h)) / h,
            Scheme::Central => (f.value(x + h) - f.value(x - h)) / (2. * h),
        })
    }

    /// Returns the leading term of the Taylor remainder of the scheme. This
    /// is the signed error the scheme makes in exact arithmetic.
    pub fn truncation_error(&self, f: &dyn Function, x: f64, h: f64) -> Result<f64> {
        check_point(x)?;
        check_step(h)?;
        Ok(match self {
            Scheme::Forward => (h / 2.) * f.derivative(2, x),
            Scheme::Backward => -(h / 2.) * f.derivative(2, x),
            Scheme::Central => ((h * h) / 6.) * f.derivative(3, x),
        })
    }

    /// Returns the bound on the error caused by rounding f(x +- h) to the
    /// nearest double, amplified by the division by the step.
    pub fn rounding_error(&self, f: &dyn Function, x: f64, h: f64) -> Result<f64> {
        check_point(x)?;
        check_step(h)?;
        let fx = f.value(x).abs();
        Ok(match self {
            Scheme::Forward | Scheme::Backward => 2. * f64::EPSILON * fx / h,
            Scheme::Central => f64::EPSILON * fx / h,
        })
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn check_point(x: f64) -> Result<()> {
    if !x.is_finite() {
        return Err(Error::InvalidInput { value: x });
    }
    Ok(())
}

pub(crate) fn check_step(h: f64) -> Result<()> {
    if !h.is_finite() || h <= 0.0 {
        return Err(Error::InvalidStep(h));
    }
    Ok(())
}

#[test]
fn test_approximations() {
    let f = Sine;
    let x = 1.0;
    let fwd = Scheme::Forward.approximate(&f, x, 0.1).unwrap();
    assert!((fwd - 0.4973637525353891).abs() < 1e-12);

    for scheme in Scheme::ALL {
        let approx = scheme.approximate(&f, x, 1e-4).unwrap();
        assert!((approx - x.cos()).abs() < 1e-4, "{}", scheme);
    }

    // The central scheme is second order on a smooth function.
    let e1 = (Scheme::Central.approximate(&f, x, 1e-2).unwrap() - x.cos()).abs();
    let e2 = (Scheme::Central.approximate(&f, x, 1e-3).unwrap() - x.cos()).abs();
    assert!(e1 / e2 > 90. && e1 / e2 < 110.);
}

#[test]
fn test_truncation_predicts_error() {
    // For moderate steps the leading term dominates the observed error.
    let x = std::f64::consts::FRAC_PI_4;
    let functions: [&dyn Function; 2] = [&Sine, &Exponential];
    for f in functions {
        for scheme in Scheme::ALL {
            let h = 1e-3;
            let approx = scheme.approximate(f, x, h).unwrap();
            let observed = approx - f.derivative(1, x);
            let predicted = scheme.truncation_error(f, x, h).unwrap();
            assert!(
                ((observed - predicted) / predicted).abs() < 0.01,
                "{} {}",
                f.name(),
                scheme
            );
        }
    }
}

#[test]
fn test_rounding_error() {
    let f = Sine;
    let r = Scheme::Forward.rounding_error(&f, 1.0, 1e-8).unwrap();
    assert!((r - 2. * f64::EPSILON * 1f64.sin() / 1e-8).abs() < 1e-20);
    let c = Scheme::Central.rounding_error(&f, 1.0, 1e-8).unwrap();
    assert_eq!(r, 2. * c);
}

#[test]
fn test_invalid_steps() {
    let f = Sine;
    for h in [0.0, -1e-3, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            Scheme::Central.approximate(&f, 1.0, h),
            Err(Error::InvalidStep(_))
        ));
    }
    assert!(matches!(
        Scheme::Forward.truncation_error(&f, f64::NAN, 0.1),
        Err(Error::InvalidInput { .. })
    ));
}

#[test]
fn test_functions() {
    assert_eq!(function_by_name("sin").unwrap().name(), "sin");
    assert_eq!(function_by_name("exp").unwrap().derivative(3, 0.0), 1.0);
    assert!(function_by_name("tan").is_none());
    assert_eq!(Sine.derivative(4, 0.5), 0.5f64.sin());
    assert_eq!(Sine.derivative(3, 0.0), -1.0);
}
