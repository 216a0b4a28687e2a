//! This module contains the error analysis of the difference schemes: the
//! error model at a single step, sweeps over a range of steps, and the
//! selection of the step that minimizes the total error.

use super::diff::{check_step, Function, Scheme};
use super::error::{Error, Result};
use tracing::debug;

/// The errors of one scheme at one step size.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ErrorSample {
    pub h: f64,
    pub approximation: f64,
    /// The signed leading term of the truncation error.
    pub truncation: f64,
    /// The bound on the rounding error.
    pub rounding: f64,
    /// The modeled total error: |truncation| + rounding.
    pub total: f64,
    /// The measured error |approximation - f'(x)|.
    pub observed: f64,
}

/// Evaluate the scheme and its error model at the step `h`.
pub fn sample(
    f: &dyn Function,
    scheme: Scheme,
    x: f64,
    h: f64,
) -> Result<ErrorSample> {
    let approximation = scheme.approximate(f, x, h)?;
    let truncation = scheme.truncation_error(f, x, h)?;
    let rounding = scheme.rounding_error(f, x, h)?;
    Ok(ErrorSample {
        h,
        approximation,
        truncation,
        rounding,
        total: truncation.abs() + rounding,
        observed: (approximation - f.derivative(1, x)).abs(),
    })
}

/// The largest number of decades `decade_steps` accepts. The smallest step,
/// 10^-300, is still a normal double.
pub const MAX_DECADES: usize = 300;

/// Returns the steps 10^-1, 10^-2, ... 10^-count.
pub fn decade_steps(count: usize) -> Result<Vec<f64>> {
    if count > MAX_DECADES {
        return Err(Error::TooManyDecades {
            count,
            max: MAX_DECADES,
        });
    }
    // Powers of ten up to 10^22 are exact, so those steps are correctly
    // rounded.
    Ok((1..=count as i32).map(|i| 1.0 / 10f64.powi(i)).collect())
}

/// The samples of one scheme over a list of steps.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Sweep {
    pub function: &'static str,
    pub scheme: Scheme,
    pub x: f64,
    pub samples: Vec<ErrorSample>,
}

impl Sweep {
    /// Returns the index and the sample with the smallest modeled total
    /// error. Ties go to the earlier (larger) step. Returns None if there
    /// are no samples.
    pub fn optimal(&self) -> Option<(usize, &ErrorSample)> {
        let idx = argmin(self.samples.iter().map(|s| s.total))?;
        Some((idx, &self.samples[idx]))
    }

    /// Returns the index and the sample with the smallest measured error.
    pub fn best_observed(&self) -> Option<(usize, &ErrorSample)> {
        let idx = argmin(self.samples.iter().map(|s| s.observed))?;
        Some((idx, &self.samples[idx]))
    }
}

// Returns the index of the first smallest element. NaNs are only selected
// when every element is NaN.
fn argmin(values: impl Iterator<Item = f64>) -> Option<usize> {
    let mut best = None;
    let mut best_val = f64::NAN;
    for (i, v) in values.enumerate() {
        if best.is_none() || best_val.is_nan() || v < best_val {
            best = Some(i);
            best_val = v;
        }
    }
    best
}

/// Sample `scheme` at every step in `steps`.
pub fn sweep(
    f: &dyn Function,
    scheme: Scheme,
    x: f64,
    steps: &[f64],
) -> Result<Sweep> {
    if steps.is_empty() {
        return Err(Error::EmptySweep);
    }
    let samples = steps
        .iter()
        .map(|h| sample(f, scheme, x, *h))
        .collect::<Result<Vec<_>>>()?;

    let res = Sweep {
        function: f.name(),
        scheme,
        x,
        samples,
    };
    if let Some((idx, best)) = res.optimal() {
        debug!(%scheme, x, idx, h = best.h, total = best.total, "optimal step");
    }
    Ok(res)
}

/// The measured errors of all the schemes at one step.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Comparison {
    pub h: f64,
    pub forward: f64,
    pub backward: f64,
    pub central: f64,
}

/// Measure the error of every scheme at each of the steps.
pub fn compare(f: &dyn Function, x: f64, steps: &[f64]) -> Result<Vec<Comparison>> {
    if steps.is_empty() {
        return Err(Error::EmptySweep);
    }
    let exact = f.derivative(1, x);
    steps
        .iter()
        .map(|&h| -> Result<Comparison> {
            check_step(h)?;
            let err = |s: Scheme| -> Result<f64> {
                Ok((s.approximate(f, x, h)? - exact).abs())
            };
            Ok(Comparison {
                h,
                forward: err(Scheme::Forward)?,
                backward: err(Scheme::Backward)?,
                central: err(Scheme::Central)?,
            })
        })
        .collect()
}

/// Configures a sweep of step sizes.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// The point where the derivative is approximated.
    pub x: f64,
    /// The number of decades of step sizes, starting at 10^-1.
    pub decades: usize,
    pub function: &'static dyn Function,
    pub schemes: Vec<Scheme>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            x: 1.0,
            decades: 16,
            function: &super::diff::Sine,
            schemes: vec![Scheme::Forward, Scheme::Central],
        }
    }
}

impl SweepConfig {
    /// Run one sweep per configured scheme.
    pub fn run(&self) -> Result<Vec<Sweep>> {
        let steps = decade_steps(self.decades)?;
        self.schemes
            .iter()
            .map(|scheme| sweep(self.function, *scheme, self.x, &steps))
            .collect()
    }
}

/// Configures a comparison of the schemes.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    pub x: f64,
    pub steps: Vec<f64>,
    pub function: &'static dyn Function,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            x: std::f64::consts::FRAC_PI_4,
            steps: vec![0.1, 0.01, 0.001, 0.0001],
            function: &super::diff::Sine,
        }
    }
}

impl CompareConfig {
    pub fn run(&self) -> Result<Vec<Comparison>> {
        compare(self.function, self.x, &self.steps)
    }
}

#[cfg(test)]
use super::diff::{Exponential, Sine};

#[test]
fn test_decade_steps() {
    let steps = decade_steps(16).unwrap();
    assert_eq!(steps.len(), 16);
    assert_eq!(steps[0], 0.1);
    assert_eq!(steps[7], 1e-8);
    assert_eq!(steps[15], 1e-16);
    assert!(decade_steps(0).unwrap().is_empty());

    // Every step in the accepted range is a normal, non-zero double.
    let steps = decade_steps(MAX_DECADES).unwrap();
    assert!(steps.iter().all(|h| h.is_normal()));
    assert_eq!(
        decade_steps(400),
        Err(Error::TooManyDecades { count: 400, max: 300 })
    );
    assert!(decade_steps(usize::MAX).is_err());
}

#[test]
fn test_sample() {
    let s = sample(&Sine, Scheme::Forward, 1.0, 0.1).unwrap();
    assert_eq!(s.h, 0.1);
    assert!((s.truncation + 0.05 * 1f64.sin()).abs() < 1e-15);
    assert_eq!(s.total, s.truncation.abs() + s.rounding);
    assert!((s.observed - (s.approximation - 1f64.cos()).abs()).abs() < 1e-15);
}

#[test]
fn test_optimal_step() {
    let steps = decade_steps(16).unwrap();
    let fwd = sweep(&Sine, Scheme::Forward, 1.0, &steps).unwrap();
    let (idx, best) = fwd.optimal().unwrap();
    assert_eq!(idx, 7);
    assert_eq!(best.h, 1e-8);

    let central = sweep(&Sine, Scheme::Central, 1.0, &steps).unwrap();
    let (idx, best) = central.optimal().unwrap();
    assert_eq!(idx, 4);
    assert_eq!(best.h, 1e-5);

    // The model agrees with the measurement to within a decade.
    let (observed_idx, _) = central.best_observed().unwrap();
    assert!(observed_idx.abs_diff(idx) <= 1);
}

#[test]
fn test_empty_sweep_has_no_optimum() {
    let empty = Sweep {
        function: "sin",
        scheme: Scheme::Forward,
        x: 1.0,
        samples: Vec::new(),
    };
    assert_eq!(empty.optimal(), None);
    assert_eq!(empty.best_observed(), None);

    // NaN errors lose to any number.
    let values = [f64::NAN, 2.0, 1.0, 1.0];
    assert_eq!(argmin(values.into_iter()), Some(2));
    assert_eq!(argmin([f64::NAN].into_iter()), Some(0));
}

#[test]
fn test_sweep_errors() {
    assert_eq!(
        sweep(&Sine, Scheme::Forward, 1.0, &[]),
        Err(Error::EmptySweep)
    );
    assert_eq!(
        sweep(&Sine, Scheme::Forward, 1.0, &[0.1, 0.0]),
        Err(Error::InvalidStep(0.0))
    );
}

#[test]
fn test_compare() {
    let rows = CompareConfig::default().run().unwrap();
    assert_eq!(rows.len(), 4);
    assert!((rows[0].forward - 0.03650380828255784).abs() < 1e-9);
    assert!((rows[0].backward - 0.03414796390934527).abs() < 1e-9);
    assert!((rows[1].central - 1.1785054096269398e-05).abs() < 1e-10);
    for row in &rows {
        assert!(row.central < row.forward);
        assert!(row.central < row.backward);
    }
    assert_eq!(compare(&Exponential, 0.0, &[]), Err(Error::EmptySweep));
    assert!(compare(&Exponential, 0.0, &[-0.1]).is_err());
}

#[test]
fn test_sweep_config() {
    let sweeps = SweepConfig::default().run().unwrap();
    assert_eq!(sweeps.len(), 2);
    assert_eq!(sweeps[0].scheme, Scheme::Forward);
    assert_eq!(sweeps[1].samples.len(), 16);
    assert_eq!(sweeps[1].function, "sin");

    let config = SweepConfig {
        decades: 0,
        ..Default::default()
    };
    assert_eq!(config.run(), Err(Error::EmptySweep));

    let config = SweepConfig {
        decades: MAX_DECADES + 1,
        ..Default::default()
    };
    assert!(matches!(config.run(), Err(Error::TooManyDecades { .. })));
}
