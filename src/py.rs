use crate::{
    bracket, compare, function_by_name, normalize, sample, Error, Normalized,
    Scheme, Semantics,
};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::format;
use std::string::String;
use std::vec::Vec;

fn to_py_err(err: Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn lookup_function(name: &str) -> PyResult<&'static dyn crate::Function> {
    function_by_name(name)
        .ok_or_else(|| PyValueError::new_err(format!("Unknown function {}", name)))
}

fn lookup_scheme(name: &str) -> PyResult<Scheme> {
    Scheme::ALL
        .into_iter()
        .find(|s| s.as_str() == name)
        .ok_or_else(|| PyValueError::new_err(format!("Unknown scheme {}", name)))
}

/// Semantics class defining the shape of a normalized number.
///
/// This class encapsulates the mantissa length and the maximum number of
/// fractional digits of the expansion.
#[pyclass]
struct PySemantics {
    inner: Semantics,
}

#[pymethods]
impl PySemantics {
    /// Create a new semantics object.
    ///
    /// Args:
    ///     mantissa_len: The number of mantissa bits (excluding the leading one)
    ///     fraction_cap: The maximum number of fractional digits
    #[new]
    fn new(mantissa_len: usize, fraction_cap: usize) -> PyResult<Self> {
        let sem = Semantics::new(mantissa_len, fraction_cap);
        sem.validate().map_err(to_py_err)?;
        Ok(PySemantics { inner: sem })
    }
    /// Returns one of the presets: "reference" or "compact".
    #[staticmethod]
    fn preset(name: &str) -> PyResult<Self> {
        Semantics::from_name(name)
            .map(|inner| PySemantics { inner })
            .ok_or_else(|| PyValueError::new_err(format!("Unknown preset {}", name)))
    }
    /// Returns the length of the mantissa in bits.
    fn get_mantissa_len(&self) -> usize {
        self.inner.get_mantissa_len()
    }
    /// Returns the maximum number of fractional digits.
    fn get_fraction_cap(&self) -> usize {
        self.inner.get_fraction_cap()
    }
    fn __str__(&self) -> String {
        format!("{:?}", self.inner)
    }
    fn __repr__(&self) -> String {
        self.__str__()
    }
}

/// A normalized number: a fixed-length mantissa and an exponent.
#[pyclass]
struct PyNormalized {
    inner: Normalized,
}

#[pymethods]
impl PyNormalized {
    fn __str__(&self) -> String {
        self.inner.to_string()
    }
    fn __repr__(&self) -> String {
        self.__str__()
    }
    /// Returns the mantissa as a string of '0' and '1'.
    fn get_mantissa(&self) -> String {
        self.inner.get_mantissa().to_string()
    }
    /// Returns the exponent (the power of the leading bit plus one).
    fn get_exponent(&self) -> i64 {
        self.inner.get_exp()
    }
    /// Returns true if the mantissa holds every set bit of the input.
    fn is_exact(&self) -> bool {
        self.inner.is_exact()
    }
    /// Returns true if this is the normalized zero.
    fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }
    /// Rebuild the value as a float.
    fn to_float(&self) -> f64 {
        self.inner.to_f64()
    }
}

/// Normalize a non-negative number.
///
/// Args:
///     value: The number to normalize
///     sem: Optional semantics, the reference semantics by default
#[pyfunction]
#[pyo3(signature = (value, sem=None))]
fn normalize_value(
    value: f64,
    sem: Option<PyRef<PySemantics>>,
) -> PyResult<PyNormalized> {
    let sem = sem.map(|s| s.inner).unwrap_or_default();
    let inner = normalize(value, sem).map_err(to_py_err)?;
    Ok(PyNormalized { inner })
}

/// Returns the neighbours (lower, upper) of a value at a binary precision.
///
/// Args:
///     value: The number to bracket
///     precision: The number of significant bits
#[pyfunction]
fn neighbours(value: f64, precision: usize) -> PyResult<(f64, f64)> {
    let b = bracket(value, precision, Semantics::default()).map_err(to_py_err)?;
    Ok((b.lower, b.upper))
}

/// Returns (approximation, truncation, rounding, total, observed) for one
/// difference scheme.
///
/// Args:
///     function: "sin" or "exp"
///     scheme: "forward", "backward" or "central"
///     x: The point of the derivative
///     h: The step size
#[pyfunction]
fn error_sample(
    function: &str,
    scheme: &str,
    x: f64,
    h: f64,
) -> PyResult<(f64, f64, f64, f64, f64)> {
    let f = lookup_function(function)?;
    let s = sample(f, lookup_scheme(scheme)?, x, h).map_err(to_py_err)?;
    Ok((s.approximation, s.truncation, s.rounding, s.total, s.observed))
}

/// Returns a list of (h, forward, backward, central) measured errors.
///
/// Args:
///     function: "sin" or "exp"
///     x: The point of the derivative
///     steps: The step sizes
#[pyfunction]
fn compare_schemes(
    function: &str,
    x: f64,
    steps: Vec<f64>,
) -> PyResult<Vec<(f64, f64, f64, f64)>> {
    let f = lookup_function(function)?;
    let rows = compare(f, x, &steps).map_err(to_py_err)?;
    Ok(rows
        .iter()
        .map(|r| (r.h, r.forward, r.backward, r.central))
        .collect())
}

#[pymodule]
fn _floatlab(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyNormalized>()?;
    m.add_class::<PySemantics>()?;

    // Add the functions to the module
    m.add_function(wrap_pyfunction!(normalize_value, m)?)?;
    m.add_function(wrap_pyfunction!(neighbours, m)?)?;
    m.add_function(wrap_pyfunction!(error_sample, m)?)?;
    m.add_function(wrap_pyfunction!(compare_schemes, m)?)?;
    Ok(())
}
