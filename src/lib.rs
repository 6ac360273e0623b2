//! photon_rates — photon-rate estimators for single-molecule timestamp streams.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the rate estimators to Python via the `_photon_rates` extension
//! module when the `python-bindings` feature is enabled.
//!
//! Key behaviors
//! -------------
//! - Re-export the estimator modules: [`mtuple`] (fixed-count rates, delay
//!   histograms, Erlang background) and [`kde`] (kernel-density rates with
//!   sliding-window self-evaluation), plus shared [`core`] types.
//! - Define `#[pyfunction]` wrappers and the `#[pymodule]` initializer that
//!   register them on `_photon_rates`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work happens in the inner modules; this file performs
//!   only FFI glue and error mapping.
//! - Timestamps are sorted `i64` clock ticks. The Python wrappers enable the
//!   sortedness check only when asked (`check_sorted=True`).
//!
//! Conventions
//! -----------
//! - Errors from Rust code propagate as [`RateError`](crate::core::RateError) and become
//!   `ValueError` at the PyO3 boundary; input conversion failures become
//!   `TypeError`.
//! - Python functions return NumPy arrays; `_self` variants return a
//!   `(rates, nph)` tuple.
//! - The crate emits `tracing` events but never installs a subscriber.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules, by
//!   `tests/integration_rates_pipeline.rs`, and by property tests in
//!   `tests/rate_properties.rs`.

pub mod core;
pub mod kde;
pub mod mtuple;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    kde::{KdeSelfRates, KernelShape},
    utils::{as_contiguous, build_kde_options, extract_f64_array, extract_i64_array},
};

#[cfg(feature = "python-bindings")]
type SelfRatesPy<'py> = (Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<u16>>);

#[cfg(feature = "python-bindings")]
fn self_rates_to_py<'py>(py: Python<'py>, out: KdeSelfRates) -> SelfRatesPy<'py> {
    (out.rates.into_pyarray(py), out.nph.into_pyarray(py))
}

/// Overlapping m-photon delays `ph[i + m - 1] - ph[i]`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (ph, m))]
fn mtuple_delays<'py>(
    py: Python<'py>, ph: &Bound<'py, PyAny>, m: usize,
) -> PyResult<Bound<'py, PyArray1<i64>>> {
    let arr = extract_i64_array(py, ph)?;
    let ph = as_contiguous(&arr)?;
    Ok(mtuple::mtuple_delays(ph, m)?.into_pyarray(py))
}

/// m-tuple rates `m / delay` in photons per tick.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (ph, m))]
fn mtuple_rates<'py>(
    py: Python<'py>, ph: &Bound<'py, PyAny>, m: usize,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let arr = extract_i64_array(py, ph)?;
    let ph = as_contiguous(&arr)?;
    Ok(mtuple::mtuple_rates(ph, m)?.into_pyarray(py))
}

/// Midpoint of every m-tuple.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (ph, m))]
fn mtuple_rates_t<'py>(
    py: Python<'py>, ph: &Bound<'py, PyAny>, m: usize,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let arr = extract_i64_array(py, ph)?;
    let ph = as_contiguous(&arr)?;
    Ok(mtuple::mtuple_rates_t(ph, m)?.into_pyarray(py))
}

/// Smallest m-tuple delay, or `None` when `len(ph) < m`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (ph, m))]
fn mtuple_delays_min<'py>(
    py: Python<'py>, ph: &Bound<'py, PyAny>, m: usize,
) -> PyResult<Option<i64>> {
    let arr = extract_i64_array(py, ph)?;
    Ok(mtuple::mtuple_delays_min(as_contiguous(&arr)?, m)?)
}

/// Largest m-tuple rate, or `None` when `len(ph) < m`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (ph, m))]
fn mtuple_rates_max<'py>(
    py: Python<'py>, ph: &Bound<'py, PyAny>, m: usize,
) -> PyResult<Option<f64>> {
    let arr = extract_i64_array(py, ph)?;
    Ok(mtuple::mtuple_rates_max(as_contiguous(&arr)?, m)?)
}

#[cfg(feature = "python-bindings")]
fn kde_rates_py<'py>(
    py: Python<'py>, ph: &Bound<'py, PyAny>, tau: f64, shape: KernelShape,
    time_axis: Option<&Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let arr = extract_i64_array(py, ph)?;
    let ph = as_contiguous(&arr)?;
    let rates = match time_axis {
        Some(raw_axis) => {
            let axis_arr = extract_f64_array(py, raw_axis)?;
            kde::kde_rates(ph, tau, shape, Some(as_contiguous(&axis_arr)?))?
        }
        None => kde::kde_rates(ph, tau, shape, None)?,
    };
    Ok(rates.into_pyarray(py))
}

/// Laplace KDE rates at `time_axis` (or at `ph` when omitted).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (ph, tau, time_axis = None))]
fn kde_laplace<'py>(
    py: Python<'py>, ph: &Bound<'py, PyAny>, tau: f64, time_axis: Option<&Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    kde_rates_py(py, ph, tau, KernelShape::Laplace, time_axis)
}

/// Gaussian KDE rates at `time_axis` (or at `ph` when omitted).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (ph, tau, time_axis = None))]
fn kde_gaussian<'py>(
    py: Python<'py>, ph: &Bound<'py, PyAny>, tau: f64, time_axis: Option<&Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    kde_rates_py(py, ph, tau, KernelShape::Gaussian, time_axis)
}

/// Rectangular KDE rates at `time_axis` (or at `ph` when omitted).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (ph, tau, time_axis = None))]
fn kde_rect<'py>(
    py: Python<'py>, ph: &Bound<'py, PyAny>, tau: f64, time_axis: Option<&Bound<'py, PyAny>>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    kde_rates_py(py, ph, tau, KernelShape::Rect, time_axis)
}

/// Self-evaluated KDE for any kernel name.
///
/// Returns `(rates, nph)`. `truncation` overrides the `5 * tau` window and
/// `check_sorted=True` rejects unsorted input with `ValueError`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (ph, tau, kernel = "laplace", truncation = None, check_sorted = None))]
fn kde_self<'py>(
    py: Python<'py>, ph: &Bound<'py, PyAny>, tau: f64, kernel: &str, truncation: Option<f64>,
    check_sorted: Option<bool>,
) -> PyResult<SelfRatesPy<'py>> {
    let opts = build_kde_options(kernel, tau, truncation, Some(check_sorted.unwrap_or(false)))?;
    let arr = extract_i64_array(py, ph)?;
    let out = kde::kde_self(as_contiguous(&arr)?, &opts)?;
    Ok(self_rates_to_py(py, out))
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (ph, tau))]
fn kde_laplace_self<'py>(
    py: Python<'py>, ph: &Bound<'py, PyAny>, tau: f64,
) -> PyResult<SelfRatesPy<'py>> {
    kde_self(py, ph, tau, "laplace", None, None)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (ph, tau))]
fn kde_gaussian_self<'py>(
    py: Python<'py>, ph: &Bound<'py, PyAny>, tau: f64,
) -> PyResult<SelfRatesPy<'py>> {
    kde_self(py, ph, tau, "gaussian", None, None)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (ph, tau))]
fn kde_rect_self<'py>(
    py: Python<'py>, ph: &Bound<'py, PyAny>, tau: f64,
) -> PyResult<SelfRatesPy<'py>> {
    kde_self(py, ph, tau, "rect", None, None)
}

/// _photon_rates — PyO3 module initializer.
///
/// Registers the m-tuple and KDE functions on the extension module. Invoked
/// by Python on import; never called from Rust.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _photon_rates<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(mtuple_delays, m)?)?;
    m.add_function(wrap_pyfunction!(mtuple_rates, m)?)?;
    m.add_function(wrap_pyfunction!(mtuple_rates_t, m)?)?;
    m.add_function(wrap_pyfunction!(mtuple_delays_min, m)?)?;
    m.add_function(wrap_pyfunction!(mtuple_rates_max, m)?)?;

    m.add_function(wrap_pyfunction!(kde_laplace, m)?)?;
    m.add_function(wrap_pyfunction!(kde_gaussian, m)?)?;
    m.add_function(wrap_pyfunction!(kde_rect, m)?)?;
    m.add_function(wrap_pyfunction!(kde_self, m)?)?;
    m.add_function(wrap_pyfunction!(kde_laplace_self, m)?)?;
    m.add_function(wrap_pyfunction!(kde_gaussian_self, m)?)?;
    m.add_function(wrap_pyfunction!(kde_rect_self, m)?)?;
    Ok(())
}
