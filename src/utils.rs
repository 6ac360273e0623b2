//! Python-boundary helpers for the `_photon_rates` extension module.
//!
//! Convert loosely typed Python inputs (NumPy arrays, pandas Series, plain
//! sequences) into contiguous read-only arrays, and build [`KdeOptions`]
//! from keyword arguments. Everything here is compiled only with the
//! `python-bindings` feature.

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
use crate::kde::{KdeOptions, KernelShape};

#[cfg(feature = "python-bindings")]
macro_rules! extract_array_fn {
    ($name:ident, $elem:ty, $what:literal) => {
        /// Borrow `raw_data` as a contiguous 1-D array, copying only when the
        /// input is not already a contiguous NumPy array of the right dtype.
        #[inline]
        pub fn $name<'py>(
            py: Python<'py>, raw_data: &Bound<'py, PyAny>,
        ) -> PyResult<PyReadonlyArray1<'py, $elem>> {
            if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<$elem>>() {
                if arr_ro.as_slice().is_ok() {
                    return Ok(arr_ro);
                }
            }

            if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
                if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<$elem>>() {
                    if series_ro.as_slice().is_ok() {
                        return Ok(series_ro);
                    }
                }
            }

            let vec: Vec<$elem> = raw_data.extract().map_err(|_| {
                PyTypeError::new_err(concat!(
                    "expected a 1-D numpy.ndarray, pandas.Series, or sequence of ",
                    $what
                ))
            })?;
            Ok(vec.into_pyarray(py).readonly())
        }
    };
}

#[cfg(feature = "python-bindings")]
extract_array_fn!(extract_i64_array, i64, "int64 timestamps");

#[cfg(feature = "python-bindings")]
extract_array_fn!(extract_f64_array, f64, "float64");

/// View a readonly array as a slice, mapping a non-contiguous layout to
/// `TypeError` instead of panicking.
#[cfg(feature = "python-bindings")]
pub fn as_contiguous<'a, T: numpy::Element>(arr: &'a PyReadonlyArray1<'_, T>) -> PyResult<&'a [T]> {
    arr.as_slice().map_err(|_| PyTypeError::new_err("expected a contiguous 1-D array"))
}

/// Build [`KdeOptions`] from Python keyword arguments.
///
/// `kernel` accepts the names understood by `KernelShape::from_str`;
/// `truncation` defaults to 5.
#[cfg(feature = "python-bindings")]
pub fn build_kde_options(
    kernel: &str, tau: f64, truncation: Option<f64>, check_sorted: Option<bool>,
) -> PyResult<KdeOptions> {
    let shape: KernelShape = kernel.parse()?;
    let mut opts = KdeOptions::new(shape, tau)?;
    if let Some(factor) = truncation {
        opts = opts.with_truncation(factor)?;
    }
    if let Some(check) = check_sorted {
        opts = opts.with_sort_check(check);
    }
    Ok(opts)
}
