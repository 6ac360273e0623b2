//! core::errors — error type shared by the rate estimators.
//!
//! Purpose
//! -------
//! Provide a single error enum and result alias for every estimator in this
//! crate, together with a conversion layer to Python exceptions when the
//! `python-bindings` feature is enabled.
//!
//! Key behaviors
//! -------------
//! - Define [`RateError`] and [`RateResult`] as the canonical error and result
//!   types for m-tuple, KDE, and delay-histogram routines.
//! - Attach human-readable `Display` messages that embed the offending value
//!   so failures can be diagnosed without further context.
//! - Implement `From<RateError> for PyErr` (feature-gated) mapping every
//!   variant to `ValueError` with the `Display` message preserved.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only precondition violations and the count-accumulator overflow are
//!   errors. "No tuple available" is reported as `None` by the reduction
//!   functions, and infinite or zero rates are ordinary values.
//! - Errors are raised at the call boundary, before any output is produced.
//!
//! Testing notes
//! -------------
//! - Unit tests check that each `Display` message embeds its payload.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for all rate-estimation routines.
pub type RateResult<T> = Result<T, RateError>;

/// RateError — failures detected by the rate estimators.
///
/// Variants
/// --------
/// - `InvalidBandwidth { tau }`
///   Kernel bandwidth is non-finite or not strictly positive.
/// - `InvalidWindowSize { m }`
///   m-tuple size is zero.
/// - `UnknownKernel { name }`
///   Kernel name does not match any supported shape.
/// - `InvalidTruncation { factor }`
///   Support multiple for truncated kernels is non-finite or not strictly
///   positive.
/// - `UnsortedTimestamps { index, prev, next }`
///   The optional monotonicity check found `ph[index] < ph[index - 1]`.
/// - `CountOverflow { index, count }`
///   The window population at query `index` does not fit the `u16` photon
///   count. This signals a bandwidth far too large for the photon density.
/// - `InvalidChunkLength`
///   Chunked evaluation was asked for chunks of length zero.
/// - `InvalidClockPeriod { value }`
///   Clock period is non-finite or not strictly positive.
/// - `InvalidHistogramBins { start, stop, step, reason }`
///   Bin specification does not produce at least one finite bin.
/// - `InvalidErlangParams { m, rate }`
///   Background Erlang distribution cannot be built from `(m, rate)`.
#[derive(Debug, Clone, PartialEq)]
pub enum RateError {
    // ---- Estimator preconditions ----
    InvalidBandwidth { tau: f64 },
    InvalidWindowSize { m: usize },
    UnknownKernel { name: String },
    InvalidTruncation { factor: f64 },
    UnsortedTimestamps { index: usize, prev: i64, next: i64 },

    // ---- Accumulators ----
    CountOverflow { index: usize, count: usize },

    // ---- Chunked evaluation ----
    InvalidChunkLength,

    // ---- Delay histograms ----
    InvalidClockPeriod { value: f64 },
    InvalidHistogramBins { start: f64, stop: f64, step: f64, reason: &'static str },
    InvalidErlangParams { m: usize, rate: f64 },
}

impl std::error::Error for RateError {}

impl std::fmt::Display for RateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateError::InvalidBandwidth { tau } => {
                write!(f, "Kernel bandwidth tau must be finite and > 0; got: {tau}")
            }
            RateError::InvalidWindowSize { m } => {
                write!(f, "m-tuple size must be >= 1; got: {m}")
            }
            RateError::UnknownKernel { name } => {
                write!(
                    f,
                    "Unknown kernel {name:?} (expected 'laplace', 'gaussian', or 'rect')"
                )
            }
            RateError::InvalidTruncation { factor } => {
                write!(f, "Kernel truncation multiple must be finite and > 0; got: {factor}")
            }
            RateError::UnsortedTimestamps { index, prev, next } => {
                write!(
                    f,
                    "Timestamps must be sorted ascending; ph[{index}] = {next} < ph[{}] = {prev}",
                    index.saturating_sub(1)
                )
            }
            RateError::CountOverflow { index, count } => {
                write!(
                    f,
                    "Photon count {count} at index {index} exceeds {}; \
                     tau is too large for this photon density",
                    u16::MAX
                )
            }
            RateError::InvalidChunkLength => {
                write!(f, "Chunk length must be >= 1.")
            }
            RateError::InvalidClockPeriod { value } => {
                write!(f, "Clock period must be finite and > 0; got: {value}")
            }
            RateError::InvalidHistogramBins { start, stop, step, reason } => {
                write!(
                    f,
                    "Invalid histogram bins (start={start}, stop={stop}, step={step}): {reason}"
                )
            }
            RateError::InvalidErlangParams { m, rate } => {
                write!(
                    f,
                    "Erlang background needs m >= 1 and finite rate > 0; got m={m}, rate={rate}"
                )
            }
        }
    }
}

/// Convert a [`RateError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<RateError> for PyErr {
    fn from(err: RateError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
