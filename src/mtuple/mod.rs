//! mtuple — fixed-count photon-rate estimation.
//!
//! Purpose
//! -------
//! Estimate local photon rates from runs of `m` consecutive timestamps and
//! provide the delay statistics background estimation builds on.
//!
//! Key behaviors
//! -------------
//! - [`MTupleRates`] and the array functions in [`rates`] compute, for every
//!   overlapping m-tuple, its delay, its rate `m / delay`, and its midpoint.
//! - [`mtuple_delays_min`] / [`mtuple_rates_max`] reduce to `Option`, with
//!   `None` meaning "fewer than `m` timestamps".
//! - [`delays`] adds non-overlapping (strided) delays, density histograms,
//!   and the Erlang background reference.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input timestamps are sorted non-decreasing `i64` clock ticks.
//! - Every array has length `N - m + 1` (overlapping) or `ceil(N / m) - 1`
//!   (strided), floored at zero.
//!
//! Testing notes
//! -------------
//! - Unit tests live in each submodule; randomized identities are in
//!   `tests/rate_properties.rs`.

pub mod delays;
pub mod rates;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::delays::{
    DelayHistogram, ErlangBackground, HistogramBins, MAX_HISTOGRAM_EDGES, delay_histogram_ms,
    mdelays_stride,
};
pub use self::rates::{
    MTupleRates, mtuple_delays, mtuple_delays_min, mtuple_rates, mtuple_rates_max,
    mtuple_rates_t,
};
