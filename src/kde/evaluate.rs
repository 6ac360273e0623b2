//! KDE entry points — validated dispatch to a backend.
//!
//! Purpose
//! -------
//! Offer the public KDE surface: one options-driven pair
//! ([`kde_self`], [`kde_rates_at`]), the shape-generic [`kde_rates`] that
//! picks self-evaluation when no query axis is given, and per-shape
//! conveniences mirroring the usual call sites.
//!
//! Key behaviors
//! -------------
//! - Runs the optional sortedness scan, logs entry at `debug`, then hands
//!   the work to the backend selected in [`KdeOptions`].
//! - Self-evaluation returns [`KdeSelfRates`]; the `_self` conveniences
//!   return the same pair.
//! - General evaluation returns one rate per query time, in axis order.
//!
//! Invariants & assumptions
//! ------------------------
//! - Bandwidth and truncation are validated when options are built, so no
//!   error can surface mid-scan except `CountOverflow`.
//! - Rates are raw kernel-weight sums. Divide by
//!   [`KernelShape::rate_divisor`] for events per tick.
use crate::{
    core::{errors::RateResult, validation::validate_sorted},
    kde::{kernel::KernelShape, options::KdeOptions, window::KdeSelfRates},
};
use ndarray::Array1;

fn check_input(ph: &[i64], opts: &KdeOptions) -> RateResult<()> {
    if opts.check_sorted() {
        validate_sorted(ph)?;
    }
    Ok(())
}

/// Evaluate the KDE at every timestamp of `ph`.
///
/// Parameters
/// ----------
/// - `ph`: `&[i64]`
///   Sorted photon timestamps in clock ticks.
/// - `opts`: `&KdeOptions`
///   Kernel, bandwidth, truncation, and backend.
///
/// Returns
/// -------
/// `RateResult<KdeSelfRates>`
///   `rates[i]` and `nph[i]` for every `i`, both of length `ph.len()`.
///
/// Errors
/// ------
/// - `RateError::UnsortedTimestamps` when the sort check is enabled and fails.
/// - `RateError::CountOverflow` when a window holds more than `u16::MAX`
///   timestamps.
///
/// Examples
/// --------
/// ```rust
/// # use photon_rates::kde::{KdeOptions, KernelShape, kde_self};
/// let ph = [0_i64, 1, 2, 3, 4, 5, 100];
/// let opts = KdeOptions::new(KernelShape::Laplace, 1.0).unwrap();
/// let out = kde_self(&ph, &opts).unwrap();
/// assert_eq!(out.rates[6], 1.0);
/// assert_eq!(out.nph[6], 1);
/// ```
pub fn kde_self(ph: &[i64], opts: &KdeOptions) -> RateResult<KdeSelfRates> {
    check_input(ph, opts)?;
    let backend = opts.backend().backend();
    tracing::debug!(
        n = ph.len(),
        tau = opts.tau(),
        shape = %opts.shape(),
        backend = backend.name(),
        "kde self-evaluation"
    );
    if ph.is_empty() {
        return Ok(KdeSelfRates::empty());
    }
    backend.self_rates(ph, opts)
}

/// Evaluate the KDE of `ph` at arbitrary query times.
///
/// `time_axis` may be in any order and may lie outside the data range; the
/// output follows its order and length.
pub fn kde_rates_at(ph: &[i64], time_axis: &[f64], opts: &KdeOptions) -> RateResult<Array1<f64>> {
    check_input(ph, opts)?;
    let backend = opts.backend().backend();
    tracing::debug!(
        n = ph.len(),
        queries = time_axis.len(),
        tau = opts.tau(),
        shape = %opts.shape(),
        backend = backend.name(),
        "kde evaluation at query axis"
    );
    backend.rates_at(ph, time_axis, opts)
}

/// KDE rates for `shape` with default options.
///
/// With `time_axis = None` the query axis is `ph` itself and the sliding
/// self-evaluation runs; the photon counts are dropped.
pub fn kde_rates(
    ph: &[i64], tau: f64, shape: KernelShape, time_axis: Option<&[f64]>,
) -> RateResult<Array1<f64>> {
    let opts = KdeOptions::new(shape, tau)?;
    match time_axis {
        Some(axis) => kde_rates_at(ph, axis, &opts),
        None => Ok(kde_self(ph, &opts)?.rates),
    }
}

/// Laplace (symmetric exponential) KDE, truncated at `5 * tau`.
pub fn kde_laplace(ph: &[i64], tau: f64, time_axis: Option<&[f64]>) -> RateResult<Array1<f64>> {
    kde_rates(ph, tau, KernelShape::Laplace, time_axis)
}

/// Gaussian KDE, truncated at `5 * tau`.
pub fn kde_gaussian(ph: &[i64], tau: f64, time_axis: Option<&[f64]>) -> RateResult<Array1<f64>> {
    kde_rates(ph, tau, KernelShape::Gaussian, time_axis)
}

/// Rectangular KDE: the number of timestamps within `tau` of each query.
pub fn kde_rect(ph: &[i64], tau: f64, time_axis: Option<&[f64]>) -> RateResult<Array1<f64>> {
    kde_rates(ph, tau, KernelShape::Rect, time_axis)
}

pub fn kde_laplace_self(ph: &[i64], tau: f64) -> RateResult<KdeSelfRates> {
    kde_self(ph, &KdeOptions::new(KernelShape::Laplace, tau)?)
}

pub fn kde_gaussian_self(ph: &[i64], tau: f64) -> RateResult<KdeSelfRates> {
    kde_self(ph, &KdeOptions::new(KernelShape::Gaussian, tau)?)
}

/// Rectangular self-evaluation. `nph` still counts the `5 * tau` window
/// while `rates` counts only timestamps within `tau`.
pub fn kde_rect_self(ph: &[i64], tau: f64) -> RateResult<KdeSelfRates> {
    kde_self(ph, &KdeOptions::new(KernelShape::Rect, tau)?)
}
