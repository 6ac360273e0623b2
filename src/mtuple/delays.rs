//! Non-overlapping m-photon delays, delay histograms, and the Erlang
//! background reference.
//!
//! Purpose
//! -------
//! Supply the raw material background-rate estimation works from: the
//! waiting time of every disjoint block of `m` photons, histogrammed as a
//! probability density, together with the Erlang density a pure Poisson
//! background of known rate would produce.
//!
//! Key behaviors
//! -------------
//! - [`mdelays_stride`] takes every m-th timestamp and differences them,
//!   so successive delays share no photons.
//! - [`HistogramBins`] describes `start..stop` in steps of `step` (the last
//!   edge is the largest `start + k * step` below `stop`).
//! - [`DelayHistogram::density`] counts values per bin and scales to unit
//!   area over the in-range values.
//! - [`ErlangBackground`] wraps `statrs`' Erlang distribution with shape `m`
//!   and rate equal to the background rate.
//!
//! Invariants & assumptions
//! ------------------------
//! - `ph` is sorted non-decreasing (precondition, not checked here).
//! - Histogram units are whatever the caller passes in; use
//!   [`delay_histogram_ms`] to convert ticks to milliseconds first.
//! - Fitting the Erlang to the histogram is out of scope for this crate.
use crate::core::{
    errors::{RateError, RateResult},
    units::ClockPeriod,
    validation::validate_m,
};
use ndarray::Array1;
use statrs::distribution::{Continuous, ContinuousCDF, Erlang};

/// Delays between every m-th timestamp: `ph[(k + 1) * m] - ph[k * m]`.
///
/// Returns `ceil(N / m) - 1` delays, or an empty array when fewer than two
/// strided timestamps exist.
///
/// # Errors
/// - [`RateError::InvalidWindowSize`] when `m == 0`.
pub fn mdelays_stride(ph: &[i64], m: usize) -> RateResult<Array1<i64>> {
    validate_m(m)?;
    let strided: Vec<i64> = ph.iter().step_by(m).copied().collect();
    Ok(Array1::from_iter(strided.windows(2).map(|pair| pair[1] - pair[0])))
}

/// Upper bound on the number of histogram edges.
pub const MAX_HISTOGRAM_EDGES: usize = 10_000_000;

/// Bin edges `start, start + step, …` strictly below `stop`.
///
/// At least two edges (one bin) and at most [`MAX_HISTOGRAM_EDGES`] are
/// required.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBins {
    start: f64,
    step: f64,
    edges: Array1<f64>,
}

impl HistogramBins {
    /// Build `arange(start, stop, step)` edges.
    ///
    /// # Errors
    /// - [`RateError::InvalidHistogramBins`] when any argument is non-finite,
    ///   `step <= 0`, or the edge count falls outside
    ///   `2..=MAX_HISTOGRAM_EDGES`.
    pub fn new(start: f64, stop: f64, step: f64) -> RateResult<Self> {
        let invalid = |reason| RateError::InvalidHistogramBins { start, stop, step, reason };
        if !start.is_finite() || !stop.is_finite() || !step.is_finite() {
            return Err(invalid("all arguments must be finite"));
        }
        if step <= 0.0 {
            return Err(invalid("step must be > 0"));
        }
        let n_edges = ((stop - start) / step).ceil();
        if n_edges < 2.0 {
            return Err(invalid("range must contain at least one full bin"));
        }
        if n_edges > MAX_HISTOGRAM_EDGES as f64 {
            return Err(invalid("too many bins"));
        }
        let edges = Array1::from_iter((0..n_edges as usize).map(|k| start + k as f64 * step));
        Ok(HistogramBins { start, step, edges })
    }

    pub fn edges(&self) -> &Array1<f64> {
        &self.edges
    }

    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Bin centers `edges[k] + step / 2`.
    pub fn centers(&self) -> Array1<f64> {
        Array1::from_iter(self.edges.iter().take(self.n_bins()).map(|e| e + 0.5 * self.step))
    }

    /// Bin index for `value`; `None` outside `[edges[0], edges[last]]`.
    /// The last bin is closed on the right.
    fn index_of(&self, value: f64) -> Option<usize> {
        let last = self.edges[self.edges.len() - 1];
        if !(value >= self.start && value <= last) {
            return None;
        }
        let idx = ((value - self.start) / self.step).floor() as usize;
        Some(idx.min(self.n_bins() - 1))
    }
}

/// DelayHistogram — density-normalized histogram of delays.
///
/// Fields
/// ------
/// - `centers`: bin centers.
/// - `counts`: raw counts per bin.
/// - `density`: `counts / (in_range_total * step)`; integrates to 1 over the
///   bins unless no value fell in range, in which case it is all zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayHistogram {
    pub centers: Array1<f64>,
    pub counts: Array1<u64>,
    pub density: Array1<f64>,
}

impl DelayHistogram {
    /// Histogram `values` on `bins` and normalize to a probability density.
    ///
    /// Non-finite values and values outside the bin range are ignored.
    pub fn density(values: &[f64], bins: &HistogramBins) -> DelayHistogram {
        let mut counts = Array1::<u64>::zeros(bins.n_bins());
        for &v in values {
            if let Some(idx) = bins.index_of(v) {
                counts[idx] += 1;
            }
        }
        let total: u64 = counts.sum();
        let density = if total == 0 {
            Array1::<f64>::zeros(bins.n_bins())
        } else {
            let scale = 1.0 / (total as f64 * bins.step());
            counts.mapv(|c| c as f64 * scale)
        };
        DelayHistogram { centers: bins.centers(), counts, density }
    }
}

/// Histogram of non-overlapping m-photon delays, in milliseconds.
///
/// Combines [`mdelays_stride`], the clock-period conversion, and
/// [`DelayHistogram::density`].
pub fn delay_histogram_ms(
    ph: &[i64], m: usize, clock: ClockPeriod, bins: &HistogramBins,
) -> RateResult<DelayHistogram> {
    let delays = mdelays_stride(ph, m)?;
    let delays_ms: Vec<f64> = delays.iter().map(|&d| clock.ticks_to_millis(d)).collect();
    tracing::debug!(n = ph.len(), m, delays = delays_ms.len(), "histogramming m-photon delays");
    Ok(DelayHistogram::density(&delays_ms, bins))
}

/// ErlangBackground — waiting-time density of `m` background photons.
///
/// For a Poisson background with rate `rate` (events per unit of the delay
/// axis), the delay spanned by `m` consecutive photons is Erlang with shape
/// `m` and the same rate. Delay histograms are compared against this
/// reference to separate burst photons from background.
#[derive(Debug, Clone)]
pub struct ErlangBackground {
    m: usize,
    rate: f64,
    dist: Erlang,
}

impl ErlangBackground {
    /// # Errors
    /// - [`RateError::InvalidErlangParams`] when `m == 0` or `rate` is not
    ///   finite and positive.
    pub fn new(m: usize, rate: f64) -> RateResult<Self> {
        if m == 0 || !rate.is_finite() || rate <= 0.0 {
            return Err(RateError::InvalidErlangParams { m, rate });
        }
        let dist =
            Erlang::new(m as u64, rate).map_err(|_| RateError::InvalidErlangParams { m, rate })?;
        Ok(ErlangBackground { m, rate, dist })
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Mean m-photon delay, `m / rate`.
    pub fn mean(&self) -> f64 {
        self.m as f64 / self.rate
    }

    pub fn pdf(&self, x: f64) -> f64 {
        self.dist.pdf(x)
    }

    pub fn cdf(&self, x: f64) -> f64 {
        self.dist.cdf(x)
    }

    /// Evaluate the density on every bin center, ready to overlay on a
    /// [`DelayHistogram`].
    pub fn pdf_on(&self, centers: &Array1<f64>) -> Array1<f64> {
        centers.mapv(|x| self.dist.pdf(x))
    }
}
