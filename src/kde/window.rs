//! Sliding two-pointer window over a sorted timestamp array.
//!
//! Purpose
//! -------
//! Evaluate a KDE at every input timestamp in amortized O(N + Σ window)
//! time by maintaining the window `[ineg, ipos)` of timestamps within
//! `limit` ticks of the current query, instead of rescanning the array for
//! each query.
//!
//! Key behaviors
//! -------------
//! - [`WindowCursor::advance`] moves both pointers forward only. `ipos` is
//!   pushed right until it reaches the first timestamp more than `limit`
//!   ticks after the query, and `ineg` right until it reaches the first
//!   timestamp at most `limit` ticks before the query.
//! - `sliding_self_rates` drives the cursor over a range of query indices
//!   and fills the rate and photon-count arrays.
//! - `search_rates_at` handles arbitrary query axes with one pair of
//!   binary searches per query.
//!
//! Invariants & assumptions
//! ------------------------
//! - `ph` is sorted non-decreasing and queries are visited in increasing
//!   index order; under those conditions `ineg <= i < ipos` after every
//!   `advance(i)` and both pointers are non-decreasing.
//! - Membership is decided on `u64` absolute tick differences compared to
//!   an integer `limit`; only kernel weights use floating point.
//! - On unsorted input the pointers stay in bounds (the query itself always
//!   stops `ineg`), but the window contents are unspecified.
use crate::{
    core::errors::{RateError, RateResult},
    kde::kernel::KernelWeights,
};
use ndarray::Array1;
use std::ops::Range;

/// Two-pointer cursor tracking the timestamps within `limit` ticks of the
/// current query.
#[derive(Debug, Clone)]
pub struct WindowCursor<'a> {
    ph: &'a [i64],
    limit: u64,
    ineg: usize,
    ipos: usize,
}

impl<'a> WindowCursor<'a> {
    pub fn new(ph: &'a [i64], limit: u64) -> Self {
        WindowCursor { ph, limit, ineg: 0, ipos: 0 }
    }

    /// Move the window to query index `i` and return it as `ineg..ipos`.
    ///
    /// Calls must use non-decreasing `i < ph.len()`. Starting at `i > 0` is
    /// allowed; the pointers catch up on the first call.
    #[inline]
    pub fn advance(&mut self, i: usize) -> Range<usize> {
        let t = self.ph[i];
        // ph[i] is always inside its own window.
        self.ipos = self.ipos.max(i + 1);
        while self.ipos < self.ph.len() && self.ph[self.ipos].abs_diff(t) <= self.limit {
            self.ipos += 1;
        }
        while self.ph[self.ineg].abs_diff(t) > self.limit {
            self.ineg += 1;
        }
        debug_assert!(self.ineg <= i && i < self.ipos);
        self.ineg..self.ipos
    }
}

/// Rates and photon counts evaluated at every input timestamp.
///
/// Fields
/// ------
/// - `rates`: unnormalized kernel-weight sums, one per timestamp.
/// - `nph`: number of timestamps within the truncation window of each
///   timestamp (itself included).
#[derive(Debug, Clone, PartialEq)]
pub struct KdeSelfRates {
    pub rates: Array1<f64>,
    pub nph: Array1<u16>,
}

impl KdeSelfRates {
    pub fn empty() -> Self {
        KdeSelfRates { rates: Array1::zeros(0), nph: Array1::zeros(0) }
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Narrow a window population to the `u16` photon count, failing loudly on
/// overflow.
#[inline]
pub(crate) fn photon_count(index: usize, count: usize) -> RateResult<u16> {
    u16::try_from(count).map_err(|_| {
        tracing::warn!(index, count, "photon count overflow; bandwidth too large for density");
        RateError::CountOverflow { index, count }
    })
}

/// Sliding-window self-evaluation for the query indices in `queries`.
///
/// `index_offset` is added to query indices when reporting
/// `CountOverflow`, so chunked callers report positions in the full stream.
pub(crate) fn sliding_self_rates(
    ph: &[i64], queries: Range<usize>, kernel: KernelWeights, limit: u64, index_offset: usize,
) -> RateResult<KdeSelfRates> {
    let n_out = queries.len();
    let mut rates = Array1::<f64>::zeros(n_out);
    let mut nph = Array1::<u16>::zeros(n_out);
    let mut cursor = WindowCursor::new(ph, limit);

    for (k, i) in queries.enumerate() {
        let window = cursor.advance(i);
        let t = ph[i];
        nph[k] = photon_count(i + index_offset, window.len())?;
        rates[k] = ph[window].iter().map(|&x| kernel.eval(x.abs_diff(t) as f64)).sum();
    }

    Ok(KdeSelfRates { rates, nph })
}

/// `true` when timestamp `x` lies in the closed support `[lo, hi]`.
#[inline]
pub(crate) fn in_support(x: i64, lo: f64, hi: f64) -> bool {
    let xf = x as f64;
    xf >= lo && xf <= hi
}

/// KDE at arbitrary query times via binary search of each query's support.
///
/// The query axis may be unsorted; output order follows the axis. A `NaN`
/// query has an empty support and evaluates to `0.0`.
pub(crate) fn search_rates_at(
    ph: &[i64], time_axis: &[f64], kernel: KernelWeights, support: f64,
) -> Array1<f64> {
    Array1::from_iter(time_axis.iter().map(|&t| {
        let (lo, hi) = (t - support, t + support);
        let start = ph.partition_point(|&x| (x as f64) < lo);
        let end = start + ph[start..].partition_point(|&x| in_support(x, lo, hi));
        ph[start..end].iter().map(|&x| kernel.eval(x as f64 - t)).sum::<f64>()
    }))
}
